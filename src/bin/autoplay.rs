use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use spritetype_bot::config::{self, ACCOUNTS_PATH, CONFIG_PATH, PROXY_PATH, Settings};
use spritetype_bot::proxy::ProxyPool;
use spritetype_bot::runner::Runner;

#[derive(Parser)]
#[command(name = "autoplay", about = "Sprite Type auto-submission bot")]
struct Args {
    /// Games submitted per account each cycle
    #[arg(long)]
    games: u32,

    /// Route traffic through proxies from the proxy file
    #[arg(long)]
    proxy: bool,

    /// Rotate an account's proxy when its connectivity check fails
    #[arg(long, requires = "proxy")]
    rotate_proxy: bool,

    /// Run a single cycle and exit instead of repeating daily
    #[arg(long)]
    once: bool,

    /// Accounts file (one private key per line)
    #[arg(long, default_value = ACCOUNTS_PATH)]
    accounts_file: PathBuf,

    /// Proxy file (one endpoint per line)
    #[arg(long, default_value = PROXY_PATH)]
    proxy_file: PathBuf,

    /// Optional settings file
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.games == 0 {
        anyhow::bail!("--games must be at least 1");
    }

    let settings = Settings::load_or_default(&args.config)?;

    let accounts = config::load_accounts(&args.accounts_file)?;
    info!("Loaded {} account(s)", accounts.len());

    let proxies = if args.proxy {
        let entries = config::load_proxies(&args.proxy_file);
        info!("Loaded {} proxy entries", entries.len());
        ProxyPool::new(entries)
    } else {
        ProxyPool::new(Vec::new())
    };

    let mode = if args.proxy { "with proxy" } else { "without proxy" };
    info!(
        "Starting autoplay ({mode}) — {} game(s) per account, rotate={}",
        args.games, args.rotate_proxy
    );

    let cycle_delay = Duration::from_secs(settings.cycle_delay_secs);
    let mut runner = Runner::new(settings, args.games, args.proxy, args.rotate_proxy, proxies);

    loop {
        runner.run_cycle(&accounts).await;

        if args.once {
            break;
        }

        info!(
            "All accounts processed; sleeping {}s until the next cycle. Press Ctrl+C to stop.",
            cycle_delay.as_secs()
        );
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = tokio::time::sleep(cycle_delay) => {}
        }
    }

    Ok(())
}
