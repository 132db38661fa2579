use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::RATE_LIMIT_MESSAGE;
use crate::client::{BrowserProfile, SubmitClient, SubmitOutcome};
use crate::config::Settings;
use crate::proxy::ProxyPool;
use crate::reporter::{self, SubmissionEvent};
use crate::stats::{self, GameStats};
use crate::wallet::Wallet;

/// Aggregate counters for one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunTotals {
    pub accepted: u64,
    pub rejected: u64,
    pub no_result: u64,
    pub skipped_accounts: u64,
}

/// Owns all per-run mutable state: proxy assignments, browser profiles,
/// counters. One instance drives the whole process; nothing lives in
/// process-wide globals, so parallel instances are safe in tests.
pub struct Runner {
    settings: Settings,
    client: SubmitClient,
    game_count: u32,
    use_proxy: bool,
    rotate_proxy: bool,
    proxies: ProxyPool,
    profiles: HashMap<String, BrowserProfile>,
    pub totals: RunTotals,
}

impl Runner {
    pub fn new(
        settings: Settings,
        game_count: u32,
        use_proxy: bool,
        rotate_proxy: bool,
        proxies: ProxyPool,
    ) -> Self {
        let client = SubmitClient::new(&settings);
        Self {
            settings,
            client,
            game_count,
            use_proxy,
            rotate_proxy,
            proxies,
            profiles: HashMap::new(),
            totals: RunTotals::default(),
        }
    }

    /// Process every account once, sequentially.
    pub async fn run_cycle(&mut self, accounts: &[String]) {
        for (idx, key) in accounts.iter().enumerate() {
            let wallet = match Wallet::from_private_key(key) {
                Ok(wallet) => wallet,
                Err(e) => {
                    warn!("skipping account #{}: {e:#}", idx + 1);
                    self.totals.skipped_accounts += 1;
                    continue;
                }
            };
            info!("processing account {}", wallet.masked());
            self.process_account(&wallet).await;
            if idx + 1 < accounts.len() {
                tokio::time::sleep(Duration::from_secs(self.settings.account_delay_secs)).await;
            }
        }
        let totals = self.totals;
        info!(
            "cycle complete: {} accepted, {} rejected, {} without result, {} account(s) skipped",
            totals.accepted, totals.rejected, totals.no_result, totals.skipped_accounts
        );
    }

    async fn process_account(&mut self, wallet: &Wallet) {
        let profile = self
            .profiles
            .entry(wallet.address.clone())
            .or_insert_with(|| BrowserProfile::random(&mut rand::thread_rng()))
            .clone();

        let proxy = match self.ensure_connectivity(&wallet.address).await {
            Ok(proxy) => proxy,
            Err(e) => {
                warn!("{}: {e:#}, skipping this cycle", wallet.masked());
                self.totals.skipped_accounts += 1;
                return;
            }
        };

        for game in 1..=self.game_count {
            info!("game {game} of {}", self.game_count);
            let game_stats = stats::synthesize(&mut rand::thread_rng());

            let outcome = match self
                .client
                .submit(&wallet.address, &profile, &game_stats, proxy.as_deref())
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("{}: failed to build submission: {e:#}", wallet.masked());
                    continue;
                }
            };

            self.record(wallet, game, &game_stats, &outcome);

            match &outcome {
                SubmitOutcome::Accepted(resp) if resp.success => {
                    let receipt = resp.data.as_ref().and_then(|d| d.receipt_id.as_deref());
                    info!(
                        "accepted: {} (receipt {})",
                        resp.message.as_deref().unwrap_or("ok"),
                        receipt.unwrap_or("n/a")
                    );
                }
                SubmitOutcome::Accepted(_) | SubmitOutcome::Rejected { .. } => {
                    let message = outcome.message().unwrap_or("no message");
                    warn!("submission not accepted: {message}");
                    if message == RATE_LIMIT_MESSAGE {
                        info!("{}: hourly limit reached, moving on", wallet.masked());
                        break;
                    }
                }
                SubmitOutcome::NoResult => {
                    // Already logged by the client; straight to the next game.
                    continue;
                }
            }

            tokio::time::sleep(Duration::from_secs(self.settings.game_delay_secs)).await;
        }
    }

    /// Verify outbound connectivity for an account, rotating its proxy on
    /// failure when rotation is enabled. At most one full pass over the pool.
    async fn ensure_connectivity(&mut self, address: &str) -> Result<Option<String>> {
        let mut rotations = 0;
        loop {
            let proxy = if self.use_proxy {
                self.proxies.assign(address)
            } else {
                None
            };
            if let Some(p) = proxy.as_deref() {
                info!("proxy: {p}");
            }
            if self.client.check_connection(proxy.as_deref()).await {
                return Ok(proxy);
            }
            if self.rotate_proxy && rotations < self.proxies.len() {
                rotations += 1;
                if let Some(next) = self.proxies.rotate(address) {
                    warn!("connectivity check failed, rotating proxy to {next}");
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
            anyhow::bail!("connectivity check failed");
        }
    }

    fn record(&mut self, wallet: &Wallet, game: u32, game_stats: &GameStats, outcome: &SubmitOutcome) {
        let (label, message, receipt_id) = match outcome {
            SubmitOutcome::Accepted(resp) if resp.success => {
                self.totals.accepted += 1;
                (
                    "accepted",
                    resp.message.clone(),
                    resp.data.as_ref().and_then(|d| d.receipt_id.clone()),
                )
            }
            SubmitOutcome::Accepted(resp) => {
                self.totals.rejected += 1;
                (
                    "not-accepted",
                    resp.message.clone().or_else(|| resp.error.clone()),
                    None,
                )
            }
            SubmitOutcome::Rejected { message } => {
                self.totals.rejected += 1;
                ("rejected", Some(message.clone()), None)
            }
            SubmitOutcome::NoResult => {
                self.totals.no_result += 1;
                ("no-result", None, None)
            }
        };
        reporter::report_submission(&SubmissionEvent {
            timestamp: Utc::now().to_rfc3339(),
            address: wallet.masked(),
            game,
            total_games: self.game_count,
            wpm: game_stats.wpm,
            accuracy: game_stats.accuracy,
            time: game_stats.time,
            outcome: label,
            message,
            receipt_id,
        });
    }
}
