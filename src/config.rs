use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Default accounts file path (one private key per line).
pub const ACCOUNTS_PATH: &str = "accounts.txt";

/// Default proxy file path (one proxy endpoint per line).
pub const PROXY_PATH: &str = "proxy.txt";

/// Runtime settings, optionally overridden via `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Scoring API base URL.
    #[serde(default = "default_base_api")]
    pub base_api: String,
    /// Liveness probe URL used for connectivity checks.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    /// Pause between games for the same account, in seconds.
    #[serde(default = "default_game_delay")]
    pub game_delay_secs: u64,
    /// Pause between accounts, in seconds.
    #[serde(default = "default_account_delay")]
    pub account_delay_secs: u64,
    /// Pause between full cycles over the account list, in seconds.
    #[serde(default = "default_cycle_delay")]
    pub cycle_delay_secs: u64,
    /// Submission attempts before giving up on a single game.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Fixed pause between submission attempts, in seconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    /// Per-attempt submission timeout, in seconds.
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,
    /// Connectivity probe timeout, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_base_api() -> String {
    crate::BASE_API.to_string()
}

fn default_probe_url() -> String {
    crate::CONNECTIVITY_CHECK_URL.to_string()
}

fn default_game_delay() -> u64 {
    30
}

fn default_account_delay() -> u64 {
    3
}

fn default_cycle_delay() -> u64 {
    24 * 60 * 60
}

fn default_retry_attempts() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    5
}

fn default_submit_timeout() -> u64 {
    60
}

fn default_probe_timeout() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_api: default_base_api(),
            probe_url: default_probe_url(),
            game_delay_secs: default_game_delay(),
            account_delay_secs: default_account_delay(),
            cycle_delay_secs: default_cycle_delay(),
            retry_attempts: default_retry_attempts(),
            retry_delay_secs: default_retry_delay(),
            submit_timeout_secs: default_submit_timeout(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl Settings {
    /// Load settings from the given TOML file path, falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(settings)
    }
}

/// Load the newline-delimited private-key list. Blank lines are skipped.
///
/// A missing or empty file is fatal: there is nothing to run without accounts.
pub fn load_accounts(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read accounts file {}", path.display()))?;
    let accounts: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if accounts.is_empty() {
        anyhow::bail!("accounts file {} is empty", path.display());
    }
    Ok(accounts)
}

/// Load the newline-delimited proxy list. Blank lines are skipped.
///
/// A missing file is not fatal: the pool is just empty and submissions go
/// out directly.
pub fn load_proxies(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("proxy file {} unavailable: {e}", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("spritetype-{name}-{}", std::process::id()));
        let mut f = std::fs::File::create(&path).expect("create temp file");
        f.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn accounts_skips_blank_lines() {
        let path = write_temp("accounts", "aaa\n\n  \nbbb\n");
        let accounts = load_accounts(&path).expect("load accounts");
        std::fs::remove_file(&path).ok();
        assert_eq!(accounts, vec!["aaa".to_string(), "bbb".to_string()]);
    }

    #[test]
    fn accounts_missing_file_is_error() {
        let path = Path::new("definitely-not-here/accounts.txt");
        assert!(load_accounts(path).is_err());
    }

    #[test]
    fn accounts_empty_file_is_error() {
        let path = write_temp("empty-accounts", "\n  \n");
        let result = load_accounts(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn proxies_missing_file_is_empty() {
        let path = Path::new("definitely-not-here/proxy.txt");
        assert!(load_proxies(path).is_empty());
    }

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.retry_attempts, 5);
        assert_eq!(settings.retry_delay_secs, 5);
        assert_eq!(settings.game_delay_secs, 30);
        assert_eq!(settings.cycle_delay_secs, 86_400);
        assert_eq!(settings.base_api, crate::BASE_API);
    }

    #[test]
    fn settings_partial_toml_keeps_defaults() {
        let settings: Settings =
            toml::from_str("game_delay_secs = 1\nretry_attempts = 2\n").expect("parse settings");
        assert_eq!(settings.game_delay_secs, 1);
        assert_eq!(settings.retry_attempts, 2);
        assert_eq!(settings.retry_delay_secs, 5);
        assert_eq!(settings.base_api, crate::BASE_API);
    }
}
