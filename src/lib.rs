pub mod checksum;
pub mod client;
pub mod config;
pub mod payload;
pub mod proxy;
pub mod reporter;
pub mod runner;
pub mod stats;
pub mod wallet;

/// Sprite Type scoring API base URL.
pub const BASE_API: &str = "https://spritetype.irys.xyz/api";

/// Web origin the submission headers mimic.
pub const GAME_ORIGIN: &str = "https://spritetype.irys.xyz";

/// Liveness probe endpoint (returns the caller's public IP as JSON).
pub const CONNECTIVITY_CHECK_URL: &str = "https://api.ipify.org?format=json";

/// Server message that ends the submission sequence for an account this cycle.
pub const RATE_LIMIT_MESSAGE: &str = "Hourly submission limit reached. Try again later.";
