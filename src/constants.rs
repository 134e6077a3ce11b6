//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Base URL used when neither the config file nor the environment sets one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "ITINERARY_API_URL";

/// Environment variable carrying the bearer token for the CLI
pub const TOKEN_ENV: &str = "ITINERARY_TOKEN";

/// Per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Total attempts for retryable failures
pub const DEFAULT_RETRIES: u32 = 3;

/// Delay before the second attempt; doubles per attempt after that
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound on any single backoff delay
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 5000;

/// Default page sizes used by the listing endpoints
pub const DEFAULT_DESTINATION_LIMIT: u32 = 20;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Config directory under the user's home
pub const CONFIG_DIR_NAME: &str = ".itinerary";

/// Config file inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application name
pub const APP_NAME: &str = "itinerary";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
