//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 key used to verify bearer tokens.
    pub secret: String,
    /// Base URL of the government address search endpoint.
    pub address_api_url: String,
    /// Seconds before an address search is abandoned.
    #[serde(default = "default_address_api_timeout_secs")]
    pub address_api_timeout_secs: u64,
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Maximum number of cached read responses.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_address_api_timeout_secs() -> u64 {
    10
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    1024
}
