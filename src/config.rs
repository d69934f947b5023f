use std::time::Duration;

use crate::state::PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_FETCH_DELAY_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INDEX_BATCH: usize = 1500;

/// Runtime settings shared by the effect handler and the HTTP client.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: usize,
    /// Pause between successive detail fetches inside one page-fill.
    pub fetch_delay: Duration,
    pub request_timeout: Duration,
    pub index_batch: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: PAGE_SIZE,
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            index_batch: DEFAULT_INDEX_BATCH,
        }
    }
}

impl CatalogConfig {
    pub fn new(base_url: &str, page_size: usize, fetch_delay_ms: u64, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
            fetch_delay: Duration::from_millis(fetch_delay_ms),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_inputs() {
        let config = CatalogConfig::new(" http://localhost:8080/api/v2/ ", 0, 0, 0);
        assert_eq!(config.base_url, "http://localhost:8080/api/v2");
        assert_eq!(config.page_size, 1);
        assert_eq!(config.fetch_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.index_batch, DEFAULT_INDEX_BATCH);
    }

    #[test]
    fn test_endpoint_joins_once() {
        let config = CatalogConfig::default();
        assert_eq!(
            config.endpoint("/pokemon/25/"),
            "https://pokeapi.co/api/v2/pokemon/25/"
        );
        assert_eq!(
            config.endpoint("pokemon?offset=0&limit=20"),
            "https://pokeapi.co/api/v2/pokemon?offset=0&limit=20"
        );
    }
}
