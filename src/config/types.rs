// Configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use crate::context::Granularity;

/// Default quiescence window before a suggestion request fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
/// Default minimum text length (in chars) worth asking about
pub const DEFAULT_MIN_LENGTH: usize = 3;
/// Default number of suggestions kept per context
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Default suggestion service base URL
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
/// Default HTTP timeout for a single suggestion request
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Suggestion scheduling configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub debounce_ms: u64,
    pub min_length: usize,
    pub max_suggestions: usize,
    pub granularity: Granularity,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        SuggestionsConfig {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_length: DEFAULT_MIN_LENGTH,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            granularity: Granularity::default(),
        }
    }
}

impl SuggestionsConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Suggestion service configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub user_id: String,
    pub session_id: String,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_id: "local".to_string(),
            session_id: "default".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}
