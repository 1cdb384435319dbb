//! Runtime configuration read from `SHOPDESK_*` environment variables.

use resource_framework::StoreConfig;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const BUFFER_SIZE_VAR: &str = "SHOPDESK_BUFFER_SIZE";
pub const FAILURE_TITLE_VAR: &str = "SHOPDESK_FAILURE_TITLE";
pub const DISCARD_STALE_VAR: &str = "SHOPDESK_DISCARD_STALE";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Settings shared by every resource store.
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source. Unparseable values keep
    /// the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(size) = parse_var::<usize>(&lookup, BUFFER_SIZE_VAR) {
            if size == 0 {
                warn!(var = BUFFER_SIZE_VAR, "Buffer size must be positive, keeping default");
            } else {
                config.store.buffer_size = size;
            }
        }

        if let Some(title) = lookup(FAILURE_TITLE_VAR) {
            if !title.trim().is_empty() {
                config.store.failure_title = title;
            }
        }

        if let Some(discard) = parse_var::<bool>(&lookup, DISCARD_STALE_VAR) {
            config.store.discard_stale_responses = discard;
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = key, value = %raw, error = %e, "Ignoring invalid setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), AppConfig::default());
        assert_eq!(config(&[]).store.failure_title, "Request failed");
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            (BUFFER_SIZE_VAR, "64"),
            (FAILURE_TITLE_VAR, "Falha na requisição"),
            (DISCARD_STALE_VAR, "true"),
        ]);
        assert_eq!(config.store.buffer_size, 64);
        assert_eq!(config.store.failure_title, "Falha na requisição");
        assert!(config.store.discard_stale_responses);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[(BUFFER_SIZE_VAR, "lots"), (DISCARD_STALE_VAR, "yes")]);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn zero_buffer_is_rejected() {
        assert_eq!(config(&[(BUFFER_SIZE_VAR, "0")]).store.buffer_size, 32);
    }
}
