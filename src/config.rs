use crate::error::{DashError, Result};
use crate::geo::DEFAULT_BOUNDARY_URL;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PRICES_CSV: &str = "data/historical_silver_price.csv";
pub const DEFAULT_PURCHASES_CSV: &str = "data/state_wise_silver_purchased_kg.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Boundary fetch timeout (seconds).
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Historical price table (SILVER_PRICES_CSV)
    pub prices_csv: PathBuf,
    /// Per-state purchase table (SILVER_PURCHASES_CSV)
    pub purchases_csv: PathBuf,
    /// GeoJSON boundary source (SILVER_BOUNDARY_URL). `None` disables the fetch.
    pub boundary_url: Option<String>,
    /// SILVER_FETCH_TIMEOUT_SECS
    pub fetch_timeout: Duration,
    /// Where CSV/JSON exports land (SILVER_OUTPUT_DIR)
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prices_csv: PathBuf::from(DEFAULT_PRICES_CSV),
            purchases_csv: PathBuf::from(DEFAULT_PURCHASES_CSV),
            boundary_url: Some(DEFAULT_BOUNDARY_URL.to_string()),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let boundary_url = match lookup("SILVER_BOUNDARY_URL") {
            Some(v) if v.trim().is_empty() || v.trim().eq_ignore_ascii_case("off") => None,
            Some(v) => Some(v.trim().to_string()),
            None => defaults.boundary_url,
        };
        let fetch_timeout = match lookup("SILVER_FETCH_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v.trim().parse::<u64>().map_err(|_| {
                    DashError::Config(format!(
                        "SILVER_FETCH_TIMEOUT_SECS must be a whole number of seconds, got `{}`",
                        v
                    ))
                })?;
                if secs == 0 {
                    return Err(DashError::Config(
                        "SILVER_FETCH_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            prices_csv: lookup("SILVER_PRICES_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.prices_csv),
            purchases_csv: lookup("SILVER_PURCHASES_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.purchases_csv),
            boundary_url,
            fetch_timeout,
            output_dir: lookup("SILVER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.prices_csv, PathBuf::from(DEFAULT_PRICES_CSV));
        assert_eq!(cfg.boundary_url.as_deref(), Some(DEFAULT_BOUNDARY_URL));
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_apply() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("SILVER_PURCHASES_CSV", "/tmp/p.csv"),
            ("SILVER_BOUNDARY_URL", "off"),
            ("SILVER_FETCH_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.purchases_csv, PathBuf::from("/tmp/p.csv"));
        assert_eq!(cfg.boundary_url, None);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("SILVER_FETCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
        assert!(Config::from_lookup(lookup_from(&[("SILVER_FETCH_TIMEOUT_SECS", "0")])).is_err());
    }
}
