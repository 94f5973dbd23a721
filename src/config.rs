// src/config.rs
use std::net::SocketAddr;

/// Runtime configuration, read once at startup from the environment
/// (with `.env` support via dotenvy in `main`). Every knob has a
/// default, so the binary runs with no configuration at all.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// Listen address for the HTTP API.
    pub addr: SocketAddr,
    /// Seconds between provider refreshes.
    pub refresh_secs: u64,
    /// Selection horizon in hours (how far ahead an item may end and
    /// still be shown).
    pub horizon_hours: i64,
}

const ENV_ADDR: &str = "RADIOGRID_ADDR";
const ENV_REFRESH: &str = "RADIOGRID_REFRESH_SECS";
const ENV_HORIZON: &str = "RADIOGRID_HORIZON_HOURS";

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_HORIZON_HOURS: i64 = 24;

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable env value, using default");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env_parsed(
                ENV_ADDR,
                DEFAULT_ADDR.parse().expect("default addr is valid"),
            ),
            refresh_secs: env_parsed(ENV_REFRESH, DEFAULT_REFRESH_SECS),
            horizon_hours: env_parsed(ENV_HORIZON, DEFAULT_HORIZON_HOURS),
        }
    }

    pub fn horizon_ms(&self) -> i64 {
        self.horizon_hours * 3_600_000
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.parse().expect("default addr is valid"),
            refresh_secs: DEFAULT_REFRESH_SECS,
            horizon_hours: DEFAULT_HORIZON_HOURS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.refresh_secs, 300);
        assert_eq!(cfg.horizon_ms(), 24 * 3_600_000);
        assert_eq!(cfg.addr.port(), 8000);
    }
}
