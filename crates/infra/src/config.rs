//! Configuration loading and representation.

use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
pub const DEFAULT_SERIAL_RETRIES: u32 = 3;

/// Runtime settings for the ledger service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// `LEDGER_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `DATABASE_URL`; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// `LEDGER_READ_CACHE`
    pub read_cache: bool,
    /// `LEDGER_SERIAL_RETRIES`: retries per import row after a serial collision.
    pub serial_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            database_url: None,
            read_cache: true,
            serial_retries: DEFAULT_SERIAL_RETRIES,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Malformed values fall back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: parse_or("LEDGER_BIND_ADDR", lookup("LEDGER_BIND_ADDR"), defaults.bind_addr),
            database_url: lookup("DATABASE_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            read_cache: parse_or("LEDGER_READ_CACHE", lookup("LEDGER_READ_CACHE"), defaults.read_cache),
            serial_retries: parse_or(
                "LEDGER_SERIAL_RETRIES",
                lookup("LEDGER_SERIAL_RETRIES"),
                defaults.serial_retries,
            ),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, fallback = %default, "ignoring malformed setting");
            default
        }
    }
}
