//! Environment-driven configuration.
//!
//! Two independent pieces:
//!
//! - [`Config`]: where to listen. Read once at startup from `HOST` / `PORT`.
//! - [`AppInfo`]: what `/info` reports. Read from `APP_NAME`, `APP_ENV` and
//!   `APP_VERSION` on every request, so a value is never stale.
//!
//! Both have a `from_lookup` constructor taking any `Fn(&str) -> Option<String>`
//! so tests can supply variables without touching the process environment.

use serde::Serialize;

use crate::error::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_APP_NAME: &str = "devops-node-k8s-demo";
pub const DEFAULT_APP_ENV: &str = "dev";
pub const DEFAULT_APP_VERSION: &str = "0.0.0";

/// Reads a variable from the process environment. Non-UTF-8 values are
/// treated as unset.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Returns the variable's value, or `None` when it is unset or empty.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.is_empty())
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Listen configuration.
///
/// `host` may be an IP literal or a name; names are resolved when the
/// server binds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let host = non_empty(&lookup, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());

        let port = match non_empty(&lookup, "PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| Error::Config {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// `(host, port)` in the form [`Server::bind`](crate::Server::bind) takes.
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

// ── AppInfo ───────────────────────────────────────────────────────────────────

/// Application metadata reported by `/info`, minus the hostname.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AppInfo {
    pub app: String,
    pub env: String,
    pub version: String,
}

impl AppInfo {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| non_empty(&lookup, key).unwrap_or_else(|| default.to_owned());
        Self {
            app: get("APP_NAME", DEFAULT_APP_NAME),
            env: get("APP_ENV", DEFAULT_APP_ENV),
            version: get("APP_VERSION", DEFAULT_APP_VERSION),
        }
    }
}
