//! The service's routes.
//!
//! | Path | Handler |
//! |---|---|
//! | `GET /health` | [`health::health`] |
//! | `GET /info` | [`info::info`] |
//! | `GET /crash` | [`crash::crash`] |
//!
//! Each path also answers with a single trailing slash.

pub mod crash;
pub mod health;
pub mod info;

use crate::Router;

/// Builds the full route table.
pub fn app() -> Router {
    Router::new()
        .get("/health",  health::health)
        .get("/health/", health::health)
        .get("/info",    info::info)
        .get("/info/",   info::info)
        .get("/crash",   crash::crash)
        .get("/crash/",  crash::crash)
}
