//! # k8s-demo
//!
//! A tiny HTTP service for exercising a Kubernetes deployment: one route to
//! probe, one to inspect, one to kill the pod.
//!
//! | Route | Answer |
//! |---|---|
//! | `GET /health` | `200 ok` |
//! | `GET /info` | `{"app","env","version","hostname"}` from `APP_*` env vars and the OS |
//! | `GET /crash` | process exits with status 1, no response |
//!
//! Underneath is a small hyper server: a per-method [`matchit`] route table,
//! type-erased async handlers and SIGTERM-aware graceful shutdown.
//!
//! ```rust,no_run
//! use k8s_demo::{Config, Server, routes};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), k8s_demo::Error> {
//!     let config = Config::from_env()?;
//!     Server::bind(config.listen_addr()).await?.serve(routes::app()).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod routes;

pub use config::{AppInfo, Config};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
