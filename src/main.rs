//! `k8s-demo` binary: reads config from the environment, serves the three
//! routes, exits cleanly on SIGTERM.

use k8s_demo::{AppInfo, Config, Error, Server, routes};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "k8s_demo=info";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let info = AppInfo::from_env();
    tracing::info!(app = %info.app, env = %info.env, version = %info.version, "starting");

    Server::bind(config.listen_addr()).await?.serve(routes::app()).await
}
