use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI 日誌：RUST_LOG 有設定就照它，沒有時給本 crate debug 或 info
pub fn init_cli_logger(verbose: bool) {
    let default_directives = if verbose {
        "showroom_client=debug,info"
    } else {
        "showroom_client=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}
