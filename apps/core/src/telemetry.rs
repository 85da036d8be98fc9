use std::env;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// `RUST_LOG` selects levels (default `info`); `LOG_FORMAT=json` switches to
/// bunyan-style JSON lines.
pub fn init_tracing(app_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let subscriber = Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(app_name.to_string(), std::io::stderr));
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to install tracing subscriber: {}", e);
        }
    } else if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}
