use std::backtrace::Backtrace;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` overrides `logging.rust_log`.
/// Calling it again (e.g. from several tests) leaves the first subscriber in place.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.rust_log));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok();

    if installed {
        set_panic_hook();
    }
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
            *message
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic"
        };

        let backtrace = Backtrace::capture();
        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(
            panic = %message,
            location = %location,
            backtrace = %backtrace,
            "panic"
        );
    }));
}
