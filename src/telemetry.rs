use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,tower_http=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Later calls are no-ops, so tests may call it freely.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // Request spans report their duration when they close
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
