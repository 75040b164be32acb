//! Tracing and logging support.
//!
//! Structured logging for the framework and its plugins via the `tracing`
//! crate, with one-call subscriber initialization. The engine itself only
//! emits events; whether and how they render is decided here, once, by the
//! host binary.

#[cfg(feature = "tracing")]
pub use tracing::{self, debug, error, info, instrument, trace, warn};

#[cfg(feature = "tracing")]
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Tracing output format.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable format with colors (default for development).
    Pretty,

    /// Compact format without colors.
    Compact,

    /// JSON format (recommended for production).
    Json,
}

/// Tracing configuration.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter.
    ///
    /// If None, uses the RUST_LOG environment variable or defaults to
    /// "info".
    pub level: Option<tracing::Level>,

    /// Output format.
    pub format: TracingFormat,

    /// Include timestamps in output.
    pub timestamps: bool,

    /// Include target module names in output.
    pub target: bool,
}

#[cfg(feature = "tracing")]
impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: TracingFormat::Pretty,
            timestamps: true,
            target: true,
        }
    }
}

/// Initialize the tracing subscriber with default settings.
///
/// Uses the RUST_LOG environment variable for level filtering and falls
/// back to "info" when it is unset.
///
/// # Example
///
/// ```ignore
/// fn main() {
///     gantry::init_subscriber();
///
///     // Your application code
/// }
/// ```
///
/// # Environment Variables
///
/// - `RUST_LOG=debug` - Enable debug logs
/// - `RUST_LOG=myapp=debug,gantry=trace` - Per-module filtering
#[cfg(feature = "tracing")]
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

/// Initialize the tracing subscriber with custom configuration.
///
/// # Example
///
/// ```ignore
/// use gantry::{init_subscriber_with_config, TracingConfig, TracingFormat};
///
/// fn main() {
///     init_subscriber_with_config(TracingConfig {
///         format: TracingFormat::Json,
///         ..Default::default()
///     });
/// }
/// ```
#[cfg(feature = "tracing")]
pub fn init_subscriber_with_config(config: TracingConfig) {
    let filter = match config.level {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt = tracing_subscriber::fmt::layer().with_target(config.target);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match (config.format, config.timestamps) {
        (TracingFormat::Pretty, true) => fmt.pretty().boxed(),
        (TracingFormat::Pretty, false) => fmt.pretty().without_time().boxed(),
        (TracingFormat::Compact, true) => fmt.compact().boxed(),
        (TracingFormat::Compact, false) => fmt.compact().without_time().boxed(),
        (TracingFormat::Json, true) => fmt.json().boxed(),
        (TracingFormat::Json, false) => fmt.json().without_time().boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
}

// Fallback when the tracing feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_subscriber() {
    // No-op when tracing is disabled
}
