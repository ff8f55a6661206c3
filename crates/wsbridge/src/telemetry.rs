//! Tracing subscribers for hosts embedding the bridge.
//!
//! The dispatcher only emits `tracing` events under the `wsbridge::dispatch`
//! target; it never installs a subscriber by itself. Hosts that already run
//! their own subscriber need nothing from this module. Hosts that do not can
//! build one from a [`BridgeConfig`] with [`subscriber`] and install it
//! however they like (globally, per thread with
//! [`tracing::subscriber::with_default`], or per task), or call
//! [`initialise`] to install it process-wide once.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use wsbridge_config::{BridgeConfig, LogFormat};

static GLOBAL_SUBSCRIBER: OnceCell<()> = OnceCell::new();

/// Subscriber built from a [`BridgeConfig`].
pub type BridgeSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// Handle returned once the process-wide subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        /// Filter as configured.
        filter: String,
        /// Parser error.
        source: ParseError,
    },
    /// Another subscriber already owns the global slot.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Builds the configured subscriber writing to stderr.
///
/// Colour is enabled only when stderr is a terminal.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse.
pub fn subscriber(config: &BridgeConfig) -> Result<BridgeSubscriber, TelemetryError> {
    build(config, io::stderr, io::stderr().is_terminal())
}

/// Builds the configured subscriber over a caller-supplied writer.
///
/// Output is never coloured.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse.
pub fn subscriber_with_writer<W>(
    config: &BridgeConfig,
    writer: W,
) -> Result<BridgeSubscriber, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    build(config, writer, false)
}

/// Installs [`subscriber`] as the global default on first use.
///
/// Later calls return a handle without touching global state. Prefer
/// [`subscriber`] when the host manages its own subscribers.
///
/// # Examples
///
/// ```rust
/// use wsbridge::telemetry;
/// use wsbridge_config::BridgeConfig;
///
/// # fn main() -> Result<(), wsbridge::telemetry::TelemetryError> {
/// let config = BridgeConfig::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop(first);
/// drop(second);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse and [`TelemetryError::Subscriber`] when another subscriber is
/// already installed globally.
pub fn initialise(config: &BridgeConfig) -> Result<TelemetryHandle, TelemetryError> {
    GLOBAL_SUBSCRIBER
        .get_or_try_init(|| {
            let subscriber = subscriber(config)?;
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::from)
        })
        .map(|_| TelemetryHandle)
}

fn build<W>(config: &BridgeConfig, writer: W, ansi: bool) -> Result<BridgeSubscriber, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter()).map_err(|source| {
        TelemetryError::Filter {
            filter: config.log_filter().to_owned(),
            source,
        }
    })?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    })
}
