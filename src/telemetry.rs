use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
#[error("Failed to initialize telemetry")]
pub struct InitError;

/// Installs the global tracing subscriber: `RUST_LOG`-driven filtering,
/// console output and the [`ErrorLayer`] that lets errors capture
/// the spans they crossed.
pub fn init() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .change_context(InitError)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .try_init()
        .change_context(InitError)?;

    Ok(())
}
