use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Registry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging on stderr, leaving stdout to command output.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    build_subscriber(config, std::io::stderr)?.try_init()?;

    tracing::info!("idv-register telemetry initialized");
    Ok(())
}

/// Subscriber writing JSON or human-readable lines to `writer`
pub fn build_subscriber<W>(
    config: &ObservabilityConfig,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = fmt_layer(config.json_logs, writer);
    Ok(tracing_subscriber::registry().with(layer).with(filter))
}

fn fmt_layer<S, W>(json: bool, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(writer).boxed()
    }
}

/// Generate a correlation ID for linking the calls of one submission
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one registration submission
pub fn create_registration_span(user_id: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "registration_submit",
        user.id = user_id,
        correlation.id = correlation_id,
    )
}
