//! Subscriber initialization.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::exporter::file_tracer_provider;
use crate::Config;

const DEFAULT_LEVEL: &str = "warn";
const SERVICE_NAME: &str = "PinDrop";

/// Keeps the span exporter alive; flushes and shuts it down on drop.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops trace export"]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            let _ = provider.shutdown();
        }
    }
}

/// Installs the global subscriber.
///
/// Only the first call in a process takes effect. If the trace file's
/// directory cannot be created, OTLP export is skipped and stderr logging
/// still works.
pub fn init_tracing(config: &Config) -> TracingGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let provider = config.trace_file.as_ref().and_then(|path| {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).ok()?;
        }
        let resource = Resource::new(vec![
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        Some(file_tracer_provider(path.clone(), resource))
    });
    let otel_layer = provider
        .as_ref()
        .map(|p| OpenTelemetryLayer::new(p.tracer(super::exporter::SCOPE_NAME)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(otel_layer)
        .try_init();

    TracingGuard { provider }
}
