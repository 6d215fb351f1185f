//! OpenTelemetry stdout exporters for spans and metrics.

use crate::LoggingConfig;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_sdk::{Resource, metrics::SdkMeterProvider, trace::SdkTracerProvider};
use opentelemetry_stdout::{MetricExporter, SpanExporter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Flushes and shuts the providers down when dropped.
///
/// Hold it until the run is over; a run is short enough that the periodic
/// metric reader would otherwise never export.
pub struct ObservabilityGuard {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        if let Err(e) = self.meter_provider.shutdown() {
            eprintln!("Failed to shut down meter provider: {}", e);
        }
        if let Err(e) = self.tracer_provider.shutdown() {
            eprintln!("Failed to shut down tracer provider: {}", e);
        }
    }
}

/// Install logging plus OpenTelemetry tracing and metrics.
///
/// # Errors
///
/// Returns error if the filter does not parse or a subscriber is already set.
pub fn init_observability(
    config: &LoggingConfig,
) -> Result<ObservabilityGuard, Box<dyn std::error::Error>> {
    let resource = Resource::builder()
        .with_service_name(env!("CARGO_PKG_NAME"))
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(tracer_provider.clone());

    let meter_provider = SdkMeterProvider::builder()
        .with_periodic_exporter(MetricExporter::default())
        .with_resource(resource)
        .build();
    global::set_meter_provider(meter_provider.clone());

    let tracer = tracer_provider.tracer(env!("CARGO_PKG_NAME"));
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .with(otel_layer)
        .try_init()?;

    Ok(ObservabilityGuard {
        tracer_provider,
        meter_provider,
    })
}
