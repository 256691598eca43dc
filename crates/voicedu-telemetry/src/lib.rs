//! Logging and trace export for Voicedu
//!
//! Logs always go to stdout through `tracing-subscriber`. Spans are exported
//! over OTLP only when `[telemetry]` names an exporter.

mod metadata;

use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use voicedu_config::{
    TelemetryConfig,
    telemetry::{
        exporters::{ExportProtocol, ExporterConfig},
        tracing::TracingConfig,
    },
};

/// Flushes and shuts down the tracer provider on drop
///
/// Hold it for the lifetime of the process.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Install the global subscriber
///
/// `log_filter` is an `EnvFilter` directive; an invalid one falls back to `info`.
///
/// # Errors
///
/// Returns an error if the OTLP span exporter cannot be built
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let exporter = config.and_then(|c| c.trace_exporter().map(|exporter| (c, exporter)));

    let Some((telemetry_config, exporter_config)) = exporter else {
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        return Ok(TelemetryGuard { tracer_provider: None });
    };

    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(telemetry_config))
        .with_sampler(sampler(telemetry_config.tracing.as_ref()))
        .with_batch_exporter(build_span_exporter(exporter_config)?)
        .build();

    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer_provider.tracer("voicedu"));
    global::set_tracer_provider(tracer_provider.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    tracing::debug!("Exporting spans to {}", exporter_config.endpoint);

    Ok(TelemetryGuard {
        tracer_provider: Some(tracer_provider),
    })
}

fn sampler(config: Option<&TracingConfig>) -> Sampler {
    let rate = config.map_or(1.0, |t| t.sampling_rate);

    let sampler = if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    };

    if config.is_none_or(|t| t.parent_based) {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    }
}

fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}
