//! Log and trace wiring for the Mobilia binary.
//!
//! One fmt layer for operator-readable logs, and an optional span bridge to
//! OpenTelemetry when the server is started with `--otel`. The stdout span
//! exporter is intentional: this service is inspected locally, and swapping
//! in an OTLP exporter is a one-line change here when that stops being true.

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set: quiet dependencies, chatty app.
const DEFAULT_DIRECTIVES: &str =
    "info,mobilia_core=debug,mobilia_infra=debug,mobilia_api=debug";

/// Kept so the provider created in `init_tracing` can be flushed at exit.
static OTEL_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the global subscriber. Call once, before any logging happens.
///
/// Fails when a subscriber is already installed.
pub fn init_tracing(export_spans: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let otel_layer = export_spans.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("mobilia-api");
        let _ = OTEL_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush buffered spans and release the exporter. No-op without `--otel`.
pub fn shutdown_tracing() {
    if let Some(provider) = OTEL_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            warn!(error = %e, "span exporter did not shut down cleanly");
        }
    }
}
