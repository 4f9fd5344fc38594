//! Observability setup for Mobilia: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
