//! Observability setup for chatseg: structured logging with an optional
//! OpenTelemetry bridge.

pub mod tracing_setup;
