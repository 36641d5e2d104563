//! Tracing setup with optional file-based OTLP export.
//!
//! Diagnostics always go to stderr through a `tracing-subscriber` fmt layer.
//! When a trace file is configured, spans are additionally exported through
//! OpenTelemetry and appended to that file as OTLP JSON, one batch per line:
//!
//! ```text
//! tracing macros → tracing-opentelemetry → OtlpFileExporter → RotatingFile
//! ```
//!
//! The filter comes from `RUST_LOG` when set, otherwise from
//! [`Config::trace_level`](crate::Config::trace_level), otherwise `"warn"`.
//!
//! ```rust,no_run
//! use pindrop::observability::init_tracing;
//! use pindrop::Config;
//!
//! let _guard = init_tracing(&Config::default());
//! tracing::debug!("tracing is active");
//! ```

mod exporter;
mod init;
mod rotating;

pub use init::{init_tracing, TracingGuard};
