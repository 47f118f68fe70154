//! Structured logging for the Rude Salud storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with component context
//! - `LogBuilder` - Fluent construction of entries with typed fields
//! - `LogEntry` - A single entry, rendered as JSON or human-readable text

mod logging;

pub use logging::*;
