//! Structured logging with component context.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Log level for structured logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Component that emitted the entry (e.g. "cart").
    pub component: String,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}] {}: {}", self.level, self.component, self.message);

        if let Some(elapsed) = self.elapsed_us {
            s.push_str(&format!(" ({}us)", elapsed));
        }

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for production/log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Structured logger with component context.
///
/// Every entry carries the component name and, on targets with a monotonic
/// clock, the time elapsed since the logger was created. Entries below the minimum level are dropped before
/// they are built.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    component: String,
    start_time: Option<Instant>,
    min_level: LogLevel,
    format: LogFormat,
    silent: bool,
}

impl StructuredLogger {
    /// Create a new logger for a component.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            start_time: clock_start(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
            silent: false,
        }
    }

    /// A logger that builds nothing and writes nothing.
    pub fn silent() -> Self {
        let mut logger = Self::new("silent");
        logger.silent = true;
        logger
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Whether an entry at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        !self.silent && level >= self.min_level
    }

    /// Log at trace level.
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, BTreeMap::new());
    }

    /// Log at debug level.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    /// Log at info level.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    /// Log at warn level.
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    /// Log at error level.
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Log with additional fields.
    pub fn log_with_fields(
        &self,
        level: LogLevel,
        message: &str,
        fields: BTreeMap<String, serde_json::Value>,
    ) {
        self.log(level, message, fields);
    }

    /// Build the entry that would be written, or `None` if filtered out.
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: BTreeMap<String, serde_json::Value>,
    ) -> Option<LogEntry> {
        if !self.enabled(level) {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            component: self.component.clone(),
            fields,
            elapsed_us: self.elapsed_us(),
        })
    }

    /// Render an entry in this logger's format.
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Json => entry.to_json(),
            LogFormat::Human => entry.to_human(),
        }
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if let Some(entry) = self.entry(level, message, fields) {
            write_line(level, &self.render(&entry));
        }
    }

    /// Get the component name.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Get elapsed time since logger creation, where the target has a
    /// monotonic clock.
    pub fn elapsed_us(&self) -> Option<u64> {
        self.start_time
            .map(|start| start.elapsed().as_micros() as u64)
    }
}

// `Instant::now` panics on wasm32-unknown-unknown (no clock import).
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
fn clock_start() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
fn clock_start() -> Option<Instant> {
    None
}

// stderr goes nowhere in a browser; use the devtools console there.
#[cfg(all(feature = "browser", target_arch = "wasm32"))]
fn write_line(level: LogLevel, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        LogLevel::Error => web_sys::console::error_1(&value),
        LogLevel::Warn => web_sys::console::warn_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

// Spin and native hosts capture stderr.
#[cfg(not(all(feature = "browser", target_arch = "wasm32")))]
fn write_line(_level: LogLevel, line: &str) {
    eprintln!("{}", line);
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an unsigned integer field.
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a signed integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Add a boolean field.
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Finish without writing, returning the entry (if not filtered).
    pub fn build(self) -> Option<LogEntry> {
        self.logger.entry(self.level, &self.message, self.fields)
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }

    /// Start building a trace log entry.
    pub fn trace_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Trace, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_min_level_filters_entries() {
        let logger = StructuredLogger::new("cart").with_min_level(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Error));
        assert!(logger.info_builder("hidden").build().is_none());
        assert!(logger.warn_builder("shown").build().is_some());
    }

    #[test]
    fn test_native_entries_carry_elapsed_time() {
        let logger = StructuredLogger::new("cart");
        let entry = logger.info_builder("timed").build().unwrap();
        assert!(entry.elapsed_us.is_some());
        assert!(logger.elapsed_us().is_some());
    }

    #[test]
    fn test_silent_logger_builds_nothing() {
        let logger = StructuredLogger::silent();
        assert!(!logger.enabled(LogLevel::Error));
        assert!(logger.entry(LogLevel::Error, "x", BTreeMap::new()).is_none());
    }

    #[test]
    fn test_json_entry_flattens_fields() {
        let logger = StructuredLogger::new("cart");
        let entry = logger
            .warn_builder("persist failed")
            .field("key", "rudesalud_cart_v1")
            .field_u64("items", 2)
            .build()
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["component"], "cart");
        assert_eq!(json["message"], "persist failed");
        assert_eq!(json["key"], "rudesalud_cart_v1");
        assert_eq!(json["items"], 2);
    }

    #[test]
    fn test_human_format() {
        let entry = LogEntry {
            level: LogLevel::Debug,
            message: "hydrated".to_string(),
            component: "cart".to_string(),
            fields: BTreeMap::from([("items".to_string(), serde_json::json!(3))]),
            elapsed_us: None,
        };
        assert_eq!(entry.to_human(), "[DEBUG] cart: hydrated | items=3");
    }

    #[test]
    fn test_render_uses_format() {
        let logger = StructuredLogger::new("cart").with_format(LogFormat::Human);
        let entry = logger.info_builder("ok").build().unwrap();
        assert!(logger.render(&entry).starts_with("[INFO] cart: ok"));
    }

    #[test]
    fn test_level_and_format_deserialize_lowercase() {
        let level: LogLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(level, LogLevel::Debug);
        let format: LogFormat = serde_json::from_str(r#""human""#).unwrap();
        assert_eq!(format, LogFormat::Human);
    }
}
