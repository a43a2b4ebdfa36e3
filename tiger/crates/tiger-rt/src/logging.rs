//! Runtime Logging
//!
//! Event log for runtime operations. Everything goes to stderr so that the
//! program's stdout stays byte-for-byte what the Tiger program printed.
//!
//! Log Levels:
//! - ERROR: allocation failures, fatal errors
//! - WARN: unusual conditions
//! - INFO: exit summary
//! - DEBUG: startup and shutdown
//! - TRACE: per-object and per-dispatch operations

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

/// Log level for runtime events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Runtime event types
#[derive(Debug, Clone, PartialEq)]
pub enum RtEvent {
    /// Runtime initialized, about to call the entry routine
    Startup { entry: String },

    /// Object allocated
    Allocation {
        size: usize,
        address: usize,
        vtable: usize,
    },

    /// Allocation request could not be served; `size` is the requested size
    AllocationFailure { size: i64, reason: String },

    /// Virtual method resolved
    Dispatch {
        object: usize,
        method_offset: usize,
        target: usize,
    },

    /// Unrecoverable error, process is about to exit
    Fatal { message: String },

    /// Counters at exit
    Summary {
        objects: u64,
        bytes: u64,
        prints: u64,
        dispatches: u64,
    },

    /// Entry routine returned
    Shutdown { exit_code: i32 },
}

impl RtEvent {
    /// Get log level for event
    pub fn level(&self) -> LogLevel {
        match self {
            RtEvent::AllocationFailure { .. } | RtEvent::Fatal { .. } => LogLevel::Error,
            RtEvent::Summary { .. } => LogLevel::Info,
            RtEvent::Startup { .. } | RtEvent::Shutdown { .. } => LogLevel::Debug,
            RtEvent::Allocation { .. } | RtEvent::Dispatch { .. } => LogLevel::Trace,
        }
    }

    fn human(&self) -> String {
        match self {
            RtEvent::Startup { entry } => format!("[tiger-rt] starting, entry {}", entry),
            RtEvent::Allocation {
                size,
                address,
                vtable,
            } => format!(
                "[tiger-rt] new object {:#x}: {} bytes, vtable {:#x}",
                address, size, vtable
            ),
            RtEvent::AllocationFailure { size, reason } => {
                format!("[tiger-rt] allocation of {} bytes failed: {}", size, reason)
            },
            RtEvent::Dispatch {
                object,
                method_offset,
                target,
            } => format!(
                "[tiger-rt] dispatch on {:#x} slot +{} -> {:#x}",
                object, method_offset, target
            ),
            RtEvent::Fatal { message } => format!("[tiger-rt] fatal: {}", message),
            RtEvent::Summary {
                objects,
                bytes,
                prints,
                dispatches,
            } => format!(
                "[tiger-rt] {} objects ({} bytes), {} prints, {} dispatches",
                objects, bytes, prints, dispatches
            ),
            RtEvent::Shutdown { exit_code } => {
                format!("[tiger-rt] entry returned, exiting with {}", exit_code)
            },
        }
    }

    fn json(&self) -> serde_json::Value {
        match self {
            RtEvent::Startup { entry } => serde_json::json!({
                "type": "startup",
                "entry": entry
            }),
            RtEvent::Allocation {
                size,
                address,
                vtable,
            } => serde_json::json!({
                "type": "allocation",
                "size": size,
                "address": address,
                "vtable": vtable
            }),
            RtEvent::AllocationFailure { size, reason } => serde_json::json!({
                "type": "allocation_failure",
                "size": size,
                "reason": reason
            }),
            RtEvent::Dispatch {
                object,
                method_offset,
                target,
            } => serde_json::json!({
                "type": "dispatch",
                "object": object,
                "method_offset": method_offset,
                "target": target
            }),
            RtEvent::Fatal { message } => serde_json::json!({
                "type": "fatal",
                "message": message
            }),
            RtEvent::Summary {
                objects,
                bytes,
                prints,
                dispatches,
            } => serde_json::json!({
                "type": "summary",
                "objects": objects,
                "bytes": bytes,
                "prints": prints,
                "dispatches": dispatches
            }),
            RtEvent::Shutdown { exit_code } => serde_json::json!({
                "type": "shutdown",
                "exit_code": exit_code
            }),
        }
    }
}

/// Where formatted lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// Keep lines in memory (tests, embedding)
    Memory,
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum log level
    pub level: LogLevel,

    /// Enable JSON format
    pub json: bool,

    /// Enable timestamps
    pub timestamps: bool,

    /// Output destination
    pub sink: LogSink,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            json: false,
            timestamps: false,
            sink: LogSink::Stderr,
        }
    }
}

/// Runtime logger
pub struct RtLogger {
    config: LoggerConfig,
    lines: Vec<String>,
}

impl RtLogger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
        }
    }

    /// Check if an event of `level` would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level <= self.config.level
    }

    /// Log a runtime event
    pub fn log(&mut self, event: &RtEvent) {
        if !self.enabled(event.level()) {
            return;
        }

        let line = self.format(event);
        match self.config.sink {
            LogSink::Stderr => {
                let stderr = std::io::stderr();
                let mut handle = stderr.lock();
                let _ = writeln!(handle, "{}", line);
            },
            LogSink::Memory => self.lines.push(line),
        }
    }

    fn format(&self, event: &RtEvent) -> String {
        let body = if self.config.json {
            serde_json::to_string(&event.json()).unwrap_or_else(|_| event.human())
        } else {
            event.human()
        };

        if self.config.timestamps {
            let now = chrono::Local::now();
            format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), body)
        } else {
            body
        }
    }

    /// Lines kept by a memory sink
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for RtLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_LOGGER: Mutex<RtLogger> = Mutex::new(RtLogger::default());
}

/// Level of the global logger, readable without taking the lock
static GLOBAL_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);

/// Configure global logger
pub fn configure_logger(config: LoggerConfig) {
    GLOBAL_LEVEL.store(config.level as u8, Ordering::Relaxed);
    *GLOBAL_LOGGER.lock() = RtLogger::new(config);
}

/// Check the global level before building an event
#[inline]
pub fn log_enabled(level: LogLevel) -> bool {
    let current = LogLevel::from_u8(GLOBAL_LEVEL.load(Ordering::Relaxed));
    level != LogLevel::Off && level <= current
}

/// Log a runtime event to the global logger
pub fn log_event(event: RtEvent) {
    if log_enabled(event.level()) {
        GLOBAL_LOGGER.lock().log(&event);
    }
}
