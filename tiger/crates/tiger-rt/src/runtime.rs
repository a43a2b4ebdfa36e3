//! Runtime state shared by all exports
//!
//! One [`Runtime`] per process, created on first use from `TIGER_RT_*`
//! environment variables. The C exports in `ffi.rs` forward here.

use std::ffi::c_void;
use std::sync::OnceLock;

use crate::config::RuntimeConfig;
use crate::dispatch;
use crate::error::{Result, RtError};
use crate::heap::{checked_object_size, HostHeap, ObjectAllocator};
use crate::logging::{self, log_enabled, log_event, LogLevel, LogSink, LoggerConfig, RtEvent};
use crate::object::Object;
use crate::output;
use crate::stats::{RuntimeStats, StatsSummary};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Exit status used for fatal runtime errors
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Runtime {
    config: RuntimeConfig,
    heap: HostHeap,
    stats: RuntimeStats,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            heap: HostHeap::new(),
            stats: RuntimeStats::new(),
        }
    }

    /// Process-wide runtime, initialized from the environment on first call
    ///
    /// An invalid environment is fatal.
    pub fn global() -> &'static Runtime {
        RUNTIME.get_or_init(|| match RuntimeConfig::from_env() {
            Ok(config) => {
                install_logger(&config);
                Runtime::new(config)
            },
            Err(e) => fatal(e.into()),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    /// Allocate an object of `size` bytes and store `vtable` in its first word
    pub fn new_object(&self, size: i64, vtable: *const c_void) -> Result<Object> {
        let bytes = checked_object_size(size, self.config.max_object_size)
            .map_err(|e| self.allocation_failed(size, e))?;

        let block = self
            .heap
            .allocate(bytes, self.config.zero_fill)
            .map_err(|e| self.allocation_failed(size, e))?;

        // SAFETY: `block` is a fresh allocation of at least one word.
        let object = unsafe { Object::init(block, vtable) };
        self.stats.record_allocation(bytes);

        if log_enabled(LogLevel::Trace) {
            log_event(RtEvent::Allocation {
                size: bytes,
                address: object.addr(),
                vtable: vtable as usize,
            });
        }
        Ok(object)
    }

    fn allocation_failed(&self, size: i64, err: RtError) -> RtError {
        log_event(allocation_failure_event(size, &err));
        err
    }

    /// Resolve the code address for a virtual call
    ///
    /// # Safety
    /// Unless `check_dispatch` is set, `obj` must be a live object with a valid
    /// method table; see [`dispatch::lookup_unchecked`].
    pub unsafe fn virtual_method(
        &self,
        obj: *const c_void,
        vtable_offset: i64,
        method_offset: i64,
    ) -> Result<usize> {
        let target = if self.config.check_dispatch {
            dispatch::lookup_checked(obj, vtable_offset, method_offset)?
        } else {
            dispatch::lookup_unchecked(obj, vtable_offset, method_offset)
        };
        self.stats.record_dispatch();

        if log_enabled(LogLevel::Trace) {
            log_event(RtEvent::Dispatch {
                object: obj as usize,
                method_offset: method_offset as usize,
                target,
            });
        }
        Ok(target)
    }

    /// `Tiger_print` body; write errors are dropped like `printf` drops them
    pub fn print_int(&self, n: i64) {
        self.stats.record_print();
        let _ = output::print_int(n);
    }

    /// `Tiger_debugPrint` body
    pub fn print_debug(&self, text: Option<&[u8]>) {
        self.stats.record_debug_print();
        let _ = output::print_debug_str(text);
    }

    /// Flush output and report counters once the entry routine returned
    pub fn finish(&self, exit_code: i32) -> StatsSummary {
        let _ = output::flush_stdout();
        let summary = self.stats.summary();

        log_event(RtEvent::Shutdown { exit_code });
        if self.config.stats {
            // Summary is requested explicitly, so it bypasses the level filter.
            let mut logger = logging::RtLogger::new(LoggerConfig {
                level: LogLevel::Info,
                json: self.config.log_json,
                timestamps: self.config.log_timestamps,
                sink: LogSink::Stderr,
            });
            logger.log(&summary.to_event());
        }
        summary
    }
}

fn install_logger(config: &RuntimeConfig) {
    logging::configure_logger(LoggerConfig {
        level: config.log_level,
        json: config.log_json,
        timestamps: config.log_timestamps,
        sink: LogSink::Stderr,
    });
}

fn allocation_failure_event(requested: i64, err: &RtError) -> RtEvent {
    RtEvent::AllocationFailure {
        size: requested,
        reason: err.to_string(),
    }
}

/// Report an unrecoverable error and exit with status 1
pub fn fatal(err: RtError) -> ! {
    log_event(RtEvent::Fatal {
        message: err.to_string(),
    });
    let _ = output::flush_stdout();
    eprintln!("Tiger runtime: fatal: {}", err);
    std::process::exit(FATAL_EXIT_CODE);
}
