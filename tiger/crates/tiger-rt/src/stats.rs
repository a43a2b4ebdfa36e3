//! Stats Module - runtime counters
//!
//! Counts what generated code asked the runtime to do. Counters are relaxed
//! atomics; they are read once at exit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use crate::logging::RtEvent;

/// RuntimeStats - counters for allocations, prints and dispatches
pub struct RuntimeStats {
    objects: AtomicU64,
    bytes: AtomicU64,
    prints: AtomicU64,
    debug_prints: AtomicU64,
    dispatches: AtomicU64,
    start_time: Instant,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self {
            objects: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            prints: AtomicU64::new(0),
            debug_prints: AtomicU64::new(0),
            dispatches: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one object of `size` bytes
    #[inline]
    pub fn record_allocation(&self, size: usize) {
        self.objects.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_print(&self) {
        self.prints.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_debug_print(&self) {
        self.debug_prints.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get summary statistics
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            objects: self.objects.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            prints: self.prints.load(Ordering::Relaxed),
            debug_prints: self.debug_prints.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            uptime_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.objects.store(0, Ordering::Relaxed);
        self.bytes.store(0, Ordering::Relaxed);
        self.prints.store(0, Ordering::Relaxed);
        self.debug_prints.store(0, Ordering::Relaxed);
        self.dispatches.store(0, Ordering::Relaxed);
    }
}

impl Default for RuntimeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    /// Objects allocated
    pub objects: u64,
    /// Bytes handed out (after rounding)
    pub bytes: u64,
    /// Calls to `Tiger_print`
    pub prints: u64,
    /// Calls to `Tiger_debugPrint`
    pub debug_prints: u64,
    /// Calls to `Tiger_getVirtualMethod`
    pub dispatches: u64,
    /// Time since runtime start (ms)
    pub uptime_ms: u64,
}

impl StatsSummary {
    pub fn to_event(&self) -> RtEvent {
        RtEvent::Summary {
            objects: self.objects,
            bytes: self.bytes,
            prints: self.prints + self.debug_prints,
            dispatches: self.dispatches,
        }
    }
}
