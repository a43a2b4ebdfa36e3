//! Process entry sequence
//!
//! `tiger-start` defines the C `main` symbol and forwards here with the
//! generated `Tiger_main`. The program's exit status is always 0 once the
//! entry routine returns; fatal runtime errors exit with 1 before that.

use std::ffi::c_int;

use crate::abi::ENTRY_SYMBOL;
use crate::logging::{log_event, RtEvent};
use crate::runtime::Runtime;

/// Signature of the generated entry routine
pub type EntryFn = unsafe extern "C" fn() -> c_int;

/// Initialize the runtime, run `entry`, flush output and report stats
///
/// # Safety
/// `entry` must be a routine produced by the Tiger code generator (or one
/// honouring the same contract with the runtime exports).
pub unsafe fn run(entry: EntryFn) -> c_int {
    let runtime = Runtime::global();
    log_event(RtEvent::Startup {
        entry: ENTRY_SYMBOL.to_string(),
    });

    // The generated routine's return value is not the process status.
    let _ = entry();

    runtime.finish(0);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn fake_entry() -> c_int {
        CALLS.fetch_add(1, Ordering::SeqCst);
        42
    }

    #[test]
    fn test_run_calls_entry_and_returns_zero() {
        let status = unsafe { run(fake_entry) };
        assert_eq!(status, 0);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
