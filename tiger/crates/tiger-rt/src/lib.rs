//! Tiger Runtime Library
//!
//! Runtime support for programs produced by the Tiger compiler:
//! - object allocation with a method-table pointer at offset zero
//! - integer and debug-string printing
//! - virtual method lookup
//! - the process entry sequence that calls the generated `Tiger_main`
//!
//! Generated code reaches the runtime through the C ABI exports in [`ffi`].
//! Everything else is a plain Rust API that the exports forward to, so it can
//! be tested and reused without going through raw symbols.
//!
//! ## Object Layout
//!
//! ```text
//! ┌──────────────────────────┐  offset 0
//! │  method table pointer    │ ──► ┌────────────────┐
//! ├──────────────────────────┤     │ slot 0: code   │  offset 0
//! │  field 0                 │     │ slot 1: code   │  offset WORD
//! ├──────────────────────────┤     │ ...            │
//! │  field 1                 │     └────────────────┘
//! │  ...                     │
//! └──────────────────────────┘
//! ```

pub mod abi;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod ffi;
pub mod heap;
pub mod layout;
pub mod logging;
pub mod object;
pub mod output;
pub mod runtime;
pub mod stats;

pub use config::{ConfigError, RuntimeConfig};
pub use error::{Result, RtError};
pub use heap::{HostHeap, ObjectAllocator};
pub use layout::{ClassDecl, ClassLayout, LayoutError, LayoutTable};
pub use logging::{LogLevel, RtEvent};
pub use object::{MethodTable, Object};
pub use runtime::Runtime;
pub use stats::{RuntimeStats, StatsSummary};
