//! Error Module - Runtime Error Types
//!
//! # Error Categories
//!
//! ## Allocation Errors
//! - `OutOfMemory` - host allocator returned null
//! - `InvalidSize` - negative size requested by generated code
//! - `ObjectTooLarge` - request above the configured limit
//!
//! ## Dispatch Errors (checked dispatch only)
//! - `NullObject` - method lookup on a null object
//! - `NullMethodTable` - object whose method table pointer is null
//! - `InvalidOffset` - negative or non word aligned offset
//!
//! ## Configuration Errors
//! - `Configuration` - invalid runtime configuration

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for runtime operations
///
/// At the C boundary every variant is fatal; see [`crate::runtime::fatal`].
#[derive(Debug, Error)]
pub enum RtError {
    /// Host allocator returned null
    #[error("Out of memory: requested {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Negative allocation size
    #[error("Invalid object size: {size}")]
    InvalidSize { size: i64 },

    /// Allocation above `max_object_size`
    #[error("Object too large: requested {requested} bytes, limit {limit} bytes")]
    ObjectTooLarge { requested: usize, limit: usize },

    /// Virtual method lookup on a null object
    #[error("Virtual method lookup on null object")]
    NullObject,

    /// Object whose first word is null
    #[error("Object {object:#x} has a null method table")]
    NullMethodTable { object: usize },

    /// Negative or non word aligned slot or vtable offset
    #[error("Invalid {what} offset: {offset}")]
    InvalidOffset { what: &'static str, offset: i64 },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RtError>;
