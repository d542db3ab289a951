//!
//! # SDisk Shared Utilities
//!
//! Markup file formats, error-context stacks, checking helpers, and named enumerations.
//!

pub mod context;
pub use context::*;
pub mod enumstr;
pub use enumstr::*;
pub mod error;
pub use error::*;
pub mod ser;
pub use ser::*;
