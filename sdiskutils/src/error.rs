//!
//! # Checking Helpers
//!
//! [ErrorHelper] lets a checked object fail with errors that carry its own context:
//!
//! ```rust
//! use sdiskutils::error::ErrorHelper;
//!
//! struct Radius(f64);
//! impl ErrorHelper for Radius {
//!     type Error = String;
//!     fn err(&self, msg: impl Into<String>) -> String {
//!         format!("radius {}: {}", self.0, msg.into())
//!     }
//! }
//! let r = Radius(-1.0);
//! assert_eq!(
//!     r.assert(r.0 > 0.0, "must be positive"),
//!     Err("radius -1: must be positive".to_string())
//! );
//! ```
//!

/// # Error Helper
///
/// Implementers provide `err`, converting a message into their error type.
pub trait ErrorHelper {
    type Error;

    /// Create an error from `msg`
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Fail with `msg`
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Fail with `msg` unless `cond` holds
    fn assert(&self, cond: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        if cond {
            Ok(())
        } else {
            self.fail(msg)
        }
    }
}
