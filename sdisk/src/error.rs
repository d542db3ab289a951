//!
//! # SDisk Result and Error Types
//!

// Std-Lib
use std::path::PathBuf;

// Local Imports
use crate::utils::{self, ErrorContext};

/// # [ParamError] Result Type
pub type ParamResult<T> = Result<T, ParamError>;

///
/// # Parameter-Loading Error Enumeration
///
/// Produced by [crate::DiskParams::try_load], and absorbed by [crate::DiskParams::load],
/// which substitutes the complete default parameter set.
///
#[derive(Debug)]
pub enum ParamError {
    /// Failure reading or parsing the parameter file, including missing fields
    Read {
        path: PathBuf,
        err: utils::ser::Error,
    },
    /// Failure writing a parameter record
    Write {
        path: PathBuf,
        err: utils::ser::Error,
    },
}
impl ParamError {
    /// Boolean indication of whether the parameter file was absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Read { err, .. } | Self::Write { err, .. } => err.is_not_found(),
        }
    }
}
impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Read { path, err } => {
                write!(f, "Failed to load parameters from {}: {}", path.display(), err)
            }
            Self::Write { path, err } => {
                write!(f, "Failed to save parameters to {}: {}", path.display(), err)
            }
        }
    }
}
impl std::error::Error for ParamError {}

/// # [DiskError] Result Type
pub type DiskResult<T> = Result<T, DiskError>;

///
/// # Disk Error Enumeration
///
pub enum DiskError {
    /// Parameter invariant violated
    Validation {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Invalid or empty geometry
    Geometry {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Error Exporting to GDSII or the parameter record
    Export {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// File-system errors
    Io(std::io::Error),
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
}
impl std::fmt::Debug for DiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiskError::Validation { message, stack } => {
                write!(f, "Validation Error: \n - {} \n - {:?}", message, stack)
            }
            DiskError::Geometry { message, stack } => {
                write!(f, "Geometry Error: \n - {} \n - {:?}", message, stack)
            }
            DiskError::Export { message, stack } => {
                write!(f, "Export Error: \n - {} \n - {:?}", message, stack)
            }
            DiskError::Io(err) => write!(f, "{}", err),
            DiskError::Boxed(err) => write!(f, "{}", err),
        }
    }
}
impl std::fmt::Display for DiskError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for DiskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}
impl From<std::io::Error> for DiskError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<utils::ser::Error> for DiskError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<ParamError> for DiskError {
    fn from(e: ParamError) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<sdiskgds::GdsError> for DiskError {
    fn from(e: sdiskgds::GdsError) -> Self {
        Self::Export {
            message: e.to_string(),
            stack: vec![ErrorContext::Export("gds".into())],
        }
    }
}
