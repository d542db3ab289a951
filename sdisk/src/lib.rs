//!
//! # SDisk
//!
//! Parametric photomask layout for serpentine disks:
//! a central pedestal, several winding support arms radiating from it, and a surrounding ring.
//!
//! Generation runs as a single forward pipeline:
//!
//! * [DiskParams] are loaded from a YAML, JSON, or TOML file, falling back to complete defaults.
//! * An [Arm] curve, either [CircularArm] or [ZigzagArm], is stroked and placed at each rotation.
//!   The [circle] pedestal and [donut] ring are added alongside.
//! * [DiskLayout::build] collects all of these on a single layer of a single-cell [Layout].
//! * [export] writes the layout as auto-numbered GDSII, with a record of the parameters used.
//!
//! ```
//! use sdisk::{DiskLayout, DiskParams, Style};
//! let params = DiskParams::default_for(Style::Circular);
//! let layout = DiskLayout::build(&params).unwrap();
//! assert_eq!(layout.cells[0].elems.len(), 6);
//! ```
//!

// Internal modules & re-exports
pub use sdiskutils as utils;

pub mod arm;
pub use arm::*;
pub mod assembly;
pub use assembly::*;
pub mod disk;
pub use disk::*;
pub mod error;
pub use error::*;
pub mod export;
pub use export::*;
pub mod gds;
pub use gds::*;
pub mod geom;
pub use geom::*;
pub mod layout;
pub use layout::*;
pub mod params;
pub use params::*;

#[cfg(test)]
mod tests;
