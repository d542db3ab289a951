//!
//! # SDisk GDSII Stream Writer & Reader
//!
//! Photomask layouts leave SDisk as GDSII, the de facto standard for sharing layout data.
//! This crate stores layout data on GDSII's terms, using GDSII's idioms and naming conventions,
//! and supports the subset of the format SDisk layouts use:
//! a single-library tree of cells holding polygons ([GdsBoundary]) and wires ([GdsPath]).
//!
//! Layout data is represented in three forms:
//!
//! * A short tree: a [GdsLibrary] holds cell definitions ([GdsStruct]s), which hold [GdsElement]s.
//! * For storage, the tree is flattened to a series of [GdsRecord]s.
//! * Records are stored on-disk in GDSII's big-endian binary form.
//!   These raw bytes are only generated and consumed on their way into and out of [std::io::Read] and [std::io::Write] objects.
//!
//! ## Usage
//!
//! ```
//! use sdiskgds::{GdsLibrary, GdsStruct};
//! let mut lib = GdsLibrary::new("mylib");
//! lib.structs.push(GdsStruct::new("mycell"));
//! let bytes = lib.to_bytes().unwrap();
//! assert_eq!(GdsLibrary::from_bytes(&bytes).unwrap(), lib);
//! ```
//!

// Local modules
mod data;
pub use data::*;
mod read;
pub use read::*;
mod write;
pub use write::*;

#[cfg(test)]
mod tests;
