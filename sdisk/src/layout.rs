//!
//! # Layout Data Model
//!
//! A [Layout] is a named container of [Cell]s and layer definitions.
//! Each [Cell] accumulates [Shape]s, each inserted on a layer identified by a [LayerIndex].
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::Shape;

/// Default database-unit size, in micrometers
pub const DEFAULT_DBU: f64 = 1e-3;

/// # GDSII Layer Specification
/// (layer, datatype) number-pair
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct LayerSpec {
    pub layer: i16,
    pub datatype: i16,
}
impl LayerSpec {
    pub fn new(layer: i16, datatype: i16) -> Self {
        Self { layer, datatype }
    }
}

/// # Layer Index
/// Stable small-integer identifier of a layer within a [Layout]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerIndex(usize);
impl LayerIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// # Element
/// A [Shape] placed on a layer
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub layer: LayerIndex,
    pub shape: Shape,
}

/// # Cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub name: String,
    pub elems: Vec<Element>,
}
impl Cell {
    /// Create a new and empty [Cell]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// Insert `shape` on `layer`
    pub fn insert(&mut self, layer: LayerIndex, shape: impl Into<Shape>) {
        self.elems.push(Element {
            layer,
            shape: shape.into(),
        })
    }
    /// Iterate over the shapes on `layer`
    pub fn shapes(&self, layer: LayerIndex) -> impl Iterator<Item = &Shape> {
        self.elems
            .iter()
            .filter(move |e| e.layer == layer)
            .map(|e| &e.shape)
    }
}

/// # Layout
///
/// Top-level container of [Cell]s, with a shared database unit and layer table.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Layout (Library) Name
    pub name: String,
    /// Database-unit size, in micrometers
    pub dbu: f64,
    /// Layer definitions, indexed by [LayerIndex]
    pub layers: Vec<LayerSpec>,
    /// Cell definitions
    pub cells: Vec<Cell>,
}
impl Layout {
    /// Create a new and empty [Layout] with the default database unit
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dbu: DEFAULT_DBU,
            layers: Vec::new(),
            cells: Vec::new(),
        }
    }
    /// Integer scaling from micrometers to database units
    pub fn scale(&self) -> f64 {
        (1.0 / self.dbu).round()
    }
    /// Get the [LayerIndex] of (`layer`, `datatype`), adding it to our layer table if necessary.
    pub fn layer(&mut self, layer: i16, datatype: i16) -> LayerIndex {
        let spec = LayerSpec::new(layer, datatype);
        match self.layers.iter().position(|l| *l == spec) {
            Some(idx) => LayerIndex(idx),
            None => {
                self.layers.push(spec);
                LayerIndex(self.layers.len() - 1)
            }
        }
    }
    /// Get the [LayerSpec] at `idx`, if defined
    pub fn layer_spec(&self, idx: LayerIndex) -> Option<&LayerSpec> {
        self.layers.get(idx.0)
    }
    /// Create a new [Cell] named `name`, and return a mutable reference to it
    pub fn create_cell(&mut self, name: impl Into<String>) -> &mut Cell {
        self.cells.push(Cell::new(name));
        let idx = self.cells.len() - 1;
        &mut self.cells[idx]
    }
    /// Get a reference to the [Cell] named `name`, if present
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name == name)
    }
}
