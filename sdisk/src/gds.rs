//!
//! # GDSII Export Module
//!

// Crates.io
use geo::Coord;
use sdiskgds::{GdsBoundary, GdsElement, GdsLibrary, GdsPath, GdsPoint, GdsStruct, GdsUnits};

// Local imports
use crate::error::{DiskError, DiskResult};
use crate::geom::{Path, Point, Polygon, Region, Shape};
use crate::layout::{Cell, Element, Layout};
use crate::utils::ErrorContext;

/// Largest number of points in a single GDSII `XY` record
pub const MAX_XY_POINTS: usize = 8191;

/// # GDSII Converter
/// Converts a [Layout] to a GDSII library ([GdsLibrary]).
#[derive(Debug)]
pub struct GdsConverter<'lib> {
    pub layout: &'lib Layout,
    ctx_stack: Vec<ErrorContext>,
}
impl<'lib> GdsConverter<'lib> {
    pub fn convert(layout: &'lib Layout) -> DiskResult<GdsLibrary> {
        Self {
            layout,
            ctx_stack: Vec::new(),
        }
        .convert_all()
    }
    fn convert_all(mut self) -> DiskResult<GdsLibrary> {
        let mut lib = GdsLibrary::new(&self.layout.name);
        // Database unit in micrometers, and in meters
        lib.units = GdsUnits::new(self.layout.dbu, self.layout.dbu * 1e-6);
        let layout = self.layout;
        for cell in layout.cells.iter() {
            lib.structs.push(self.convert_cell(cell)?);
        }
        Ok(lib)
    }
    /// Convert a [Cell] to a [GdsStruct] cell-definition
    fn convert_cell(&mut self, cell: &Cell) -> DiskResult<GdsStruct> {
        self.ctx_stack.push(ErrorContext::Cell(cell.name.clone()));
        let mut s = GdsStruct::new(&cell.name);
        for elem in cell.elems.iter() {
            s.elems.extend(self.convert_element(elem)?);
        }
        self.ctx_stack.pop();
        Ok(s)
    }
    /// Convert an [Element] into one or more [GdsElement]s.
    /// [Region]s produce one element per polygon.
    pub fn convert_element(&self, elem: &Element) -> DiskResult<Vec<GdsElement>> {
        let spec = match self.layout.layer_spec(elem.layer) {
            Some(spec) => *spec,
            None => return self.fail(format!("Layer {:?} Not Defined", elem.layer)),
        };
        let elems = match &elem.shape {
            Shape::Path(path) => vec![GdsPath {
                layer: spec.layer,
                datatype: spec.datatype,
                xy: self.check_len(dedup(self.path_points(path)?))?,
                width: Some(self.to_dbu(path.width)?),
                path_type: Some(0),
            }
            .into()],
            Shape::Polygon(poly) => {
                let xy = close(dedup(self.poly_points(poly)?));
                vec![self.boundary(spec.layer, spec.datatype, xy)?]
            }
            Shape::Region(region) => self
                .region_points(region)?
                .into_iter()
                .map(|xy| self.boundary(spec.layer, spec.datatype, xy))
                .collect::<DiskResult<Vec<GdsElement>>>()?,
        };
        Ok(elems)
    }
    /// Create a [GdsBoundary] from closed point-list `xy`.
    /// Fails if grid-snapping has collapsed it below a triangle.
    fn boundary(&self, layer: i16, datatype: i16, xy: Vec<GdsPoint>) -> DiskResult<GdsElement> {
        if xy.len() < 4 {
            return self.fail(format!(
                "Polygon collapses to {} distinct points on the {} um grid",
                xy.len().saturating_sub(1),
                self.layout.dbu
            ));
        }
        let xy = self.check_len(xy)?;
        Ok(GdsBoundary {
            layer,
            datatype,
            xy,
        }
        .into())
    }
    /// Convert micrometer [Path] points to database units
    fn path_points(&self, path: &Path) -> DiskResult<Vec<GdsPoint>> {
        path.points.iter().map(|p| self.point(p)).collect()
    }
    /// Convert micrometer [Polygon] points to database units
    fn poly_points(&self, poly: &Polygon) -> DiskResult<Vec<GdsPoint>> {
        poly.points.iter().map(|p| self.point(p)).collect()
    }
    fn point(&self, p: &Point) -> DiskResult<GdsPoint> {
        Ok(GdsPoint::new(self.to_dbu(p.x)?, self.to_dbu(p.y)?))
    }
    /// Convert a micrometer distance to integer database units
    fn to_dbu(&self, val: f64) -> DiskResult<i32> {
        self.grid(val / self.layout.dbu)
    }
    /// Snap a database-unit value to the 32-bit integer grid
    fn grid(&self, val: f64) -> DiskResult<i32> {
        let val = val.round();
        if !val.is_finite() || val < i32::MIN as f64 || val > i32::MAX as f64 {
            return self.fail(format!("Coordinate {} out of GDSII range", val));
        }
        Ok(val as i32)
    }
    /// Convert each polygon of a [Region] into a single closed point-list.
    ///
    /// GDSII boundaries have no holes. Each hole is instead spliced into its exterior
    /// by a zero-width "keyhole" cut between their closest pair of vertices.
    fn region_points(&self, region: &Region) -> DiskResult<Vec<Vec<GdsPoint>>> {
        let mut rv = Vec::new();
        for poly in region.polygons() {
            let mut ring = self.ring_points(&poly.exterior().0)?;
            for hole in poly.interiors() {
                let hole = self.ring_points(&hole.0)?;
                ring = keyhole(&ring, &hole);
            }
            rv.push(close(ring));
        }
        Ok(rv)
    }
    /// Convert a closed [geo::LineString]'s coordinates to an open list of [GdsPoint]s
    fn ring_points(&self, coords: &[Coord<f64>]) -> DiskResult<Vec<GdsPoint>> {
        let mut pts = coords
            .iter()
            .map(|c| Ok(GdsPoint::new(self.grid(c.x)?, self.grid(c.y)?)))
            .collect::<DiskResult<Vec<_>>>()?;
        pts = dedup(pts);
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        Ok(pts)
    }
    /// Check `xy` fits in a single GDSII record
    fn check_len(&self, xy: Vec<GdsPoint>) -> DiskResult<Vec<GdsPoint>> {
        if xy.len() > MAX_XY_POINTS {
            return self.fail(format!(
                "{} points exceeds the GDSII limit of {}",
                xy.len(),
                MAX_XY_POINTS
            ));
        }
        Ok(xy)
    }
    /// Error creation helper
    fn fail<T>(&self, msg: impl Into<String>) -> DiskResult<T> {
        Err(DiskError::Export {
            message: msg.into(),
            stack: self.ctx_stack.clone(),
        })
    }
}

/// Remove consecutive duplicate points, such as those created by grid-snapping
fn dedup(mut pts: Vec<GdsPoint>) -> Vec<GdsPoint> {
    pts.dedup();
    pts
}
/// Close an open point-list by repeating its origin
fn close(mut pts: Vec<GdsPoint>) -> Vec<GdsPoint> {
    if let Some(first) = pts.first().copied() {
        if pts.last() != Some(&first) {
            pts.push(first);
        }
    }
    pts
}
/// Splice open ring `hole` into open ring `outer`, through their closest pair of vertices.
/// The result is an open ring which visits `outer[i]`, walks all of `hole` from `hole[j]`
/// back to `hole[j]`, returns to `outer[i]`, and continues around `outer`.
fn keyhole(outer: &[GdsPoint], hole: &[GdsPoint]) -> Vec<GdsPoint> {
    if outer.is_empty() || hole.is_empty() {
        return outer.to_vec();
    }
    let dist2 = |a: &GdsPoint, b: &GdsPoint| -> i64 {
        let dx = i64::from(a.x) - i64::from(b.x);
        let dy = i64::from(a.y) - i64::from(b.y);
        dx * dx + dy * dy
    };
    let mut best = (0, 0, i64::MAX);
    for (i, o) in outer.iter().enumerate() {
        for (j, h) in hole.iter().enumerate() {
            let d = dist2(o, h);
            if d < best.2 {
                best = (i, j, d);
            }
        }
    }
    let (i, j, _) = best;
    let mut rv = Vec::with_capacity(outer.len() + hole.len() + 2);
    rv.extend_from_slice(&outer[..=i]);
    rv.extend_from_slice(&hole[j..]);
    rv.extend_from_slice(&hole[..=j]);
    rv.push(outer[i]);
    rv.extend_from_slice(&outer[i + 1..]);
    rv
}

impl Layout {
    /// Convert to a GDSII [GdsLibrary]
    pub fn to_gds(&self) -> DiskResult<GdsLibrary> {
        GdsConverter::convert(self)
    }
}
