//!
//! # Geometry Module
//!
//! Defines the core geometric types [Point], [Path], [Polygon], [Region],
//! and the [Shape] enumeration inserted into layout cells.
//!
//! [Point]s, [Path]s and [Polygon]s are in floating-point micrometers.
//! [Region]s are the results of boolean operations, and are stored on the
//! integer database-unit grid, as they would be in a CAD engine's region algebra.
//!

// Crates.io
use enum_dispatch::enum_dispatch;
use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Orient};
use serde::{Deserialize, Serialize};

/// # Point in two-dimensional layout-space
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Create a new [Point] at radius `r` and angle `angle` (radians)
    pub fn polar(r: f64, angle: f64) -> Self {
        Self {
            x: r * angle.cos(),
            y: r * angle.sin(),
        }
    }
    /// Distance from the origin
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
    /// Create a new [Point], rotated counter-clockwise about the origin by `degrees`
    pub fn rotate(&self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// # Path
///
/// Open-ended geometric path with non-zero width.
/// Primarily consists of a series of ordered [Point]s, no two consecutive of which coincide.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Path {
    pub points: Vec<Point>,
    pub width: f64,
}
impl Path {
    /// Create a new [Path], removing consecutive coincident points
    pub fn new(mut points: Vec<Point>, width: f64) -> Self {
        points.dedup();
        Self { points, width }
    }
    /// Create a new [Path], rigidly rotated counter-clockwise about the origin by `degrees`
    pub fn rotate(&self, degrees: f64) -> Path {
        Path {
            points: self.points.iter().map(|p| p.rotate(degrees)).collect(),
            width: self.width,
        }
    }
}

/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
///
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}
impl Polygon {
    /// Convert to a [geo::Polygon], scaling each coordinate by `scale` and snapping to the integer grid.
    /// Vertices which coincide after snapping are merged.
    fn to_grid(&self, scale: f64) -> geo::Polygon<f64> {
        let mut coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|p| Coord {
                x: (p.x * scale).round(),
                y: (p.y * scale).round(),
            })
            .collect();
        coords.dedup();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        // [LineString]s are closed by the [geo::Polygon] constructor
        geo::Polygon::new(LineString::new(coords), vec![])
    }
}

/// # Region
///
/// Set of polygons with holes, as produced by boolean operations.
/// Coordinates are integer-valued database units.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    polys: MultiPolygon<f64>,
}
impl Region {
    /// Create a [Region] from [Polygon] `poly`, scaling by `scale` onto the database-unit grid
    pub fn from_polygon(poly: &Polygon, scale: f64) -> Self {
        Self {
            polys: MultiPolygon::new(vec![poly.to_grid(scale)]),
        }
    }
    /// Boolean subtraction `self - other`
    pub fn difference(&self, other: &Region) -> Region {
        Self {
            polys: self.polys.difference(&other.polys),
        }
    }
    /// Area, in square database units
    pub fn area(&self) -> f64 {
        self.polys.unsigned_area()
    }
    /// Boolean indication of an empty region
    pub fn is_empty(&self) -> bool {
        self.polys.0.is_empty() || self.area() == 0.0
    }
    /// Get our polygons, oriented with counter-clockwise exteriors and clockwise holes
    pub fn polygons(&self) -> Vec<geo::Polygon<f64>> {
        self.polys
            .iter()
            .map(|p| p.orient(geo::orient::Direction::Default))
            .collect()
    }
}

/// # Shape Trait
///
/// Common queries over all [Shape] types.
#[enum_dispatch]
pub trait ShapeTrait {
    /// Number of vertices
    fn num_points(&self) -> usize;
    /// Largest distance of any vertex from the origin, in micrometers.
    /// `dbu` is the database-unit size, used by shapes stored on the integer grid.
    fn reach(&self, dbu: f64) -> f64;
}
impl ShapeTrait for Path {
    fn num_points(&self) -> usize {
        self.points.len()
    }
    fn reach(&self, _dbu: f64) -> f64 {
        self.points.iter().map(Point::radius).fold(0.0, f64::max)
    }
}
impl ShapeTrait for Polygon {
    fn num_points(&self) -> usize {
        self.points.len()
    }
    fn reach(&self, _dbu: f64) -> f64 {
        self.points.iter().map(Point::radius).fold(0.0, f64::max)
    }
}
impl ShapeTrait for Region {
    fn num_points(&self) -> usize {
        self.polys
            .iter()
            .map(|p| p.exterior().0.len() + p.interiors().iter().map(|h| h.0.len()).sum::<usize>())
            .sum()
    }
    fn reach(&self, dbu: f64) -> f64 {
        self.polys
            .iter()
            .flat_map(|p| p.exterior().0.iter())
            .map(|c| c.x.hypot(c.y) * dbu)
            .fold(0.0, f64::max)
    }
}

/// # Shape
///
/// The primary geometric primitive comprising raw layout.
#[enum_dispatch(ShapeTrait)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path(Path),
    Polygon(Polygon),
    Region(Region),
}
