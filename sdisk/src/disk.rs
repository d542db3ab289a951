//!
//! # Disk and Ring Generation
//!

// Std-Lib
use std::f64::consts::TAU;

// Local imports
use crate::error::{DiskError, DiskResult};
use crate::geom::{Point, Polygon, Region};
use crate::utils::ErrorContext;

/// Number of vertices in every [circle]
pub const CIRCLE_POINTS: usize = 360;

/// Create a circular [Polygon] of radius `radius`, centered at the origin.
/// Vertex `k` lies at angle `2πk/360`, measured clockwise from the +y axis.
pub fn circle(radius: f64) -> Polygon {
    let points = (0..CIRCLE_POINTS)
        .map(|k| {
            let t = TAU * k as f64 / CIRCLE_POINTS as f64;
            Point::new(radius * t.sin(), radius * t.cos())
        })
        .collect();
    Polygon { points }
}

/// Create an annular [Region], subtracting a circle of radius `inner_r` from one of radius `outer_r`.
/// Both radii are multiplied by `scale` and snapped to the integer grid before subtraction.
/// The inner circle's vertices must land at least one grid unit apart.
pub fn donut(inner_r: f64, outer_r: f64, scale: f64) -> DiskResult<Region> {
    let fail = |message: String| -> DiskResult<Region> {
        Err(DiskError::Geometry {
            message,
            stack: vec![ErrorContext::Ring],
        })
    };
    if !(inner_r.is_finite() && outer_r.is_finite() && scale.is_finite()) {
        return fail(format!(
            "Non-finite ring dimensions: inner {}, outer {}, scale {}",
            inner_r, outer_r, scale
        ));
    }
    if scale <= 0.0 {
        return fail(format!("Ring scale {} must be positive", scale));
    }
    if inner_r <= 0.0 || inner_r >= outer_r {
        return fail(format!(
            "Ring inner radius {} must be positive and less than outer radius {}",
            inner_r, outer_r
        ));
    }
    let spacing = inner_r * scale * TAU / CIRCLE_POINTS as f64;
    if spacing < 1.0 {
        return fail(format!(
            "Ring inner radius {} is too small to resolve at scale {}: vertex spacing {} is under one grid unit",
            inner_r, scale, spacing
        ));
    }
    let outer = Region::from_polygon(&circle(outer_r), scale);
    let inner = Region::from_polygon(&circle(inner_r), scale);
    let ring = outer.difference(&inner);
    if ring.is_empty() {
        return fail(format!(
            "Empty ring between radii {} and {} at scale {}",
            inner_r, outer_r, scale
        ));
    }
    Ok(ring)
}
