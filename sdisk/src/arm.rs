//!
//! # Arm Curves
//!
//! Each arm is a centerline starting at the origin and running radially outward along +y,
//! stroked into a [Path] of the arm's width and rotated into place about the origin.
//!
//! Two curve families share the straight inner and outer leads:
//! * [CircularArm] winds back and forth along concentric circular arcs.
//! * [ZigzagArm] meanders back and forth along straight horizontal runs.
//!

// Std-Lib
use std::f64::consts::FRAC_PI_2;

// Crates.io
use enum_dispatch::enum_dispatch;

// Local imports
use crate::geom::{Path, Point};

/// # Arm Curve Trait
#[enum_dispatch]
pub trait ArmCurve {
    /// Unrotated centerline points, starting at the origin
    fn centerline(&self) -> Vec<Point>;
    /// Stroke width
    fn width(&self) -> f64;
    /// Radial reach: the y-coordinate of the final centerline point
    fn extent(&self) -> f64;
    /// Number of [centerline](ArmCurve::centerline) points, computed without generating them.
    /// Saturates rather than overflowing.
    fn num_points(&self) -> usize;
    /// Stroke into a [Path], rotated counter-clockwise about the origin by `rot` degrees
    fn path(&self, rot: f64) -> Path {
        Path::new(self.centerline(), self.width()).rotate(rot)
    }
}

/// # Arm
/// Enumeration of the arm-curve families
#[enum_dispatch(ArmCurve)]
#[derive(Debug, Clone, PartialEq)]
pub enum Arm {
    Circular(CircularArm),
    Zigzag(ZigzagArm),
}

///
/// # Circular-Arc Arm
///
/// After the inner lead, winding `i` runs along a circle of radius `l_inner + i * pitch`,
/// alternating direction with the parity of `i`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArm {
    pub l_inner: f64,
    pub l_outer: f64,
    pub thick: f64,
    pub pitch: f64,
    pub n: usize,
    /// Angular span, in degrees
    pub theta: f64,
    pub res: usize,
}
impl CircularArm {
    /// Append points along the circle of radius `r`, at angles `p * dtheta + shift` for each `p` in `steps`
    fn arc(pts: &mut Vec<Point>, r: f64, dtheta: f64, shift: f64, steps: impl Iterator<Item = usize>) {
        pts.extend(steps.map(|p| Point::polar(r, p as f64 * dtheta + shift)));
    }
}
impl ArmCurve for CircularArm {
    fn centerline(&self) -> Vec<Point> {
        let mut pts = vec![Point::new(0.0, 0.0), Point::new(0.0, self.l_inner)];
        let theta = self.theta.to_radians();
        let res = self.res as f64;

        // Inner arc
        let dtheta = theta / (2.0 * res);
        Self::arc(&mut pts, self.l_inner, dtheta, FRAC_PI_2, 1..self.res);

        // Windings
        for i in 1..=self.n {
            let steps = (i + 2) * self.res;
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let dtheta = sign * theta / steps as f64;
            let shift = if i % 2 == 0 {
                FRAC_PI_2 - theta / 2.0
            } else {
                FRAC_PI_2 + theta / 2.0
            };
            let r = self.l_inner + i as f64 * self.pitch;
            Self::arc(&mut pts, r, dtheta, shift, 1..steps);
        }

        // Closing arc, empty for fewer than two windings
        let half = self.n / 2;
        if half > 0 {
            let span = theta / (2.0 * res * half as f64);
            let (dtheta, shift) = if self.n % 2 == 0 {
                (-span, FRAC_PI_2 + theta / 2.0)
            } else {
                (span, FRAC_PI_2 - theta / 2.0)
            };
            let r = self.l_inner + (self.n + 1) as f64 * self.pitch;
            Self::arc(&mut pts, r, dtheta, shift, 1..=self.res * half);
        }

        // Outer lead
        pts.push(Point::new(0.0, self.extent()));
        pts
    }
    fn width(&self) -> f64 {
        self.thick
    }
    fn extent(&self) -> f64 {
        self.l_outer + self.l_inner + self.pitch * (self.n + 1) as f64
    }
    fn num_points(&self) -> usize {
        // Two leads and the outer end, `res - 1` inner arc points,
        // `(i + 2) * res - 1` for winding `i`, and `res * (n / 2)` closing arc points
        let n = self.n;
        let res_1 = self.res.saturating_sub(1);
        let spans = n.saturating_mul(n.saturating_add(5)) / 2;
        let windings = res_1
            .saturating_mul(spans)
            .saturating_add(n.saturating_mul(n.saturating_add(3)) / 2);
        3usize
            .saturating_add(res_1)
            .saturating_add(windings)
            .saturating_add(self.res.saturating_mul(n / 2))
    }
}

///
/// # Zigzag Arm
///
/// After the inner lead, winding `i` is a horizontal run of width `w` at height `inner + i * pitch`,
/// alternating direction with the parity of `i`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ZigzagArm {
    pub inner: f64,
    pub outer: f64,
    /// Meander width
    pub w: f64,
    pub thick: f64,
    pub pitch: f64,
    pub n: usize,
}
impl ArmCurve for ZigzagArm {
    fn centerline(&self) -> Vec<Point> {
        let half_w = self.w / 2.0;
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, self.inner),
            Point::new(-half_w, self.inner),
        ];
        for i in 1..=self.n {
            let y = self.inner + i as f64 * self.pitch;
            let (x1, x2) = if i % 2 == 0 {
                (half_w, -half_w)
            } else {
                (-half_w, half_w)
            };
            pts.push(Point::new(x1, y));
            pts.push(Point::new(x2, y));
        }
        let x1 = if self.n % 2 == 0 { -half_w } else { half_w };
        pts.push(Point::new(x1, self.inner + self.n as f64 * self.pitch));
        pts.push(Point::new(0.0, self.inner + (self.n + 1) as f64 * self.pitch));
        pts.push(Point::new(0.0, self.extent()));
        pts
    }
    fn width(&self) -> f64 {
        self.thick
    }
    fn extent(&self) -> f64 {
        self.outer + self.inner + self.pitch * (self.n + 1) as f64
    }
    fn num_points(&self) -> usize {
        self.n.saturating_mul(2).saturating_add(6)
    }
}
