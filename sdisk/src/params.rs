//!
//! # Disk Parameters
//!
//! Parameter sets for each disk [Style], loaded from YAML, JSON, or TOML files,
//! and recorded alongside each generated layout.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// Local imports
use crate::arm::{Arm, ArmCurve, CircularArm, ZigzagArm};
use crate::error::{DiskError, DiskResult, ParamError, ParamResult};
use crate::gds::MAX_XY_POINTS;
use crate::utils::{enumstr, EnumStr, ErrorContext, ErrorHelper, SerializationFormat};

enumstr!(
    /// # Disk Styles
    /// Selects the arm-curve family and its parameter set
    Style {
        Circular: "circular",
        Serpentine: "serpentine",
    }
);
impl Style {
    /// Default output file-name prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Circular => "csdisk",
            Self::Serpentine => "sdisk",
        }
    }
}

fn default_rotations() -> Vec<f64> {
    vec![0.0, 90.0, 180.0, 270.0]
}
fn default_ped_inset() -> f64 {
    10.0
}

///
/// # Circular-Arc Serpentine Parameters
///
/// All lengths in micrometers, angles in degrees.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularParams {
    /// Inner lead length, and radius of the innermost arc
    pub l_inner: f64,
    /// Outer lead length
    pub l_outer: f64,
    /// Arm stroke width
    pub thick: f64,
    /// Ring-to-ring pitch
    pub pitch: f64,
    /// Number of windings
    pub n: usize,
    /// Total angular span
    pub theta: f64,
    /// Angular sampling resolution
    pub res: usize,
    /// Outer radius of the surrounding ring
    pub outer_r: f64,
    /// Arm placement rotations
    #[serde(default = "default_rotations")]
    pub rotations: Vec<f64>,
    /// Pedestal radius is `l_inner - ped_inset`
    #[serde(default = "default_ped_inset")]
    pub ped_inset: f64,
}
impl Default for CircularParams {
    fn default() -> Self {
        Self {
            l_inner: 40.0,
            l_outer: 10.0,
            thick: 5.0,
            pitch: 10.0,
            n: 9,
            theta: 80.0,
            res: 4,
            outer_r: 200.0,
            rotations: default_rotations(),
            ped_inset: default_ped_inset(),
        }
    }
}
impl CircularParams {
    /// Create the [CircularArm] curve
    pub fn arm(&self) -> CircularArm {
        CircularArm {
            l_inner: self.l_inner,
            l_outer: self.l_outer,
            thick: self.thick,
            pitch: self.pitch,
            n: self.n,
            theta: self.theta,
            res: self.res,
        }
    }
    /// Check all parameter invariants
    pub fn validate(&self) -> DiskResult<()> {
        check_finite(
            self,
            &[
                ("l_inner", self.l_inner),
                ("l_outer", self.l_outer),
                ("thick", self.thick),
                ("pitch", self.pitch),
                ("theta", self.theta),
                ("outer_r", self.outer_r),
                ("ped_inset", self.ped_inset),
            ],
        )?;
        check_finite(self, &rotation_fields(&self.rotations))?;
        self.assert(self.l_inner > 0.0, "l_inner must be positive")?;
        self.assert(self.l_outer > 0.0, "l_outer must be positive")?;
        self.assert(self.thick > 0.0, "thick must be positive")?;
        self.assert(self.pitch > 0.0, "pitch must be positive")?;
        self.assert(self.outer_r > 0.0, "outer_r must be positive")?;
        self.assert(self.res >= 1, "res must be at least one")?;
        self.assert(
            self.theta > 0.0 && self.theta <= 360.0,
            format!("theta {} must be in (0, 360] degrees", self.theta),
        )?;
        check_points(self, self.arm().num_points())?;
        self.assert(
            self.ped_inset >= 0.0 && self.ped_inset < self.l_inner,
            format!(
                "ped_inset {} must be in [0, l_inner = {})",
                self.ped_inset, self.l_inner
            ),
        )?;
        let extent = self.arm().extent();
        self.assert(
            extent < self.outer_r,
            format!(
                "arm extent {} um must be less than outer_r {} um",
                extent, self.outer_r
            ),
        )
    }
}
impl ErrorHelper for CircularParams {
    type Error = DiskError;
    fn err(&self, msg: impl Into<String>) -> DiskError {
        DiskError::Validation {
            message: msg.into(),
            stack: vec![ErrorContext::Params],
        }
    }
}

///
/// # Zigzag Serpentine Parameters
///
/// Lengths are fractions of `disk_r`, except `disk_r` and `actual_disk_r` themselves (micrometers).
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpentineParams {
    pub arm_inner_frac: f64,
    pub arm_outer_frac: f64,
    pub arm_w_frac: f64,
    pub arm_thick_frac: f64,
    /// Pitch, as a ratio to the arm thickness
    pub arm_pitch_ratio: f64,
    /// Number of meander windings
    pub arm_n: usize,
    /// Reference radius for all fractional parameters
    pub disk_r: f64,
    /// Arm placement rotations, in degrees
    pub arm_thetas: Vec<f64>,
    /// Pedestal radius fraction
    pub inner_arc_frac: f64,
    /// Recorded, but not used by the geometry
    pub ped_arc_frac: f64,
    /// Outer radius of the surrounding ring
    pub actual_disk_r: f64,
}
impl Default for SerpentineParams {
    fn default() -> Self {
        Self {
            arm_inner_frac: 0.1,
            arm_outer_frac: 0.1,
            arm_w_frac: 0.1,
            arm_thick_frac: 0.1,
            arm_pitch_ratio: 1.0,
            arm_n: 4,
            disk_r: 300.0,
            arm_thetas: vec![0.0, 90.0, 270.0],
            inner_arc_frac: 0.25,
            ped_arc_frac: 0.1,
            actual_disk_r: 300.0,
        }
    }
}
impl SerpentineParams {
    /// Create the [ZigzagArm] curve, converting fractions to absolute lengths
    pub fn arm(&self) -> ZigzagArm {
        let thick = self.arm_thick_frac * self.disk_r;
        ZigzagArm {
            inner: (self.inner_arc_frac + self.arm_inner_frac) * self.disk_r,
            outer: self.arm_outer_frac * self.disk_r,
            w: self.arm_w_frac * self.disk_r,
            thick,
            pitch: self.arm_pitch_ratio * thick,
            n: self.arm_n,
        }
    }
    /// Check all parameter invariants
    pub fn validate(&self) -> DiskResult<()> {
        check_finite(
            self,
            &[
                ("arm_inner_frac", self.arm_inner_frac),
                ("arm_outer_frac", self.arm_outer_frac),
                ("arm_w_frac", self.arm_w_frac),
                ("arm_thick_frac", self.arm_thick_frac),
                ("arm_pitch_ratio", self.arm_pitch_ratio),
                ("disk_r", self.disk_r),
                ("inner_arc_frac", self.inner_arc_frac),
                ("ped_arc_frac", self.ped_arc_frac),
                ("actual_disk_r", self.actual_disk_r),
            ],
        )?;
        check_finite(self, &rotation_fields(&self.arm_thetas))?;
        self.assert(self.disk_r > 0.0, "disk_r must be positive")?;
        self.assert(self.actual_disk_r > 0.0, "actual_disk_r must be positive")?;
        self.assert(self.arm_thick_frac > 0.0, "arm_thick_frac must be positive")?;
        self.assert(self.arm_pitch_ratio > 0.0, "arm_pitch_ratio must be positive")?;
        self.assert(self.inner_arc_frac > 0.0, "inner_arc_frac must be positive")?;
        self.assert(
            self.arm_inner_frac >= 0.0 && self.arm_outer_frac >= 0.0 && self.arm_w_frac >= 0.0,
            "arm_inner_frac, arm_outer_frac and arm_w_frac must be non-negative",
        )?;
        check_points(self, self.arm().num_points())?;
        let extent = self.arm().extent();
        self.assert(
            extent < self.actual_disk_r,
            format!(
                "arm extent {} um must be less than actual_disk_r {} um",
                extent, self.actual_disk_r
            ),
        )
    }
}
impl ErrorHelper for SerpentineParams {
    type Error = DiskError;
    fn err(&self, msg: impl Into<String>) -> DiskError {
        DiskError::Validation {
            message: msg.into(),
            stack: vec![ErrorContext::Params],
        }
    }
}

/// Fail if an arm of `points` centerline points cannot be written as a single GDSII path
fn check_points<H: ErrorHelper>(helper: &H, points: usize) -> Result<(), H::Error> {
    helper.assert(
        points <= MAX_XY_POINTS,
        format!(
            "arm has {} points, over the GDSII limit of {}; reduce the windings or resolution",
            points, MAX_XY_POINTS
        ),
    )
}

/// Fail on the first non-finite named value
fn check_finite<H: ErrorHelper>(helper: &H, fields: &[(&str, f64)]) -> Result<(), H::Error> {
    for (name, val) in fields {
        helper.assert(val.is_finite(), format!("{} must be finite, got {}", name, val))?;
    }
    Ok(())
}
fn rotation_fields(rotations: &[f64]) -> Vec<(&'static str, f64)> {
    rotations.iter().map(|r| ("rotation", *r)).collect()
}

///
/// # Disk Parameter Set
///
/// Immutable once loaded; passed by reference into every generator.
/// Serializes flat, as the parameters of its variant.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiskParams {
    Circular(CircularParams),
    Serpentine(SerpentineParams),
}
impl DiskParams {
    /// The complete default parameter set for `style`
    pub fn default_for(style: Style) -> Self {
        match style {
            Style::Circular => Self::Circular(CircularParams::default()),
            Style::Serpentine => Self::Serpentine(SerpentineParams::default()),
        }
    }
    /// Load `style` parameters from file `path`.
    /// On any failure, logs a warning and returns the complete defaults for `style`.
    pub fn load(path: impl AsRef<Path>, style: Style) -> Self {
        match Self::try_load(&path, style) {
            Ok(params) => params,
            Err(e) => {
                warn!("{}. Using {} defaults.", e, style);
                Self::default_for(style)
            }
        }
    }
    /// Load `style` parameters from file `path`, in the format indicated by its extension.
    /// Any missing field fails the entire load.
    pub fn try_load(path: impl AsRef<Path>, style: Style) -> ParamResult<Self> {
        let path = path.as_ref();
        let fmt = SerializationFormat::from_path(path);
        let read_err = |err| ParamError::Read {
            path: path.to_path_buf(),
            err,
        };
        let params = match style {
            Style::Circular => Self::Circular(fmt.open(path).map_err(read_err)?),
            Style::Serpentine => Self::Serpentine(fmt.open(path).map_err(read_err)?),
        };
        debug!("Loaded {} parameters from {}", style, path.display());
        Ok(params)
    }
    /// Save to file `path`, in the format indicated by its extension
    pub fn save(&self, path: impl AsRef<Path>) -> ParamResult<()> {
        let path = path.as_ref();
        SerializationFormat::from_path(path)
            .save(self, path)
            .map_err(|err| ParamError::Write {
                path: path.to_path_buf(),
                err,
            })
    }
    /// Our [Style]
    pub fn style(&self) -> Style {
        match self {
            Self::Circular(_) => Style::Circular,
            Self::Serpentine(_) => Style::Serpentine,
        }
    }
    /// Check all parameter invariants
    pub fn validate(&self) -> DiskResult<()> {
        match self {
            Self::Circular(p) => p.validate(),
            Self::Serpentine(p) => p.validate(),
        }
    }
    /// Create the [Arm] curve
    pub fn arm(&self) -> Arm {
        match self {
            Self::Circular(p) => p.arm().into(),
            Self::Serpentine(p) => p.arm().into(),
        }
    }
    /// Arm placement rotations, in degrees
    pub fn rotations(&self) -> &[f64] {
        match self {
            Self::Circular(p) => &p.rotations,
            Self::Serpentine(p) => &p.arm_thetas,
        }
    }
    /// Central pedestal radius
    pub fn pedestal_radius(&self) -> f64 {
        match self {
            Self::Circular(p) => p.l_inner - p.ped_inset,
            Self::Serpentine(p) => p.inner_arc_frac * p.disk_r,
        }
    }
    /// Surrounding ring (inner, outer) radii.
    /// The inner radius is the arms' radial extent.
    pub fn ring_radii(&self) -> (f64, f64) {
        match self {
            Self::Circular(p) => (p.arm().extent(), p.outer_r),
            Self::Serpentine(p) => (p.arm().extent(), p.actual_disk_r),
        }
    }
}
