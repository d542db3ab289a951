//!
//! # Disk Assembly
//!
//! Places the arms, pedestal, and ring of a [DiskParams] set into a single-cell [Layout].
//!

// Crates.io
use tracing::{debug, info};

// Local imports
use crate::arm::ArmCurve;
use crate::disk::{circle, donut};
use crate::error::DiskResult;
use crate::layout::Layout;
use crate::params::DiskParams;

/// Name of the single generated cell
pub const CELL_NAME: &str = "si";
/// (layer, datatype) of all generated geometry
pub const LAYER: (i16, i16) = (1, 0);

/// # Disk Layout Builder
pub struct DiskLayout;
impl DiskLayout {
    /// Validate `params` and build the complete disk [Layout]:
    /// one arm per rotation, the central pedestal, and the surrounding ring.
    pub fn build(params: &DiskParams) -> DiskResult<Layout> {
        params.validate()?;
        let style = params.style();
        let mut layout = Layout::new(style.prefix());
        let layer = layout.layer(LAYER.0, LAYER.1);
        let scale = layout.scale();

        let arm = params.arm();
        info!("{} arm extent: {} um", style, arm.extent());
        let ped_r = params.pedestal_radius();
        let (ring_inner, ring_outer) = params.ring_radii();
        let ring = donut(ring_inner, ring_outer, scale)?;

        let cell = layout.create_cell(CELL_NAME);
        for rot in params.rotations() {
            debug!("Placing arm at {} degrees", rot);
            cell.insert(layer, arm.path(*rot));
        }
        cell.insert(layer, circle(ped_r));
        cell.insert(layer, ring);
        debug!(
            "Pedestal radius {} um, ring radii ({}, {}) um",
            ped_r, ring_inner, ring_outer
        );
        Ok(layout)
    }
}
