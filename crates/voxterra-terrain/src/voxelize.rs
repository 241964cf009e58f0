//! Conversion of a normalized [`HeightField`] into a colored [`VoxelGrid`].
//!
//! Every column is split into three bands: solid ground below the surface, a
//! single surface voxel colored from the gradient, and water stacked above
//! the surface up to sea level.

use serde::{Deserialize, Serialize};
use voxterra_voxel::{Gradient, PALETTE_LENGTH, Rgba, VoxError, VoxelGrid};

use crate::field::HeightField;
use crate::generator::SEA_LEVEL_RATIO;

/// Palette slot holding the ground color.
pub const GROUND_SLOT: usize = 253;
/// Palette slot holding the water color.
pub const WATER_SLOT: usize = 254;
/// Color index referencing [`GROUND_SLOT`].
pub const GROUND_COLOR_INDEX: u8 = GROUND_SLOT as u8 + 1;
/// Color index referencing [`WATER_SLOT`].
pub const WATER_COLOR_INDEX: u8 = WATER_SLOT as u8 + 1;

/// Upper bound on gradient samples: the slots below the reserved ones.
pub const MAX_COLOR_SAMPLING: u32 = GROUND_SLOT as u32;

pub const GROUND_COLOR: Rgba = Rgba::opaque(73, 36, 14);
pub const WATER_COLOR: Rgba = Rgba::opaque(35, 100, 189);
pub const FILLER_COLOR: Rgba = Rgba::opaque(128, 128, 128);

/// Tunables for voxel export.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelizeParams {
    /// Sea level as a fraction of the grid height.
    pub sea_level_ratio: f64,
    /// Number of gradient samples in the palette, capped at
    /// [`MAX_COLOR_SAMPLING`].
    pub color_sampling: u32,
}

impl Default for VoxelizeParams {
    fn default() -> Self {
        Self {
            sea_level_ratio: SEA_LEVEL_RATIO,
            color_sampling: 128,
        }
    }
}

impl VoxelizeParams {
    /// The sample count actually used, in `1..=MAX_COLOR_SAMPLING`.
    pub fn effective_sampling(&self) -> usize {
        self.color_sampling.clamp(1, MAX_COLOR_SAMPLING) as usize
    }
}

/// Builds the 255-entry palette: `sampling` gradient samples, filler gray up
/// to the reserved slots, then ground and water.
pub fn build_palette(gradient: &Gradient, sampling: usize) -> Vec<Rgba> {
    let sampling = sampling.clamp(1, GROUND_SLOT);
    let mut palette = vec![FILLER_COLOR; PALETTE_LENGTH];
    let denominator = (sampling - 1).max(1) as f64;
    for (k, slot) in palette.iter_mut().take(sampling).enumerate() {
        *slot = gradient.evaluate(k as f64 / denominator);
    }
    palette[GROUND_SLOT] = GROUND_COLOR;
    palette[WATER_SLOT] = WATER_COLOR;
    palette
}

/// Color index for a surface voxel at height ratio `tau`.
pub fn surface_color_index(tau: f64, sampling: usize) -> u8 {
    let sampling = sampling.clamp(1, GROUND_SLOT);
    let tau = if tau.is_finite() { tau.clamp(0.0, 1.0) } else { 0.0 };
    let bucket = ((tau * (sampling - 1) as f64).floor() as usize).min(sampling - 1);
    (bucket + 1) as u8
}

fn dimension(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Converts `field` into a voxel grid of size
/// `(width, length, floor(height_limit))`.
///
/// The field is expected to be normalized; heights are clamped into the grid
/// so no voxel is ever written above the top layer.
pub fn voxelize(
    field: &HeightField,
    gradient: &Gradient,
    params: &VoxelizeParams,
) -> Result<VoxelGrid, VoxError> {
    let size_z = field.height_limit().floor() as u32;
    let mut grid = VoxelGrid::new(dimension(field.width()), dimension(field.length()), size_z)?;

    let sampling = params.effective_sampling();
    grid.set_palette(build_palette(gradient, sampling))?;

    let top_z = size_z - 1;
    let sea_z = (params.sea_level_ratio * size_z as f64).floor();
    // Water never reaches the top layer.
    let water_top = if top_z == 0 || sea_z < 0.0 {
        None
    } else {
        Some((sea_z as u32).min(top_z - 1))
    };
    tracing::debug!("sea level at z={sea_z}, palette samples: {sampling}");

    let ratios = field.height_ratio_map();
    for i in 0..field.width() {
        for j in 0..field.length() {
            let (x, y) = (i as u32, j as u32);
            let h = field.get(i, j);
            let ground_top = if h.is_finite() && h > 0.0 {
                (h.floor() as u32).min(top_z)
            } else {
                0
            };

            for z in 0..ground_top {
                grid.fill(x, y, z, GROUND_COLOR_INDEX)?;
            }

            let tau = ratios[field.index(i, j)];
            grid.fill(x, y, ground_top, surface_color_index(tau, sampling))?;

            if let Some(water_top) = water_top {
                for z in (ground_top + 1)..=water_top {
                    grid.fill(x, y, z, WATER_COLOR_INDEX)?;
                }
            }
        }
    }

    tracing::info!(
        "voxelized {}x{}x{} grid with {} voxels",
        grid.size_x(),
        grid.size_y(),
        grid.size_z(),
        grid.count()
    );
    Ok(grid)
}
