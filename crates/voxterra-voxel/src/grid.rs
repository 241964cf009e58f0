//! Dense three-dimensional voxel storage with an optional 255-color palette.
//!
//! Cells are stored in a single flat vector, x outermost and z innermost, so
//! the natural iteration order of the grid is also the order in which
//! non-empty voxels are written to a `.vox` file.

use crate::color::Rgba;
use crate::error::VoxError;

/// Number of entries in a voxel palette. Palette slot `k` is referenced by
/// color index `k + 1`; color index 0 is reserved.
pub const PALETTE_LENGTH: usize = 255;

/// Largest size along any axis. XYZI records store coordinates as single bytes.
pub const MAX_DIMENSION: u32 = 256;

/// One cell of a [`VoxelGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// Palette color index (1..=255 when filled).
    pub color: u8,
    pub empty: bool,
}

impl Voxel {
    pub const EMPTY: Self = Self {
        color: 0,
        empty: true,
    };

    pub const fn filled(color: u8) -> Self {
        Self {
            color,
            empty: false,
        }
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A non-empty voxel together with its position, as stored in an XYZI record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionedVoxel {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub color: u8,
}

impl PositionedVoxel {
    pub fn to_bytes(self) -> [u8; 4] {
        [self.x, self.y, self.z, self.color]
    }
}

/// Fixed-size dense voxel volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    size_x: u32,
    size_y: u32,
    size_z: u32,
    voxels: Vec<Voxel>,
    palette: Option<Vec<Rgba>>,
}

impl VoxelGrid {
    /// Allocates a grid with every cell empty and no palette.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Result<Self, VoxError> {
        let valid = |n: u32| (1..=MAX_DIMENSION).contains(&n);
        if !(valid(size_x) && valid(size_y) && valid(size_z)) {
            return Err(VoxError::InvalidDimension {
                x: size_x,
                y: size_y,
                z: size_z,
                max: MAX_DIMENSION,
            });
        }

        let volume = size_x as usize * size_y as usize * size_z as usize;
        Ok(Self {
            size_x,
            size_y,
            size_z,
            voxels: vec![Voxel::EMPTY; volume],
            palette: None,
        })
    }

    /// Returns `(size_x, size_y, size_z)`.
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.size_x, self.size_y, self.size_z)
    }

    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    pub fn size_z(&self) -> u32 {
        self.size_z
    }

    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x < self.size_x && y < self.size_y && z < self.size_z
    }

    fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        (x as usize * self.size_y as usize + y as usize) * self.size_z as usize + z as usize
    }

    /// Returns the cell at `(x, y, z)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<Voxel> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.voxels[self.linear_index(x, y, z)])
    }

    /// Overwrites the cell at `(x, y, z)`.
    pub fn set(&mut self, x: u32, y: u32, z: u32, voxel: Voxel) -> Result<(), VoxError> {
        if !self.contains(x, y, z) {
            return Err(VoxError::OutOfBounds { x, y, z });
        }
        let index = self.linear_index(x, y, z);
        self.voxels[index] = voxel;
        Ok(())
    }

    /// Marks `(x, y, z)` as filled with `color`.
    pub fn fill(&mut self, x: u32, y: u32, z: u32, color: u8) -> Result<(), VoxError> {
        self.set(x, y, z, Voxel::filled(color))
    }

    /// All cells in natural order (x outer, then y, then z).
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Number of non-empty cells.
    pub fn count(&self) -> usize {
        self.voxels.iter().filter(|v| !v.empty).count()
    }

    /// Non-empty cells in natural order.
    pub fn non_empty_voxels(&self) -> Vec<PositionedVoxel> {
        let mut result = Vec::new();
        for x in 0..self.size_x {
            for y in 0..self.size_y {
                for z in 0..self.size_z {
                    let voxel = self.voxels[self.linear_index(x, y, z)];
                    if !voxel.empty {
                        // Dimensions never exceed 256, so every index fits a byte.
                        result.push(PositionedVoxel {
                            x: x as u8,
                            y: y as u8,
                            z: z as u8,
                            color: voxel.color,
                        });
                    }
                }
            }
        }
        result
    }

    pub fn palette(&self) -> Option<&[Rgba]> {
        self.palette.as_deref()
    }

    /// Assigns the palette. Exactly [`PALETTE_LENGTH`] entries are required.
    pub fn set_palette(&mut self, palette: Vec<Rgba>) -> Result<(), VoxError> {
        if palette.len() != PALETTE_LENGTH {
            return Err(VoxError::PaletteLengthMismatch {
                expected: PALETTE_LENGTH,
                actual: palette.len(),
            });
        }
        self.palette = Some(palette);
        Ok(())
    }

    pub fn clear_palette(&mut self) {
        self.palette = None;
    }

    /// Color of a voxel color index, if a palette is set and the index is not 0.
    pub fn color_of(&self, color_index: u8) -> Option<Rgba> {
        let slot = (color_index as usize).checked_sub(1)?;
        self.palette.as_ref().and_then(|p| p.get(slot).copied())
    }
}
