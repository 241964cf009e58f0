//! Dense voxel grids with a fixed 255-entry color palette, and the `.vox`
//! chunk codec used to persist them.

pub mod color;
pub mod error;
pub mod grid;
pub mod vox;

pub use color::{ColorStop, Gradient, Rgba};
pub use error::VoxError;
pub use grid::{MAX_DIMENSION, PALETTE_LENGTH, PositionedVoxel, Voxel, VoxelGrid};
pub use vox::{Chunk, ChunkId, VOX_VERSION};
