//! Procedural height-field terrain: seeded noise, slope and power-curve
//! operators, named generator pipelines, and conversion to colored voxel grids.

mod error;
mod field;
mod noise_source;
mod preview;
mod session;

pub mod generator;
pub mod ops;
pub mod voxelize;

pub use error::TerrainError;
pub use field::HeightField;
pub use generator::{Generator, GeneratorKind, SEA_LEVEL_RATIO, SeedMode};
pub use noise_source::{NOISE_AMPLITUDE, NoiseSource, clock_seed};
pub use preview::{Preview, PreviewImage, render_preview};
pub use session::{Session, SessionParams};
pub use voxelize::{VoxelizeParams, voxelize};
