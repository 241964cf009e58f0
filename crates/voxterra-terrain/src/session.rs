//! The generation workflow driven by a front end: configure, initialize or
//! generate a map, preview it and export it as voxels.

use voxterra_voxel::{Gradient, VoxelGrid};

use crate::error::TerrainError;
use crate::field::HeightField;
use crate::generator::{Generator, GeneratorKind, SEA_LEVEL_RATIO, SeedMode};
use crate::preview::{Preview, render_preview};
use crate::voxelize::{VoxelizeParams, voxelize};

/// Everything needed to set up a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionParams {
    pub width: usize,
    pub length: usize,
    pub height_limit: f64,
    pub generator: GeneratorKind,
    pub seed: SeedMode,
    /// Sea level the coastal pipeline shapes its shallows around.
    pub sea_level_ratio: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            width: 64,
            length: 64,
            height_limit: 32.0,
            generator: GeneratorKind::CoastalMountain,
            seed: SeedMode::Clock,
            sea_level_ratio: SEA_LEVEL_RATIO,
        }
    }
}

/// One configured generator and the field it works on.
#[derive(Debug)]
pub struct Session {
    params: SessionParams,
    generator: Generator,
    field: HeightField,
}

impl Session {
    /// Validates the dimensions and builds the generator. The initial field
    /// sits at half the height limit.
    pub fn configure(params: SessionParams) -> Result<Self, TerrainError> {
        let field = HeightField::new(params.width, params.length, params.height_limit)?;
        let generator =
            Generator::new(params.generator, params.seed).with_sea_level(params.sea_level_ratio);
        tracing::debug!(
            "configured {} session {}x{}x{} (seed {})",
            params.generator,
            params.width,
            params.length,
            params.height_limit,
            generator.seed()
        );
        Ok(Self {
            params,
            generator,
            field,
        })
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn kind(&self) -> GeneratorKind {
        self.generator.kind()
    }

    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Replaces the field with a fresh, floored one.
    pub fn initialize_map(&mut self) -> Result<&HeightField, TerrainError> {
        let mut field =
            HeightField::new(self.params.width, self.params.length, self.params.height_limit)?;
        field.floor();
        self.field = field;
        Ok(&self.field)
    }

    /// Floors the field and runs the full generator pipeline over it.
    pub fn generate(&mut self) -> Result<&HeightField, TerrainError> {
        self.field.floor();
        self.generator.run(&mut self.field);
        tracing::info!(
            "average height: {:.3}, median height: {:.3}",
            self.field.average_height(),
            self.field.median_height()
        );
        Ok(&self.field)
    }

    /// Normalizes the field and converts it into a voxel grid. A flat field
    /// (e.g. straight after [`initialize_map`](Self::initialize_map)) exports
    /// as is.
    ///
    /// Only generators that [support it](GeneratorKind::supports_voxel_export)
    /// can export.
    pub fn export_voxels(
        &mut self,
        gradient: &Gradient,
        params: &VoxelizeParams,
    ) -> Result<VoxelGrid, TerrainError> {
        if !self.generator.supports_voxel_export() {
            return Err(TerrainError::ExportUnsupported(self.generator.kind()));
        }
        self.field.normalize();
        Ok(voxelize(&self.field, gradient, params)?)
    }

    pub fn preview(&self, gradient: &Gradient) -> Preview {
        render_preview(&self.field, gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(generator: GeneratorKind) -> SessionParams {
        SessionParams {
            width: 24,
            length: 16,
            height_limit: 20.0,
            generator,
            seed: SeedMode::Fixed(42),
            sea_level_ratio: SEA_LEVEL_RATIO,
        }
    }

    #[test]
    fn test_configure_rejects_bad_dimensions() {
        let result = Session::configure(SessionParams {
            width: 0,
            ..params(GeneratorKind::Canyon)
        });
        assert!(matches!(result, Err(TerrainError::InvalidDimension { .. })));
    }

    #[test]
    fn test_initialize_map_is_flat() {
        let mut session = Session::configure(params(GeneratorKind::Canyon)).unwrap();
        assert!(session.field().heights().iter().all(|&h| h == 10.0));
        let field = session.initialize_map().unwrap();
        assert!(field.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_generate_is_reproducible() {
        let mut a = Session::configure(params(GeneratorKind::CoastalMountain)).unwrap();
        let mut b = Session::configure(params(GeneratorKind::CoastalMountain)).unwrap();
        let ha = a.generate().unwrap().heights().to_vec();
        let hb = b.generate().unwrap().heights().to_vec();
        assert_eq!(ha, hb);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_export_voxels_coastal() {
        let mut session = Session::configure(params(GeneratorKind::CoastalMountain)).unwrap();
        session.generate().unwrap();
        let grid = session
            .export_voxels(&Gradient::default(), &VoxelizeParams::default())
            .unwrap();
        assert_eq!(grid.dimensions(), (24, 16, 20));
        assert!(grid.palette().is_some());
        // Every column has at least its surface voxel.
        assert!(grid.count() >= 24 * 16);
    }

    #[test]
    fn test_single_cell_session_generates_and_exports() {
        for generator in GeneratorKind::ALL {
            let mut session = Session::configure(SessionParams {
                width: 1,
                length: 1,
                ..params(generator)
            })
            .unwrap();
            let field = session.generate().unwrap();
            assert!(field.heights().iter().all(|h| h.is_finite()));
        }

        let mut session = Session::configure(SessionParams {
            width: 1,
            length: 1,
            ..params(GeneratorKind::CoastalMountain)
        })
        .unwrap();
        session.generate().unwrap();
        let grid = session
            .export_voxels(&Gradient::default(), &VoxelizeParams::default())
            .unwrap();
        assert_eq!(grid.dimensions(), (1, 1, 20));
    }

    #[test]
    fn test_export_after_initialize_map() {
        let mut session = Session::configure(params(GeneratorKind::CoastalMountain)).unwrap();
        session.initialize_map().unwrap();
        let grid = session
            .export_voxels(&Gradient::default(), &VoxelizeParams::default())
            .unwrap();
        // Flat at 0: one surface voxel per column, water up to sea level (z=5).
        assert_eq!(grid.count(), 24 * 16 * 6);
        assert!(session.field().heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_sea_level_reaches_generator() {
        let session = Session::configure(SessionParams {
            sea_level_ratio: 0.4,
            ..params(GeneratorKind::CoastalMountain)
        })
        .unwrap();
        assert_eq!(session.params().sea_level_ratio, 0.4);
    }

    #[test]
    fn test_export_voxels_unsupported_for_canyon() {
        let mut session = Session::configure(params(GeneratorKind::Canyon)).unwrap();
        session.generate().unwrap();
        let result = session.export_voxels(&Gradient::default(), &VoxelizeParams::default());
        assert!(matches!(
            result,
            Err(TerrainError::ExportUnsupported(GeneratorKind::Canyon))
        ));
    }

    #[test]
    fn test_preview_matches_field() {
        let mut session = Session::configure(params(GeneratorKind::Canyon)).unwrap();
        session.generate().unwrap();
        let preview = session.preview(&Gradient::default());
        assert_eq!(preview.ratios, session.field().height_ratio_map());
        assert_eq!(preview.image.dimensions(), (24, 16));
    }
}
