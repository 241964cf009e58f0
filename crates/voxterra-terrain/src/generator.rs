//! Named terrain pipelines.
//!
//! Each [`GeneratorKind`] is a fixed script of operators from [`crate::ops`].
//! A [`Generator`] pairs a kind with its own seeded [`NoiseSource`], so two
//! generators built from the same seed produce identical fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::HeightField;
use crate::noise_source::{NoiseSource, clock_seed};
use crate::ops;

/// Sea level as a fraction of the height limit, shared by the coastal
/// pipeline and voxel export.
pub const SEA_LEVEL_RATIO: f64 = 0.25;

/// The available terrain pipelines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// A sloped landmass rising out of a sea, with smoothed shallows.
    #[default]
    CoastalMountain,
    /// Layered noise pushed toward flat plateaus and flat canyon floors.
    Canyon,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::CoastalMountain, GeneratorKind::Canyon];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::CoastalMountain => "coastal_mountain",
            GeneratorKind::Canyon => "canyon",
        }
    }

    /// Whether fields from this pipeline can be exported as voxel models.
    pub fn supports_voxel_export(self) -> bool {
        match self {
            GeneratorKind::CoastalMountain => true,
            GeneratorKind::Canyon => false,
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                format!("unknown generator '{s}' (expected coastal_mountain or canyon)")
            })
    }
}

/// Where a generator's seed comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Derived from the wall clock, 16 bits.
    #[default]
    Clock,
    Fixed(u32),
}

impl SeedMode {
    pub fn resolve(self) -> u32 {
        match self {
            SeedMode::Clock => clock_seed(),
            SeedMode::Fixed(seed) => seed,
        }
    }
}

impl From<Option<u32>> for SeedMode {
    fn from(seed: Option<u32>) -> Self {
        seed.map_or(SeedMode::Clock, SeedMode::Fixed)
    }
}

/// A terrain pipeline with its own seeded randomness.
#[derive(Debug)]
pub struct Generator {
    kind: GeneratorKind,
    source: NoiseSource,
    sea_level_ratio: f64,
}

impl Generator {
    pub fn new(kind: GeneratorKind, seed: SeedMode) -> Self {
        Self {
            kind,
            source: NoiseSource::new(seed.resolve()),
            sea_level_ratio: SEA_LEVEL_RATIO,
        }
    }

    /// Sets the sea level the coastal pipeline flattens its shallows toward.
    /// Out-of-range ratios are clamped into `[0, 1]`.
    pub fn with_sea_level(mut self, ratio: f64) -> Self {
        self.sea_level_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            SEA_LEVEL_RATIO
        };
        self
    }

    pub fn coastal_mountain(seed: SeedMode) -> Self {
        Self::new(GeneratorKind::CoastalMountain, seed)
    }

    pub fn canyon(seed: SeedMode) -> Self {
        Self::new(GeneratorKind::Canyon, seed)
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn seed(&self) -> u32 {
        self.source.seed()
    }

    pub fn sea_level_ratio(&self) -> f64 {
        self.sea_level_ratio
    }

    pub fn supports_voxel_export(&self) -> bool {
        self.kind.supports_voxel_export()
    }

    /// Runs the pipeline over `field` in place.
    ///
    /// Intermediate normalizations leave a flat field (e.g. a 1x1 map) as it
    /// is, so every field size produces finite heights.
    pub fn run(&mut self, field: &mut HeightField) {
        tracing::info!(
            "running {} generator with seed {} on {}x{} field",
            self.kind,
            self.seed(),
            field.width(),
            field.length()
        );
        match self.kind {
            GeneratorKind::CoastalMountain => self.run_coastal_mountain(field),
            GeneratorKind::Canyon => self.run_canyon(field),
        }
    }

    fn run_coastal_mountain(&mut self, field: &mut HeightField) {
        ops::add_slope(field, 1.0, self.source.rng());
        field.normalize();
        ops::add_noise(field, &self.source, 0.1, 0.01);
        ops::add_noise(field, &self.source, 0.015, 0.05);
        ops::add_noise(field, &self.source, 0.005, 0.1);
        field.normalize();
        ops::apply_power(field, self.sea_level_ratio, 2.0);
        field.normalize();
        ops::smooth(field, 20, self.sea_level_ratio);
    }

    fn run_canyon(&mut self, field: &mut HeightField) {
        ops::add_noise(field, &self.source, 0.1, 0.004);
        ops::add_noise(field, &self.source, 0.2, 0.01);
        ops::add_noise(field, &self.source, 0.015, 0.05);
        ops::add_noise(field, &self.source, 0.005, 0.1);
        field.normalize();
        ops::apply_power_top_and_bottom(field, 2.0);
    }
}
