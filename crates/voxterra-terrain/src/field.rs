//! Two-dimensional height field with on-demand statistics.
//!
//! Heights are stored row-major with the width axis (`i`) outermost and the
//! length axis (`j`) innermost. Every statistic is recomputed on each call;
//! nothing is cached, so operators can mutate cells freely.

use crate::error::TerrainError;

/// A `width x length` grid of elevations bounded by `height_limit`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    length: usize,
    height_limit: f64,
    heights: Vec<f64>,
}

impl HeightField {
    /// Allocates a field with every cell at `height_limit / 2`.
    pub fn new(width: usize, length: usize, height_limit: f64) -> Result<Self, TerrainError> {
        if width == 0 || length == 0 || !(height_limit.is_finite() && height_limit > 0.0) {
            return Err(TerrainError::InvalidDimension {
                width,
                length,
                height_limit,
            });
        }
        Ok(Self {
            width,
            length,
            height_limit,
            heights: vec![height_limit / 2.0; width * length],
        })
    }

    /// Builds a field from explicit heights laid out row-major (`i` outer).
    pub fn from_heights(
        width: usize,
        length: usize,
        height_limit: f64,
        heights: Vec<f64>,
    ) -> Result<Self, TerrainError> {
        let mut field = Self::new(width, length, height_limit)?;
        if heights.len() != width * length {
            return Err(TerrainError::InvalidDimension {
                width,
                length,
                height_limit,
            });
        }
        field.heights = heights;
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn height_limit(&self) -> f64 {
        self.height_limit
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always `false`: both dimensions are positive by construction.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[inline]
    pub(crate) fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.width && j < self.length);
        i * self.length + j
    }

    /// Height of cell `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= width` or `j >= length`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.heights[self.index(i, j)]
    }

    /// # Panics
    ///
    /// Panics if `i >= width` or `j >= length`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, height: f64) {
        let index = self.index(i, j);
        self.heights[index] = height;
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn heights_mut(&mut self) -> &mut [f64] {
        &mut self.heights
    }

    /// Resets every cell to 0.
    pub fn floor(&mut self) {
        self.heights.fill(0.0);
    }

    /// Clamps every cell into `[0, height_limit]`.
    pub fn clamp(&mut self) {
        let limit = self.height_limit;
        for h in &mut self.heights {
            *h = h.clamp(0.0, limit);
        }
    }

    pub fn min_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn average_height(&self) -> f64 {
        self.heights.iter().sum::<f64>() / self.heights.len() as f64
    }

    /// The element at index `N / 2` of the sorted heights.
    ///
    /// For an even cell count this is the upper of the two middle values,
    /// not their mean.
    pub fn median_height(&self) -> f64 {
        let mut sorted = self.heights.clone();
        sorted.sort_by(f64::total_cmp);
        sorted[sorted.len() / 2]
    }

    /// The median mapped into `[0, 1]` with the field's own min and max.
    /// A flat field yields 0.
    pub fn unit_median_height(&self) -> f64 {
        let (min, max) = (self.min_height(), self.max_height());
        if max > min {
            (self.median_height() - min) / (max - min)
        } else {
            0.0
        }
    }

    /// Rescales the field so its minimum becomes 0 and its maximum `height_limit`.
    ///
    /// A flat field has no range to rescale and is left at its common height.
    pub fn normalize(&mut self) {
        if let Err(TerrainError::DegenerateField { height }) = self.try_normalize() {
            tracing::debug!("normalize skipped on flat field at {height}");
        }
    }

    /// Like [`normalize`](Self::normalize), but reports a flat field as
    /// [`TerrainError::DegenerateField`]. The cells are untouched in that case.
    pub fn try_normalize(&mut self) -> Result<(), TerrainError> {
        let (min, max) = (self.min_height(), self.max_height());
        if max <= min {
            return Err(TerrainError::DegenerateField { height: min });
        }

        let multiplier = self.height_limit / (max - min);
        for h in &mut self.heights {
            *h = (*h - min) * multiplier;
        }
        Ok(())
    }

    /// Per-cell `(h - min) / (max - min)` in `[0, 1]`, same layout as
    /// [`heights`](Self::heights). Every ratio is 0 on a flat field.
    pub fn height_ratio_map(&self) -> Vec<f64> {
        let (min, max) = (self.min_height(), self.max_height());
        if max <= min {
            return vec![0.0; self.heights.len()];
        }
        let delta = max - min;
        self.heights.iter().map(|h| (h - min) / delta).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn field_from(width: usize, length: usize, limit: f64, heights: &[f64]) -> HeightField {
        HeightField::from_heights(width, length, limit, heights.to_vec()).unwrap()
    }

    #[test]
    fn test_new_fills_half_limit() {
        let field = HeightField::new(4, 3, 32.0).unwrap();
        assert_eq!(field.len(), 12);
        assert!(field.heights().iter().all(|&h| h == 16.0));
    }

    #[test]
    fn test_invalid_dimensions() {
        for (w, l, h) in [(0, 4, 10.0), (4, 0, 10.0), (4, 4, 0.0), (4, 4, -1.0), (4, 4, f64::NAN)] {
            let result = HeightField::new(w, l, h);
            assert!(
                matches!(result, Err(TerrainError::InvalidDimension { .. })),
                "expected InvalidDimension for ({w}, {l}, {h}), got {result:?}"
            );
        }
    }

    #[test]
    fn test_from_heights_length_mismatch() {
        let result = HeightField::from_heights(2, 2, 10.0, vec![1.0; 3]);
        assert!(matches!(result, Err(TerrainError::InvalidDimension { .. })));
    }

    #[test]
    fn test_layout_is_width_major() {
        let mut field = HeightField::new(2, 3, 10.0).unwrap();
        field.set(1, 2, 7.0);
        assert_eq!(field.heights()[5], 7.0);
        assert_eq!(field.get(1, 2), 7.0);
    }

    #[test]
    fn test_floor() {
        let mut field = HeightField::new(3, 3, 8.0).unwrap();
        field.floor();
        assert!(field.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_statistics() {
        let field = field_from(2, 2, 10.0, &[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(field.min_height(), 1.0);
        assert_eq!(field.max_height(), 4.0);
        assert!((field.average_height() - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_median_is_upper_median() {
        let field = field_from(2, 2, 10.0, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.median_height(), 3.0);

        let odd = field_from(3, 1, 10.0, &[9.0, 1.0, 5.0]);
        assert_eq!(odd.median_height(), 5.0);
    }

    #[test]
    fn test_normalize_spans_full_range() {
        let mut field = field_from(2, 3, 32.0, &[-5.0, 3.0, 11.0, 2.5, 0.0, 7.0]);
        field.normalize();
        assert!(field.min_height().abs() < EPSILON);
        assert!((field.max_height() - 32.0).abs() < EPSILON);
    }

    #[test]
    fn test_normalize_flat_field_is_noop() {
        let mut field = HeightField::new(3, 3, 10.0).unwrap();
        field.normalize();
        assert!(field.heights().iter().all(|&h| h == 5.0));

        let mut single = HeightField::new(1, 1, 10.0).unwrap();
        single.floor();
        single.normalize();
        assert_eq!(single.heights(), &[0.0]);
    }

    #[test]
    fn test_try_normalize_reports_flat_field() {
        let mut field = HeightField::new(3, 3, 10.0).unwrap();
        let result = field.try_normalize();
        assert!(matches!(
            result,
            Err(TerrainError::DegenerateField { height }) if height == 5.0
        ));
        assert!(field.heights().iter().all(|&h| h == 5.0));
    }

    #[test]
    fn test_ratio_map() {
        let field = field_from(1, 3, 10.0, &[2.0, 4.0, 6.0]);
        let ratios = field.height_ratio_map();
        assert_eq!(ratios, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_ratio_map_flat_field_is_zero() {
        let mut field = HeightField::new(2, 2, 10.0).unwrap();
        field.floor();
        assert_eq!(field.height_ratio_map(), vec![0.0; 4]);
        assert_eq!(field.unit_median_height(), 0.0);
    }

    #[test]
    fn test_unit_median() {
        let field = field_from(2, 2, 10.0, &[0.0, 2.0, 3.0, 4.0]);
        assert!((field.unit_median_height() - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_clamp() {
        let mut field = field_from(1, 3, 10.0, &[-2.0, 5.0, 12.0]);
        field.clamp();
        assert_eq!(field.heights(), &[0.0, 5.0, 10.0]);
    }
}
