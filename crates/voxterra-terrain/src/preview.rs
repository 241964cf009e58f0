//! Top-down preview of a height field: the ratio map plus an RGBA image
//! colored through a [`Gradient`].

use voxterra_voxel::{Gradient, Rgba};

use crate::field::HeightField;

/// A 2D image stored as row-major RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    /// Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    /// Create a new transparent black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of range");
        (y * self.width + x) * 4
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
    }

    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Rgba {
        let idx = self.offset(x, y);
        Rgba::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Ratio map of a field and the image derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    pub width: usize,
    pub length: usize,
    /// Per-cell height ratio in `[0, 1]`, laid out like
    /// [`HeightField::heights`].
    pub ratios: Vec<f64>,
    /// Cell `(i, j)` is pixel `(x = i, y = j)`.
    pub image: PreviewImage,
}

impl Preview {
    pub fn ratio(&self, i: usize, j: usize) -> f64 {
        self.ratios[i * self.length + j]
    }
}

/// Colors every cell of `field` by its height ratio.
pub fn render_preview(field: &HeightField, gradient: &Gradient) -> Preview {
    let ratios = field.height_ratio_map();
    let mut image = PreviewImage::new(field.width(), field.length());

    for i in 0..field.width() {
        for j in 0..field.length() {
            let color = gradient.evaluate(ratios[field.index(i, j)]);
            image.set_pixel(i, j, color);
        }
    }

    Preview {
        width: field.width(),
        length: field.length(),
        ratios,
        image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxterra_voxel::ColorStop;

    #[test]
    fn test_image_dimensions() {
        let image = PreviewImage::new(16, 8);
        assert_eq!(image.dimensions(), (16, 8));
        assert_eq!(image.pixels.len(), 16 * 8 * 4);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_pixel_outside_row_panics() {
        // (4, 0) would alias (0, 1) without the bounds check.
        let mut image = PreviewImage::new(4, 2);
        image.set_pixel(4, 0, Rgba::WHITE);
    }

    #[test]
    fn test_pixel_roundtrip() {
        let mut image = PreviewImage::new(4, 4);
        let color = Rgba::new(10, 20, 30, 40);
        image.set_pixel(2, 3, color);
        assert_eq!(image.get_pixel(2, 3), color);
        assert_eq!(&image.pixels[(3 * 4 + 2) * 4..][..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_preview_colors_follow_ratio() {
        let gradient = Gradient::new(vec![
            ColorStop::new(0.0, Rgba::BLACK),
            ColorStop::new(1.0, Rgba::WHITE),
        ]);
        let field = HeightField::from_heights(2, 1, 10.0, vec![1.0, 9.0]).unwrap();
        let preview = render_preview(&field, &gradient);

        assert_eq!(preview.ratio(0, 0), 0.0);
        assert_eq!(preview.ratio(1, 0), 1.0);
        assert_eq!(preview.image.dimensions(), (2, 1));
        assert_eq!(preview.image.get_pixel(0, 0), Rgba::BLACK);
        assert_eq!(preview.image.get_pixel(1, 0), Rgba::WHITE);
    }

    #[test]
    fn test_flat_field_preview() {
        let mut field = HeightField::new(3, 3, 10.0).unwrap();
        field.floor();
        let preview = render_preview(&field, &Gradient::solid(Rgba::WHITE));
        assert!(preview.ratios.iter().all(|&r| r == 0.0));
        assert_eq!(preview.image.get_pixel(2, 2), Rgba::WHITE);
    }
}
