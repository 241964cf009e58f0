//! RGBA colors and continuous color gradients.
//!
//! A [`Gradient`] maps a ratio in `[0, 1]` to a color by linear interpolation
//! between sorted color stops. It is the source of the surface colors written
//! into a voxel palette and of preview pixels.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color, laid out as it appears on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// One key of a [`Gradient`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position of the key in `[0, 1]`.
    pub position: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(position: f64, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear color gradient over `[0, 1]`.
///
/// Stops are kept sorted by position. Ratios before the first stop take the
/// first color, ratios after the last stop take the last color. An empty
/// gradient evaluates to white.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.retain(|stop| stop.position.is_finite());
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// A gradient that evaluates to `color` everywhere.
    pub fn solid(color: Rgba) -> Self {
        Self::new(vec![ColorStop::new(0.0, color)])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Samples the gradient at `t`. Non-finite input is treated as 0.
    pub fn evaluate(&self, t: f64) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgba::WHITE,
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.position {
                let span = hi.position - lo.position;
                if span <= 0.0 {
                    return hi.color;
                }
                return lo.color.lerp(hi.color, (t - lo.position) / span);
            }
        }

        last.color
    }
}

impl Default for Gradient {
    /// Beach sand, grass, bare rock, snow.
    fn default() -> Self {
        Self::new(vec![
            ColorStop::new(0.0, Rgba::opaque(194, 178, 128)),
            ColorStop::new(0.3, Rgba::opaque(86, 125, 70)),
            ColorStop::new(0.7, Rgba::opaque(120, 110, 100)),
            ColorStop::new(1.0, Rgba::opaque(245, 245, 245)),
        ])
    }
}

impl From<Vec<ColorStop>> for Gradient {
    fn from(stops: Vec<ColorStop>) -> Self {
        Self::new(stops)
    }
}

impl From<Gradient> for Vec<ColorStop> {
    fn from(gradient: Gradient) -> Self {
        gradient.stops
    }
}
