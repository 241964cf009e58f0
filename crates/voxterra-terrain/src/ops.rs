//! In-place transforms over a [`HeightField`].
//!
//! Powers and square roots go through `libm` so that two runs with the same
//! seed agree bit for bit across platforms.

use rand::Rng;

use crate::field::HeightField;
use crate::noise_source::NoiseSource;

#[inline]
fn det_pow(base: f64, exponent: f64) -> f64 {
    libm::pow(base, exponent)
}

#[inline]
fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

/// `span^(1 - e) * dist^e`, taken as 0 when `dist` or `span` is not positive
/// so a cell sitting exactly on a pivot or bound stays there.
#[inline]
fn power_offset(span: f64, dist: f64, exponent: f64) -> f64 {
    if dist <= 0.0 || span <= 0.0 {
        return 0.0;
    }
    det_pow(span, 1.0 - exponent) * det_pow(dist, exponent)
}

/// Adds a random linear gradient.
///
/// Two coefficients `a` and `b` are drawn from `[-1, 1]` and cell `(i, j)`
/// is raised by `(a*i + b*j) * sqrt(width + length) * intensity`.
pub fn add_slope<R: Rng>(field: &mut HeightField, intensity: f64, rng: &mut R) {
    let a: f64 = rng.random_range(-1.0..=1.0);
    let b: f64 = rng.random_range(-1.0..=1.0);
    let scale = det_sqrt((field.width() + field.length()) as f64) * intensity;
    tracing::trace!(a, b, scale, "slope coefficients");

    for i in 0..field.width() {
        for j in 0..field.length() {
            let h = field.get(i, j) + (a * i as f64 + b * j as f64) * scale;
            field.set(i, j, h);
        }
    }
}

/// Adds one octave of coherent noise, `intensity * noise(i, j; frequency)`.
pub fn add_noise(field: &mut HeightField, noise: &NoiseSource, intensity: f64, frequency: f64) {
    for i in 0..field.width() {
        for j in 0..field.length() {
            let h = field.get(i, j) + intensity * noise.sample(i, j, frequency);
            field.set(i, j, h);
        }
    }
}

/// Signed power-law reshape around `pivot_ratio * height_limit`.
///
/// Above the pivot the distance `d` becomes `(L - pivot)^(1-e) * d^e`; below
/// it becomes `pivot^(1-e) * d^e`. Exponents above 1 flatten the terrain
/// toward the pivot, exponents below 1 push it away.
pub fn apply_power(field: &mut HeightField, pivot_ratio: f64, exponent: f64) {
    let pivot = pivot_ratio * field.height_limit();
    apply_power_around(field, pivot, exponent);
}

/// [`apply_power`] pivoting on the median height.
pub fn apply_power_median(field: &mut HeightField, exponent: f64) {
    let pivot = field.median_height();
    apply_power_around(field, pivot, exponent);
}

fn apply_power_around(field: &mut HeightField, pivot: f64, exponent: f64) {
    let limit = field.height_limit();
    let top_span = limit - pivot;

    for h in field.heights_mut() {
        let d = *h - pivot;
        *h = if d >= 0.0 {
            pivot + power_offset(top_span, d, exponent)
        } else {
            pivot - power_offset(pivot, -d, exponent)
        };
    }
}

/// Pivots on the median but measures distance from the extremes: cells above
/// the median are reshaped by their distance to `height_limit`, cells below
/// by their distance to 0.
pub fn apply_power_top_and_bottom(field: &mut HeightField, exponent: f64) {
    let limit = field.height_limit();
    let median = field.median_height();
    let top_span = limit - median;

    for h in field.heights_mut() {
        *h = if *h >= median {
            limit - power_offset(top_span, limit - *h, exponent)
        } else {
            power_offset(median, *h, exponent)
        };
    }
}

/// `L - L^(1-e) * h^e` for every cell.
pub fn apply_power_top(field: &mut HeightField, exponent: f64) {
    let limit = field.height_limit();
    for h in field.heights_mut() {
        *h = limit - power_offset(limit, *h, exponent);
    }
}

/// `L^(1-e) * h^e` for every cell.
pub fn apply_power_bottom(field: &mut HeightField, exponent: f64) {
    let limit = field.height_limit();
    for h in field.heights_mut() {
        *h = power_offset(limit, *h, exponent);
    }
}

pub fn flatten_top(field: &mut HeightField) {
    apply_power_top(field, 2.0);
}

pub fn flatten_bottom(field: &mut HeightField) {
    apply_power_bottom(field, 2.0);
}

pub fn peak_top(field: &mut HeightField) {
    apply_power_top(field, 0.5);
}

pub fn peak_bottom(field: &mut HeightField) {
    apply_power_bottom(field, 0.5);
}

pub fn flatten_middle(field: &mut HeightField) {
    apply_power_median(field, 2.0);
}

pub fn flatten_top_and_bottom(field: &mut HeightField) {
    apply_power_top_and_bottom(field, 2.0);
}

/// Box-blurs every cell at or below `max_height_ratio * height_limit`.
///
/// Each pass visits cells row-major and replaces a cell with the mean of
/// itself and its in-bounds 4-neighbours. The update is in place, so a cell
/// sees neighbours already rewritten earlier in the same pass.
pub fn smooth(field: &mut HeightField, steps: u32, max_height_ratio: f64) {
    let threshold = max_height_ratio * field.height_limit();
    let (width, length) = (field.width(), field.length());

    for _ in 0..steps {
        for i in 0..width {
            for j in 0..length {
                let mut sum = field.get(i, j);
                if sum > threshold {
                    continue;
                }
                let mut count = 1.0;
                if i > 0 {
                    sum += field.get(i - 1, j);
                    count += 1.0;
                }
                if i + 1 < width {
                    sum += field.get(i + 1, j);
                    count += 1.0;
                }
                if j > 0 {
                    sum += field.get(i, j - 1);
                    count += 1.0;
                }
                if j + 1 < length {
                    sum += field.get(i, j + 1);
                    count += 1.0;
                }
                field.set(i, j, sum / count);
            }
        }
    }
}
