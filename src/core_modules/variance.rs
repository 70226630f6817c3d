// THEORY:
// The `variance` module is the segmentation signal of the whole engine. For
// every pixel it measures how rough the local neighborhood is: a 5x5 window
// (Chebyshev radius 2) of the grayscale field, reduced to the classic
// `E[x^2] - E[x]^2` variance. Painted wall surfaces photograph as
// low-frequency, texture-poor regions, so low variance is the best cheap
// proxy for "paintable" that needs no learned model.
//
// Key architectural principles:
// 1.  **Pure numeric stage**: No failure modes, no side effects. A grayscale
//     field in, a same-sized f64 field out.
// 2.  **Asymmetric border windows**: At the image edge the window is clipped
//     to valid pixels rather than padded, so border statistics come only from
//     real data. Border windows are smaller and asymmetric; that is accepted.
// 3.  **Clamped non-negative**: `s2 - m*m` can dip fractionally below zero
//     from floating-point error on near-uniform windows; the result is
//     clamped so downstream thresholds never see a negative roughness.

use crate::core_modules::pixel_buffer::pixel_buffer::GrayscaleField;

/// Chebyshev radius of the analysis window: 5x5 in the interior.
const WINDOW_RADIUS: i64 = 2;

/// Per-pixel local texture variance. Derived from a grayscale field and never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceField {
    /// The width of the field in pixels.
    pub width: u32,
    /// The height of the field in pixels.
    pub height: u32,
    /// Flattened non-negative variance values, one per pixel.
    pub data: Vec<f64>,
}

impl VarianceField {
    /// Mean variance across the whole field. Zero for an empty field.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

/// Compute the local texture variance for every pixel of a grayscale field.
pub fn compute_variance(gray: &GrayscaleField) -> VarianceField {
    let width = gray.width as i64;
    let height = gray.height as i64;
    let mut data = Vec::with_capacity(gray.data.len());

    for y in 0..height {
        let y0 = (y - WINDOW_RADIUS).max(0);
        let y1 = (y + WINDOW_RADIUS).min(height - 1);
        for x in 0..width {
            let x0 = (x - WINDOW_RADIUS).max(0);
            let x1 = (x + WINDOW_RADIUS).min(width - 1);

            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            let mut count = 0.0;
            for wy in y0..=y1 {
                let row = (wy * width) as usize;
                for wx in x0..=x1 {
                    let value = gray.data[row + wx as usize] as f64;
                    sum += value;
                    sum_sq += value * value;
                    count += 1.0;
                }
            }

            let mean = sum / count;
            let variance = (sum_sq / count - mean * mean).max(0.0);
            data.push(variance);
        }
    }

    VarianceField {
        width: gray.width,
        height: gray.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    fn gray_from(width: u32, height: u32, data: Vec<u8>) -> GrayscaleField {
        GrayscaleField {
            width,
            height,
            data,
        }
    }

    #[test]
    fn uniform_field_has_zero_variance() {
        let gray = gray_from(8, 6, vec![128; 48]);
        let variance = compute_variance(&gray);
        assert_eq!(variance.data.len(), 48);
        assert!(variance.data.iter().all(|&v| v == 0.0));
        assert_eq!(variance.mean(), 0.0);
    }

    #[test]
    fn variance_is_never_negative() {
        // A gradient image exercises many distinct windows, including the
        // clipped asymmetric ones along every border.
        let buffer = {
            let mut data = Vec::new();
            for y in 0..10u32 {
                for x in 0..10u32 {
                    let v = ((x * 25 + y * 7) % 256) as u8;
                    data.extend_from_slice(&[v, v, v, 255]);
                }
            }
            PixelBuffer::new(10, 10, data).unwrap()
        };
        let variance = compute_variance(&buffer.grayscale());
        assert!(variance.data.iter().all(|&v| v >= 0.0));
        assert!(variance.mean() > 0.0);
    }

    #[test]
    fn checkerboard_is_rougher_than_flat() {
        let mut data = vec![128u8; 100];
        for y in 0..10usize {
            for x in 0..5usize {
                data[y * 10 + x] = if (x + y) % 2 == 0 { 0 } else { 255 };
            }
        }
        let variance = compute_variance(&gray_from(10, 10, data));
        // Center of the checkered half vs center of the flat half.
        let rough = variance.data[5 * 10 + 2];
        let flat = variance.data[5 * 10 + 9];
        assert!(rough > flat);
        assert!(rough > 1000.0);
    }

    #[test]
    fn border_pixels_use_clipped_windows() {
        // A single bright pixel in the corner: the corner's 3x3 clipped
        // window sees it at a higher ratio than an interior 5x5 would.
        let mut data = vec![0u8; 64];
        data[0] = 255;
        let variance = compute_variance(&gray_from(8, 8, data));
        assert!(variance.data[0] > 0.0);
        // Pixels outside the corner's reach are untouched flat zero.
        assert_eq!(variance.data[63], 0.0);
    }
}
