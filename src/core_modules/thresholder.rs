// THEORY:
// The `thresholder` turns the continuous variance field into a binary
// paintable / non-paintable decision. The cut line adapts to the photograph:
// it is derived from the image's own mean variance, scaled by the caller's
// sensitivity, with a fixed floor so a nearly uniform image (mean variance
// close to zero) still gets a usable threshold instead of one that excludes
// everything.
//
// A pixel is paintable when its variance falls BELOW the threshold: walls are
// texture-poor relative to furniture, windows and trim. This is a heuristic,
// not a classifier — a heavily textured wall or a flat-fronted wardrobe will
// be mis-segmented, and that is an accepted limitation of the approach.

use crate::config::RecolorConfig;
use crate::core_modules::mask::MaskBuffer;
use crate::core_modules::variance::VarianceField;

/// Coverage value written for paintable pixels.
pub const PAINTABLE: u8 = 255;

/// Classify each pixel against the sensitivity-scaled adaptive threshold.
/// Higher sensitivity raises the threshold and admits more pixels.
pub fn threshold(
    variance: &VarianceField,
    sensitivity: f64,
    config: &RecolorConfig,
) -> MaskBuffer {
    let limit = config
        .threshold_floor
        .max(variance.mean() * config.threshold_factor * sensitivity);
    threshold_at(variance, limit)
}

/// The relaxed fallback used when component filtering empties the mask: a
/// higher multiplier and a lower floor, applied straight to the variance
/// field with no component filtering afterwards.
pub fn relaxed_threshold(
    variance: &VarianceField,
    sensitivity: f64,
    config: &RecolorConfig,
) -> MaskBuffer {
    let limit = config
        .relaxed_floor
        .max(variance.mean() * config.relaxed_factor * sensitivity);
    threshold_at(variance, limit)
}

/// Mark every pixel whose variance is below `limit` as paintable.
fn threshold_at(variance: &VarianceField, limit: f64) -> MaskBuffer {
    let data = variance
        .data
        .iter()
        .map(|&v| if v < limit { PAINTABLE } else { 0 })
        .collect();
    MaskBuffer {
        width: variance.width,
        height: variance.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(width: u32, height: u32, data: Vec<f64>) -> VarianceField {
        VarianceField {
            width,
            height,
            data,
        }
    }

    #[test]
    fn floor_keeps_uniform_images_paintable() {
        // Mean variance ~0 would give a threshold of ~0 without the floor;
        // with it, every zero-variance pixel still classifies as paintable.
        let variance = field(4, 4, vec![0.0; 16]);
        let mask = threshold(&variance, 1.0, &RecolorConfig::default());
        assert!(mask.data.iter().all(|&v| v == PAINTABLE));
    }

    #[test]
    fn rough_pixels_are_excluded() {
        let mut data = vec![10.0; 16];
        data[5] = 5000.0;
        let variance = field(4, 4, data);
        let mask = threshold(&variance, 1.0, &RecolorConfig::default());
        assert_eq!(mask.data[5], 0);
        assert_eq!(mask.data[0], PAINTABLE);
    }

    #[test]
    fn paintable_count_grows_with_sensitivity() {
        let config = RecolorConfig::default();
        let data: Vec<f64> = (0..400).map(|i| (i as f64 * 7.3) % 900.0).collect();
        let variance = field(20, 20, data);

        let mut last = 0usize;
        for sensitivity in [0.6, 0.8, 1.0, 1.2, 1.6] {
            let mask = threshold(&variance, sensitivity, &config);
            let count = mask.data.iter().filter(|&&v| v > 0).count();
            assert!(count >= last, "count dropped at sensitivity {sensitivity}");
            last = count;
        }
    }

    #[test]
    fn relaxed_threshold_is_more_permissive() {
        let config = RecolorConfig::default();
        let data: Vec<f64> = (0..100).map(|i| i as f64 * 2.0).collect();
        let variance = field(10, 10, data);
        let strict = threshold(&variance, 1.0, &config);
        let relaxed = relaxed_threshold(&variance, 1.0, &config);
        let strict_count = strict.data.iter().filter(|&&v| v > 0).count();
        let relaxed_count = relaxed.data.iter().filter(|&&v| v > 0).count();
        assert!(relaxed_count >= strict_count);
    }
}
