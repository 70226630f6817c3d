// THEORY:
// The `region_filter` is the spatial cleanup layer of the mask pipeline. The
// thresholder works pixel-by-pixel, so its output is speckled with tiny
// false-positive islands (a patch of smooth lampshade, a blurred book spine).
// This stage partitions the paintable pixels into 8-connected components with
// a breadth-first flood fill and discards every component smaller than an
// area-derived minimum. Component discovery runs in raster order, but
// membership is purely size-based, so the kept/discarded set is independent
// of traversal order — the stage is deterministic and order-independent.
//
// Fallback policy: if filtering discards everything, the stage does not
// return an empty mask. It recomputes a relaxed mask directly from the
// variance field (higher multiplier, lower floor) and returns that,
// unfiltered. The engine prefers an over-permissive mask over no mask at all,
// because a user can always tighten a loose selection but cannot work with an
// empty one.

use crate::config::RecolorConfig;
use crate::core_modules::mask::MaskBuffer;
use crate::core_modules::thresholder::{relaxed_threshold, PAINTABLE};
use crate::core_modules::variance::VarianceField;

pub mod region_filter {
    use super::*;
    use std::collections::VecDeque;

    /// Offsets of the 8-connected neighborhood.
    const NEIGHBORS: [(i64, i64); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];

    /// Remove connected components below the sensitivity-scaled minimum size.
    /// Falls back to the relaxed variance mask rather than returning an empty
    /// result.
    pub fn filter_small_regions(
        mask: &MaskBuffer,
        variance: &VarianceField,
        sensitivity: f64,
        config: &RecolorConfig,
    ) -> MaskBuffer {
        let width = mask.width as i64;
        let height = mask.height as i64;
        let area = mask.data.len();
        let min_size = config
            .min_region_floor
            .max((area as f64 * config.min_region_fraction / sensitivity).floor() as usize);

        let mut visited = vec![false; area];
        let mut kept = vec![0u8; area];
        let mut kept_any = false;

        for start in 0..area {
            if visited[start] || mask.data[start] == 0 {
                continue;
            }

            // Flood-fill one component, collecting its pixel indices.
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(start);

            while let Some(index) = queue.pop_front() {
                component.push(index);
                let x = (index as i64) % width;
                let y = (index as i64) / width;

                for (dx, dy) in NEIGHBORS {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx < 0 || nx >= width || ny < 0 || ny >= height {
                        continue;
                    }
                    let neighbor = (ny * width + nx) as usize;
                    if !visited[neighbor] && mask.data[neighbor] > 0 {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            if component.len() >= min_size {
                kept_any = true;
                for index in component {
                    kept[index] = PAINTABLE;
                }
            }
        }

        if !kept_any {
            log::warn!(
                "component filter discarded every region (min size {min_size}); \
                 falling back to the relaxed variance mask"
            );
            return relaxed_threshold(variance, sensitivity, config);
        }

        MaskBuffer {
            width: mask.width,
            height: mask.height,
            data: kept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::region_filter::filter_small_regions;
    use super::*;

    fn flat_variance(width: u32, height: u32, value: f64) -> VarianceField {
        VarianceField {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }

    #[test]
    fn small_islands_are_removed() {
        let (w, h) = (60u32, 60u32);
        let mut data = vec![0u8; (w * h) as usize];
        // One large plausible wall region.
        for y in 0..40usize {
            for x in 0..40usize {
                data[y * w as usize + x] = PAINTABLE;
            }
        }
        // A 2x2 speck far away from it.
        for y in 55..57usize {
            for x in 55..57usize {
                data[y * w as usize + x] = PAINTABLE;
            }
        }
        let mask = MaskBuffer::new(w, h, data).unwrap();
        let variance = flat_variance(w, h, 100.0);
        let filtered = filter_small_regions(&mask, &variance, 1.0, &RecolorConfig::default());

        assert_eq!(filtered.data[10 * w as usize + 10], PAINTABLE);
        assert_eq!(filtered.data[55 * w as usize + 55], 0);
    }

    #[test]
    fn diagonal_pixels_join_one_component() {
        // A diagonal staircase is a single 8-connected component; with a
        // permissive minimum it must survive as one piece.
        let mut config = RecolorConfig::default();
        config.min_region_floor = 5;
        config.min_region_fraction = 0.0;

        let w = 8u32;
        let mut data = vec![0u8; 64];
        for i in 0..6usize {
            data[i * w as usize + i] = PAINTABLE;
        }
        let mask = MaskBuffer::new(w, 8, data).unwrap();
        let variance = flat_variance(w, 8, 500.0);
        let filtered = filter_small_regions(&mask, &variance, 1.0, &config);
        for i in 0..6usize {
            assert_eq!(filtered.data[i * w as usize + i], PAINTABLE);
        }
    }

    #[test]
    fn empty_result_falls_back_to_relaxed_mask() {
        let (w, h) = (50u32, 50u32);
        let mut data = vec![0u8; (w * h) as usize];
        // Only a 3-pixel speck: below any plausible minimum size.
        data[0] = PAINTABLE;
        data[1] = PAINTABLE;
        data[2] = PAINTABLE;
        let mask = MaskBuffer::new(w, h, data).unwrap();

        // Non-constant variance field whose values sit below the relaxed
        // threshold, so the fallback has something to admit.
        let mut variance = flat_variance(w, h, 20.0);
        variance.data[0] = 90.0;

        let filtered = filter_small_regions(&mask, &variance, 1.0, &RecolorConfig::default());
        assert!(!filtered.is_blank());
        assert!(filtered.coverage() > 0.9);
    }

    #[test]
    fn sensitivity_shrinks_the_minimum_size() {
        // min_size = max(40, floor(area * 0.03 / sensitivity)): a component
        // of 120 pixels in a 64x64 image dies at sensitivity 1.0
        // (min 122) but survives at 1.6 (min 76).
        let (w, h) = (64u32, 64u32);
        let mut data = vec![0u8; (w * h) as usize];
        for y in 0..10usize {
            for x in 0..12usize {
                data[y * w as usize + x] = PAINTABLE;
            }
        }
        let mask = MaskBuffer::new(w, h, data).unwrap();
        let variance = flat_variance(w, h, 1000.0);
        let config = RecolorConfig::default();

        let strict = filter_small_regions(&mask, &variance, 1.0, &config);
        let loose = filter_small_regions(&mask, &variance, 1.6, &config);
        // At 1.0 the component is discarded, so the relaxed fallback runs:
        // its limit of max(30, 1000 * 1.2) = 1200 admits the whole field.
        assert!(strict.coverage() > 0.99);
        // At 1.6 the component survives filtering as-is.
        assert_eq!(loose.data[5 * w as usize + 5], PAINTABLE);
        assert_eq!(loose.data[(h as usize - 1) * w as usize + 63], 0);
    }
}
