// THEORY:
// The `pipeline` module is the final, top-level API for the recoloring
// engine. It encapsulates the full stage stack into a single, easy-to-use
// interface: callers hand it a decoded photograph, a sensitivity, and a
// target color, and receive a recolored buffer without ever touching the
// intermediate fields.
//
// The pipeline itself is entirely state-free: every invocation allocates its
// own buffers and no stage output is cached across requests, so one pipeline
// value can serve any number of logically concurrent requests. Arbitration
// between rapid-fire preview requests (dropping stale results) is explicitly
// the caller's job; the engine performs no cancellation or debouncing.

use crate::config::RecolorConfig;
use crate::core_modules::color_spec::ColorSpec;
use crate::core_modules::compositor::composite;
use crate::core_modules::mask::MaskBuffer;
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::polygon::{rasterize, Polygon};
use crate::core_modules::region_filter::region_filter::filter_small_regions;
use crate::core_modules::thresholder::threshold;
use crate::core_modules::variance::compute_variance;
use crate::error::Result;

/// Highlight color of the mask-preview overlay.
const PREVIEW_RGB: [u8; 3] = [0, 180, 216];

/// The main, top-level struct for the recoloring engine.
#[derive(Debug, Clone, Default)]
pub struct RecolorPipeline {
    config: RecolorConfig,
}

impl RecolorPipeline {
    pub fn new(config: RecolorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecolorConfig {
        &self.config
    }

    /// Run the automatic wall-mask heuristic: downscale for analysis, derive
    /// the variance field, threshold it adaptively, drop spurious small
    /// components, and resample the mask back to full image resolution.
    pub fn detect_wall_mask(&self, image: &PixelBuffer, sensitivity: f64) -> Result<MaskBuffer> {
        let sensitivity = self.config.clamp_sensitivity(sensitivity);

        // Stage 1: Analysis-scale buffer.
        let analysis = image.downscaled(self.config.analysis_max_side);

        // Stage 2: Texture variance over the grayscale derivation.
        let variance = compute_variance(&analysis.grayscale());
        log::debug!(
            "variance field {}x{}, mean {:.2}",
            variance.width,
            variance.height,
            variance.mean()
        );

        // Stage 3: Adaptive threshold.
        let mask = threshold(&variance, sensitivity, &self.config);

        // Stage 4: Connected-component cleanup (with relaxed fallback).
        let mask = filter_small_regions(&mask, &variance, sensitivity, &self.config);
        log::debug!("filtered mask coverage {:.1}%", mask.coverage() * 100.0);

        // Stage 5: Back to full resolution, with feathered edges.
        Ok(mask.upscale(image.width, image.height))
    }

    /// Recolor through an existing mask buffer (automatic or manual — the
    /// compositor is mask-source-agnostic).
    pub fn recolor(
        &self,
        image: &PixelBuffer,
        mask: &MaskBuffer,
        color: &ColorSpec,
    ) -> Result<PixelBuffer> {
        composite(image, mask, color, self.config.overlay_opacity)
    }

    /// Recolor through the union of manually drawn polygon interiors. An
    /// empty polygon list yields an unmodified copy of the image.
    pub fn recolor_polygons(
        &self,
        image: &PixelBuffer,
        polygons: &[Polygon],
        color: &ColorSpec,
    ) -> Result<PixelBuffer> {
        let mask = rasterize(polygons, image.width, image.height);
        self.recolor(image, &mask, color)
    }

    /// The full data flow of a recolor request: automatic detection merged
    /// with any explicit polygon masks, then the texture-preserving
    /// composite.
    pub fn detect_and_recolor(
        &self,
        image: &PixelBuffer,
        polygons: &[Polygon],
        sensitivity: f64,
        color: &ColorSpec,
    ) -> Result<PixelBuffer> {
        let auto = self.detect_wall_mask(image, sensitivity)?;
        let mask = if polygons.is_empty() {
            auto
        } else {
            auto.union(&rasterize(polygons, image.width, image.height))?
        };
        self.recolor(image, &mask, color)
    }

    /// Render a mask as a standalone RGBA image whose transparency encodes
    /// the detected region. Visual-debugging surface.
    pub fn mask_preview(&self, mask: &MaskBuffer) -> PixelBuffer {
        let mut data = Vec::with_capacity(mask.data.len() * 4);
        for &coverage in &mask.data {
            data.extend_from_slice(&[PREVIEW_RGB[0], PREVIEW_RGB[1], PREVIEW_RGB[2], coverage]);
        }
        PixelBuffer {
            width: mask.width,
            height: mask.height,
            data,
        }
    }
}
