// THEORY:
// The `session` module is the explicit home for everything a UI would
// otherwise scatter across reactive state hooks: the current photograph, the
// last successful recolor, the list of manually drawn polygon masks, and the
// user's saved colors. Modeling it as one struct with narrow mutation
// operations keeps the pipeline itself state-free and gives the error policy
// somewhere to live: a failed recolor returns the error and leaves the
// previous result untouched, so the caller always has a valid image to show.
//
// Lifecycle: created on session start, mutated only through the operations
// below, and reset (masks, result) whenever a new image is loaded. Nothing
// here persists across sessions.

use crate::core_modules::color_spec::ColorSpec;
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::polygon::Polygon;
use crate::error::{PaintError, Result};
use crate::pipeline::RecolorPipeline;

/// Fixed stem of every exported file.
const EXPORT_STEM: &str = "wallbrush-export";

/// Raster format for the export surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// An encoded export: suggested filename plus the image bytes.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Per-session mutable state. See the module THEORY for the lifecycle.
#[derive(Debug, Default)]
pub struct SessionState {
    current_image: Option<PixelBuffer>,
    recolored: Option<PixelBuffer>,
    masks: Vec<Polygon>,
    saved_colors: Vec<ColorSpec>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working photograph. Masks and any previous recolor belong
    /// to the old image and are cleared.
    pub fn load_image(&mut self, image: PixelBuffer) {
        self.current_image = Some(image);
        self.recolored = None;
        self.masks.clear();
    }

    pub fn current_image(&self) -> Option<&PixelBuffer> {
        self.current_image.as_ref()
    }

    pub fn recolored(&self) -> Option<&PixelBuffer> {
        self.recolored.as_ref()
    }

    pub fn masks(&self) -> &[Polygon] {
        &self.masks
    }

    pub fn add_mask(&mut self, polygon: Polygon) {
        self.masks.push(polygon);
    }

    /// Remove one mask by index. Returns false when the index is out of
    /// range.
    pub fn delete_mask(&mut self, index: usize) -> bool {
        if index < self.masks.len() {
            self.masks.remove(index);
            true
        } else {
            false
        }
    }

    pub fn clear_masks(&mut self) {
        self.masks.clear();
    }

    pub fn saved_colors(&self) -> &[ColorSpec] {
        &self.saved_colors
    }

    /// Save a color for later reuse; duplicates are ignored.
    pub fn save_color(&mut self, color: ColorSpec) {
        if !self.saved_colors.contains(&color) {
            self.saved_colors.push(color);
        }
    }

    /// Remove one saved color by index. Returns false when out of range.
    pub fn remove_color(&mut self, index: usize) -> bool {
        if index < self.saved_colors.len() {
            self.saved_colors.remove(index);
            true
        } else {
            false
        }
    }

    /// Recolor the current image: through the session's polygon masks if any
    /// were drawn, otherwise through automatic wall detection. On success the
    /// result becomes the session's recolored image; on failure the previous
    /// result is left intact.
    pub fn apply_color(
        &mut self,
        pipeline: &RecolorPipeline,
        color: &ColorSpec,
        sensitivity: f64,
    ) -> Result<&PixelBuffer> {
        let image = self.current_image.as_ref().ok_or_else(|| {
            PaintError::image_load_message("no image loaded in this session")
        })?;

        let result = if self.masks.is_empty() {
            let mask = pipeline.detect_wall_mask(image, sensitivity)?;
            pipeline.recolor(image, &mask, color)?
        } else {
            pipeline.recolor_polygons(image, &self.masks, color)?
        };

        Ok(self.recolored.insert(result))
    }

    /// Encode the current recolored image (or the original, if no recolor
    /// happened yet) for download. Fails with an export error when the
    /// session holds no image at all.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact> {
        let image = self
            .recolored
            .as_ref()
            .or(self.current_image.as_ref())
            .ok_or_else(|| PaintError::Export {
                reason: "no image available to export".to_string(),
            })?;

        let bytes = match format {
            ExportFormat::Png => image.encode_png()?,
            ExportFormat::Jpeg => image.encode_jpeg()?,
        };

        Ok(ExportArtifact {
            filename: format!("{EXPORT_STEM}.{}", format.extension()),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_mask() -> Polygon {
        Polygon::from_flat(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0]).unwrap()
    }

    #[test]
    fn loading_an_image_clears_masks_and_result() {
        let mut session = SessionState::new();
        session.load_image(PixelBuffer::filled(8, 8, [128, 128, 128, 255]));
        session.add_mask(square_mask());

        let pipeline = RecolorPipeline::default();
        let color = ColorSpec::parse("#ff0000").unwrap();
        session.apply_color(&pipeline, &color, 1.0).unwrap();
        assert!(session.recolored().is_some());

        session.load_image(PixelBuffer::filled(4, 4, [10, 10, 10, 255]));
        assert!(session.masks().is_empty());
        assert!(session.recolored().is_none());
    }

    #[test]
    fn saved_colors_deduplicate() {
        let mut session = SessionState::new();
        session.save_color(ColorSpec::parse("#AABBCC").unwrap());
        session.save_color(ColorSpec::parse("#aabbcc").unwrap());
        assert_eq!(session.saved_colors().len(), 1);
        assert!(session.remove_color(0));
        assert!(!session.remove_color(0));
    }

    #[test]
    fn mask_deletion_by_index() {
        let mut session = SessionState::new();
        session.add_mask(square_mask());
        assert!(!session.delete_mask(3));
        assert!(session.delete_mask(0));
        assert!(session.masks().is_empty());
    }

    #[test]
    fn apply_without_image_fails_and_keeps_nothing() {
        let mut session = SessionState::new();
        let pipeline = RecolorPipeline::default();
        let color = ColorSpec::parse("#123456").unwrap();
        assert!(session.apply_color(&pipeline, &color, 1.0).is_err());
        assert!(session.recolored().is_none());
    }

    #[test]
    fn export_prefers_the_recolored_image() {
        let mut session = SessionState::new();
        assert!(matches!(
            session.export(ExportFormat::Png),
            Err(PaintError::Export { .. })
        ));

        session.load_image(PixelBuffer::filled(6, 6, [128, 128, 128, 255]));
        let original_export = session.export(ExportFormat::Png).unwrap();
        assert_eq!(original_export.filename, "wallbrush-export.png");

        let pipeline = RecolorPipeline::default();
        let color = ColorSpec::parse("#3366ff").unwrap();
        session.apply_color(&pipeline, &color, 1.0).unwrap();
        let recolored_export = session.export(ExportFormat::Png).unwrap();
        assert_ne!(recolored_export.bytes, original_export.bytes);

        let jpeg = session.export(ExportFormat::Jpeg).unwrap();
        assert_eq!(jpeg.filename, "wallbrush-export.jpg");
    }
}
