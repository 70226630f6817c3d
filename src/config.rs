// THEORY:
// The `config` module gathers every heuristic constant of the segmentation and
// compositing pipeline into a single tunable struct. The specific numbers
// (threshold floor 40, factor 0.9, region fraction 0.03, relaxed 1.2/30) were
// chosen empirically to avoid empty masks on near-uniform photographs. They are
// defaults, not invariants: callers can deserialize a different profile from
// JSON and hand it to `RecolorPipeline::new` without touching any stage code.

use serde::{Deserialize, Serialize};

use crate::error::{PaintError, Result};

/// Tunable parameters for mask detection and compositing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorConfig {
    /// Lower bound for the adaptive variance threshold. Prevents near-zero
    /// thresholds on near-uniform images.
    pub threshold_floor: f64,
    /// Multiplier applied to the mean variance when deriving the threshold.
    pub threshold_factor: f64,
    /// Lower bound for the minimum connected-component size, in pixels.
    pub min_region_floor: usize,
    /// Fraction of the image area a component must reach to survive filtering.
    pub min_region_fraction: f64,
    /// Lower bound for the relaxed fallback threshold.
    pub relaxed_floor: f64,
    /// Multiplier for the relaxed fallback threshold.
    pub relaxed_factor: f64,
    /// Opacity of the screen-blend pass that restores brightness after the
    /// multiply pass. Documented working band is 0.15-0.2.
    pub overlay_opacity: f64,
    /// Longest image side used for mask analysis; larger images are downscaled
    /// before the variance stage and the mask is upscaled back afterwards.
    pub analysis_max_side: u32,
    /// Lowest accepted sensitivity value.
    pub sensitivity_min: f64,
    /// Highest accepted sensitivity value.
    pub sensitivity_max: f64,
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            threshold_floor: 40.0,
            threshold_factor: 0.9,
            min_region_floor: 40,
            min_region_fraction: 0.03,
            relaxed_floor: 30.0,
            relaxed_factor: 1.2,
            overlay_opacity: 0.18,
            analysis_max_side: 400,
            sensitivity_min: 0.6,
            sensitivity_max: 1.6,
        }
    }
}

impl RecolorConfig {
    /// Parse a configuration profile from a JSON string. Missing fields fall
    /// back to the defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| PaintError::InvalidConfig {
            reason: format!("invalid config profile: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject profiles that would make a stage meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.sensitivity_min <= 0.0 || self.sensitivity_max < self.sensitivity_min {
            return Err(PaintError::InvalidConfig {
                reason: format!(
                    "sensitivity bounds [{}, {}] are not a valid range",
                    self.sensitivity_min, self.sensitivity_max
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(PaintError::InvalidConfig {
                reason: format!("overlay opacity {} outside [0, 1]", self.overlay_opacity),
            });
        }
        if self.analysis_max_side == 0 {
            return Err(PaintError::InvalidConfig {
                reason: "analysis_max_side must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Clamp a caller-supplied sensitivity into the accepted range.
    pub fn clamp_sensitivity(&self, sensitivity: f64) -> f64 {
        sensitivity.clamp(self.sensitivity_min, self.sensitivity_max)
    }
}
