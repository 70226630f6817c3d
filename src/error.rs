//! Error types for the wallbrush library.

use thiserror::Error;

/// Result type alias for wallbrush operations.
pub type Result<T> = std::result::Result<T, PaintError>;

/// Error taxonomy for the recoloring pipeline and its collaborators.
#[derive(Error, Debug)]
pub enum PaintError {
    /// Image file could not be read or decoded.
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mask buffer is degenerate or does not match the image dimensions.
    #[error("Invalid mask: {reason}")]
    InvalidMask { reason: String },

    /// Polygon could not be constructed from the supplied coordinates.
    #[error("Invalid polygon: {reason}")]
    InvalidPolygon { reason: String },

    /// Color string is not a parseable `#rrggbb` value.
    #[error("Invalid color specification: {value}")]
    InvalidColor { value: String },

    /// Configuration profile holds values a stage cannot work with.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The external palette collaborator failed. Recovered internally by the
    /// built-in fallback table; public so provider implementors can raise it.
    #[error("Palette service failed: {message}")]
    PaletteService {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No image available to export, or encoding failed.
    #[error("Export failed: {reason}")]
    Export { reason: String },
}

impl PaintError {
    /// Create an image load error with an underlying cause.
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image load error without an underlying cause.
    pub fn image_load_message(message: impl Into<String>) -> Self {
        Self::ImageLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Create a palette service error with an underlying cause.
    pub fn palette<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::PaletteService {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a palette service error without an underlying cause.
    pub fn palette_message(message: impl Into<String>) -> Self {
        Self::PaletteService {
            message: message.into(),
            source: None,
        }
    }

    /// Check whether the session can recover from this error without caller
    /// intervention. Palette failures always fall back to the built-in table.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PaintError::PaletteService { .. })
    }

    /// Get a retry-capable, user-facing description of the failure. The prior
    /// valid image state remains interactive after any of these.
    pub fn user_message(&self) -> String {
        match self {
            PaintError::ImageLoad { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            PaintError::InvalidMask { .. } | PaintError::InvalidPolygon { .. } => {
                "The selected region is invalid. Please redraw the mask and try again.".to_string()
            }
            PaintError::InvalidColor { value } => {
                format!("\"{value}\" is not a valid color. Please pick a color like #3366ff.")
            }
            PaintError::InvalidConfig { reason } => {
                format!("The configuration profile is invalid: {reason}.")
            }
            PaintError::PaletteService { .. } => {
                "Color suggestions are temporarily unavailable. Showing built-in palettes."
                    .to_string()
            }
            PaintError::Export { .. } => {
                "Nothing to export yet. Load an image and apply a color first.".to_string()
            }
        }
    }
}
