// THEORY:
// This file is the main entry point for the `wallbrush` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (UIs, export surfaces, and
// other orchestrators).
//
// The primary goal is to export the `RecolorPipeline` and its associated data
// structures (`RecolorConfig`, `SessionState`, the mask and buffer types) as
// the clean, high-level interface for the entire recoloring engine. The
// internal stage modules (`core_modules`) stay encapsulated behind it,
// providing a clean separation of concerns.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod palette;
pub mod pipeline;
pub mod session;

pub use config::RecolorConfig;
pub use core_modules::color_spec::ColorSpec;
pub use core_modules::mask::MaskBuffer;
pub use core_modules::pixel_buffer::pixel_buffer::{GrayscaleField, PixelBuffer};
pub use core_modules::polygon::Polygon;
pub use core_modules::variance::VarianceField;
pub use error::{PaintError, Result};
pub use palette::{Palette, PaletteColor, PaletteProvider};
pub use pipeline::RecolorPipeline;
pub use session::{ExportArtifact, ExportFormat, SessionState};
