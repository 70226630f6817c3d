// THEORY:
// The `PixelBuffer` module is the most fundamental unit of the recoloring
// system. It is a "dumb" data container for a decoded photograph: a flat
// width * height * RGBA byte vector with an enforced length invariant. Every
// pipeline stage consumes a buffer and produces a new one; nothing downstream
// mutates a buffer it did not allocate, which is what makes the pipeline a
// chain of pure functions.
//
// Key architectural principles:
// 1.  **Single suspend point**: Decoding is the only asynchronous boundary in
//     the whole pipeline. `load` reads bytes with tokio and decodes them on a
//     blocking worker; every stage after that is synchronous.
// 2.  **Analysis downscaling**: Variance estimation does not need full
//     resolution. `downscaled` caps the longest side so the heavy stages run
//     on a small buffer, and the mask is resampled back up afterwards.
// 3.  **Derived views, not mutations**: `grayscale` produces a separate
//     read-only luma field (Rec. 601 weights) instead of touching the RGBA
//     data, so the original buffer stays valid for compositing.

pub mod pixel_buffer {
    use image::imageops::FilterType;
    use image::{ExtendedColorType, ImageEncoder, RgbaImage};
    use std::path::Path;

    use crate::error::{PaintError, Result};

    /// Number of channels per pixel (RGBA).
    pub const CHANNELS: usize = 4;

    /// A "dumb" data container for a decoded RGBA image.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PixelBuffer {
        /// The width of the image in pixels.
        pub width: u32,
        /// The height of the image in pixels.
        pub height: u32,
        /// Flattened RGBA data; invariant: `len == width * height * 4`.
        pub data: Vec<u8>,
    }

    impl PixelBuffer {
        /// Wrap raw RGBA bytes, enforcing the length invariant.
        pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
            let expected = width as usize * height as usize * CHANNELS;
            if data.len() != expected {
                return Err(PaintError::InvalidMask {
                    reason: format!(
                        "buffer length {} does not match {}x{}x4 = {}",
                        data.len(),
                        width,
                        height,
                        expected
                    ),
                });
            }
            Ok(Self {
                width,
                height,
                data,
            })
        }

        /// Create a buffer filled with a single RGBA value.
        pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
            let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
            for _ in 0..(width as usize * height as usize) {
                data.extend_from_slice(&rgba);
            }
            Self {
                width,
                height,
                data,
            }
        }

        /// Load and decode an image file. This is the pipeline's only suspend
        /// point: the read goes through tokio and the decode runs on a
        /// blocking worker so the caller's task stays responsive.
        pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref().to_owned();
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                PaintError::image_load(format!("could not read {}", path.display()), e)
            })?;
            tokio::task::spawn_blocking(move || Self::decode(&bytes))
                .await
                .map_err(|e| PaintError::image_load("image decode task failed", e))?
        }

        /// Decode raw image bytes (any format the `image` crate understands)
        /// into an RGBA buffer.
        pub fn decode(bytes: &[u8]) -> Result<Self> {
            let decoded = image::load_from_memory(bytes)
                .map_err(|e| PaintError::image_load("could not decode image bytes", e))?;
            Ok(Self::from_image(decoded.to_rgba8()))
        }

        /// Read a single pixel. Callers must stay in bounds.
        pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
            let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
            [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ]
        }

        /// Produce a copy whose longest side is at most `max_side`, for the
        /// analysis stages. Returns an unchanged clone when already small
        /// enough; aspect ratio is preserved.
        pub fn downscaled(&self, max_side: u32) -> Self {
            let longest = self.width.max(self.height);
            if longest <= max_side {
                return self.clone();
            }
            let scale = max_side as f64 / longest as f64;
            let new_width = ((self.width as f64 * scale).round() as u32).max(1);
            let new_height = ((self.height as f64 * scale).round() as u32).max(1);
            let resized = image::imageops::resize(
                &self.to_image(),
                new_width,
                new_height,
                FilterType::Triangle,
            );
            Self::from_image(resized)
        }

        /// Derive the read-only luminance field (Rec. 601 weights).
        pub fn grayscale(&self) -> GrayscaleField {
            let mut data = Vec::with_capacity(self.width as usize * self.height as usize);
            for px in self.data.chunks_exact(CHANNELS) {
                let luma =
                    0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
                data.push(luma.round().min(255.0) as u8);
            }
            GrayscaleField {
                width: self.width,
                height: self.height,
                data,
            }
        }

        /// Encode the buffer as PNG bytes.
        pub fn encode_png(&self) -> Result<Vec<u8>> {
            let mut bytes = Vec::new();
            let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
            encoder
                .write_image(&self.data, self.width, self.height, ExtendedColorType::Rgba8)
                .map_err(|e| PaintError::Export {
                    reason: format!("PNG encoding failed: {e}"),
                })?;
            Ok(bytes)
        }

        /// Encode the buffer as JPEG bytes. Alpha is dropped since JPEG has
        /// no transparency.
        pub fn encode_jpeg(&self) -> Result<Vec<u8>> {
            let rgb = image::DynamicImage::ImageRgba8(self.to_image()).to_rgb8();
            let mut bytes = Vec::new();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 90);
            encoder
                .write_image(&rgb, self.width, self.height, ExtendedColorType::Rgb8)
                .map_err(|e| PaintError::Export {
                    reason: format!("JPEG encoding failed: {e}"),
                })?;
            Ok(bytes)
        }

        pub(crate) fn to_image(&self) -> RgbaImage {
            // The length invariant holds by construction, so from_raw cannot fail.
            RgbaImage::from_raw(self.width, self.height, self.data.clone())
                .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
        }

        pub(crate) fn from_image(img: RgbaImage) -> Self {
            let (width, height) = img.dimensions();
            Self {
                width,
                height,
                data: img.into_raw(),
            }
        }
    }

    /// Single-channel luminance view of a `PixelBuffer`. Read-only once built.
    #[derive(Debug, Clone, PartialEq)]
    pub struct GrayscaleField {
        /// The width of the field in pixels.
        pub width: u32,
        /// The height of the field in pixels.
        pub height: u32,
        /// Flattened luma values, one byte per pixel.
        pub data: Vec<u8>,
    }
}
