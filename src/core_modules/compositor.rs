// THEORY:
// The `compositor` is where the recoloring actually happens, and the reason
// the result looks like paint instead of a sticker. A naive fill would
// replace masked pixels with the flat target color and erase every shadow
// and highlight. This stage instead layers two blend passes, both restricted
// to mask coverage:
//
// 1.  **Multiply pass**: `base * color / 255` per channel. Multiplication
//     darkens the base by the target color while scaling with the base's own
//     luminance, so shadow and highlight structure survives.
// 2.  **Screen pass at low opacity**: multiply alone leaves the result darker
//     than the chosen paint. Re-drawing the color with a screen blend
//     (`255 - (255-a)(255-b)/255`) at ~0.18 opacity restores the lost
//     brightness without flattening the texture.
//
// The mask value acts as a per-pixel alpha: 0 passes the original byte
// through untouched (bit-identical, not merely close), 255 applies the full
// two-pass result, and the soft intermediate values the upscaler produces
// fade the paint out across region edges. An entirely blank mask therefore
// yields an exact copy of the input, which is a valid result, not an error.

use crate::core_modules::color_spec::ColorSpec;
use crate::core_modules::mask::MaskBuffer;
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, CHANNELS};
use crate::error::{PaintError, Result};

/// Apply a flat color through a mask while retaining the base image's
/// luminance detail. Dimensions of the result always equal the input's.
pub fn composite(
    original: &PixelBuffer,
    mask: &MaskBuffer,
    color: &ColorSpec,
    overlay_opacity: f64,
) -> Result<PixelBuffer> {
    if mask.width != original.width || mask.height != original.height {
        return Err(PaintError::InvalidMask {
            reason: format!(
                "mask {}x{} does not match image {}x{}",
                mask.width, mask.height, original.width, original.height
            ),
        });
    }

    let paint = color.rgb();
    let mut data = original.data.clone();

    for (i, &coverage) in mask.data.iter().enumerate() {
        if coverage == 0 {
            continue;
        }
        let alpha = coverage as f64 / 255.0;
        let offset = i * CHANNELS;

        for channel in 0..3 {
            let base = original.data[offset + channel] as f64;
            let target = paint[channel] as f64;

            let multiplied = base * target / 255.0;
            let screened = 255.0 - (255.0 - multiplied) * (255.0 - target) / 255.0;
            let painted = multiplied + (screened - multiplied) * overlay_opacity;

            let blended = base + (painted - base) * alpha;
            data[offset + channel] = blended.round().clamp(0.0, 255.0) as u8;
        }
        // The alpha channel passes through unchanged.
    }

    PixelBuffer::new(original.width, original.height, data)
}
