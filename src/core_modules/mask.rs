// THEORY:
// The `MaskBuffer` is the contract that makes the compositor mask-source-
// agnostic. Both the automatic variance heuristic and the manual polygon
// rasterizer produce the same thing: a width * height coverage field where 0
// means "leave this pixel alone" and 255 means "fully paintable." The
// thresholding and component-filter stages only ever write the two extreme
// values; the upscaler is deliberately allowed to introduce intermediate
// alpha at region edges, because a smoothly feathered mask hides the seam
// between painted and untouched pixels far better than a blocky binary one.

use image::GrayImage;
use image::imageops::FilterType;

use crate::error::{PaintError, Result};

/// Per-pixel paint coverage. 0 = not paintable, 255 = fully paintable;
/// intermediate values only appear at upscaled region edges.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBuffer {
    /// The width of the mask in pixels.
    pub width: u32,
    /// The height of the mask in pixels.
    pub height: u32,
    /// Flattened coverage values, one byte per pixel.
    pub data: Vec<u8>,
}

impl MaskBuffer {
    /// Wrap raw coverage bytes, enforcing the length invariant.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(PaintError::InvalidMask {
                reason: format!(
                    "mask length {} does not match {}x{} = {}",
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

    /// An all-zero mask (nothing paintable).
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Fraction of pixels with any coverage at all.
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let covered = self.data.iter().filter(|&&v| v > 0).count();
        covered as f64 / self.data.len() as f64
    }

    /// True when no pixel is paintable.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Resample the mask to the target resolution. Identity when already
    /// there; otherwise bilinear, which feathers region edges by design.
    pub fn upscale(&self, target_width: u32, target_height: u32) -> Self {
        if self.width == target_width && self.height == target_height {
            return self.clone();
        }
        let gray = GrayImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| GrayImage::new(self.width, self.height));
        let resized =
            image::imageops::resize(&gray, target_width, target_height, FilterType::Triangle);
        Self {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
        }
    }

    /// Merge another mask into this one (per-pixel maximum). Both sources of
    /// masks meet here when a request carries manual polygons on top of the
    /// automatic detection.
    pub fn union(&self, other: &Self) -> Result<Self> {
        if self.width != other.width || self.height != other.height {
            return Err(PaintError::InvalidMask {
                reason: format!(
                    "cannot merge {}x{} mask with {}x{} mask",
                    self.width, self.height, other.width, other.height
                ),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a.max(b))
            .collect();
        Ok(Self {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_invariant_is_enforced() {
        assert!(MaskBuffer::new(3, 3, vec![0; 9]).is_ok());
        assert!(MaskBuffer::new(3, 3, vec![0; 8]).is_err());
    }

    #[test]
    fn upscale_at_native_resolution_is_identity() {
        let mask = MaskBuffer::new(4, 2, vec![255, 0, 255, 0, 0, 255, 0, 255]).unwrap();
        assert_eq!(mask.upscale(4, 2), mask);
    }

    #[test]
    fn upscale_feathers_edges() {
        let mut data = vec![0u8; 16];
        for y in 0..4 {
            for x in 0..2 {
                data[y * 4 + x] = 255;
            }
        }
        let mask = MaskBuffer::new(4, 4, data).unwrap();
        let big = mask.upscale(16, 16);
        assert_eq!((big.width, big.height), (16, 16));
        // Bilinear resampling must produce soft values at the boundary.
        assert!(big.data.iter().any(|&v| v > 0 && v < 255));
        // Far side of the mask stays untouched.
        assert_eq!(big.data[15], 0);
        assert_eq!(big.data[0], 255);
    }

    #[test]
    fn union_takes_per_pixel_maximum() {
        let a = MaskBuffer::new(2, 1, vec![255, 0]).unwrap();
        let b = MaskBuffer::new(2, 1, vec![10, 200]).unwrap();
        assert_eq!(a.union(&b).unwrap().data, vec![255, 200]);
        let c = MaskBuffer::empty(3, 1);
        assert!(a.union(&c).is_err());
    }

    #[test]
    fn coverage_counts_any_nonzero() {
        let mask = MaskBuffer::new(2, 2, vec![255, 128, 0, 0]).unwrap();
        assert_eq!(mask.coverage(), 0.5);
        assert!(!mask.is_blank());
        assert!(MaskBuffer::empty(2, 2).is_blank());
    }
}
