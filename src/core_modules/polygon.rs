// THEORY:
// The `polygon` module is the manual counterpart of the automatic mask
// heuristic. A user traces a wall outline point by point; those vertices
// arrive here as a closed polygon (the edge from last vertex back to first is
// implicit) and get rasterized onto a full-resolution MaskBuffer with an
// even-odd scanline fill sampled at pixel centers.
//
// Validation happens at construction, not at render time: an odd-length
// coordinate list or fewer than three vertices can never become a `Polygon`
// value, so every later stage can assume its polygons are well-formed. Ties
// at shared edges are implementation-defined and not a correctness concern;
// the center-sampling rule used here gives exact pixel counts for
// axis-aligned rectangles, which is what the tests pin down.

use crate::core_modules::mask::MaskBuffer;
use crate::core_modules::thresholder::PAINTABLE;
use crate::error::{PaintError, Result};

/// A validated closed polygon in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<(f64, f64)>,
}

impl Polygon {
    /// Build a polygon from vertex pairs. At least three vertices required.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.len() < 3 {
            return Err(PaintError::InvalidPolygon {
                reason: format!("{} vertices, need at least 3", points.len()),
            });
        }
        Ok(Self { points })
    }

    /// Build a polygon from a flat `[x0, y0, x1, y1, ...]` coordinate list,
    /// the shape manual masking tools emit. Odd-length lists are rejected.
    pub fn from_flat(coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(PaintError::InvalidPolygon {
                reason: format!("odd coordinate count {}", coords.len()),
            });
        }
        Self::new(coords.chunks_exact(2).map(|c| (c[0], c[1])).collect())
    }

    /// The vertex list. The closing edge back to the first vertex is implicit.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// Rasterize the union of filled polygon interiors onto a mask of the given
/// dimensions. Pixels are tested at their centers with an even-odd fill.
pub fn rasterize(polygons: &[Polygon], width: u32, height: u32) -> MaskBuffer {
    let mut mask = MaskBuffer::empty(width, height);
    for polygon in polygons {
        fill_polygon(polygon, &mut mask);
    }
    mask
}

fn fill_polygon(polygon: &Polygon, mask: &mut MaskBuffer) {
    let points = polygon.points();
    let width = mask.width as i64;

    for y in 0..mask.height as i64 {
        let sample_y = y as f64 + 0.5;

        // Gather scanline crossings over every edge, including the implicit
        // closing edge.
        let mut crossings = Vec::new();
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            if (y0 <= sample_y && sample_y < y1) || (y1 <= sample_y && sample_y < y0) {
                let t = (sample_y - y0) / (y1 - y0);
                crossings.push(x0 + t * (x1 - x0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        // Fill between crossing pairs (even-odd rule).
        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil().max(0.0) as i64;
            let end = ((pair[1] - 0.5).ceil() as i64).min(width);
            for x in start..end {
                mask.data[(y * width + x) as usize] = PAINTABLE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_degenerate_input() {
        assert!(Polygon::new(vec![(0.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(Polygon::from_flat(&[0.0, 0.0, 1.0, 1.0, 2.0]).is_err());
        assert!(Polygon::from_flat(&[0.0, 0.0, 1.0, 1.0]).is_err());
        assert!(Polygon::from_flat(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0]).is_ok());
    }

    #[test]
    fn square_covers_exactly_its_region() {
        let square =
            Polygon::from_flat(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0]).unwrap();
        let mask = rasterize(&[square], 20, 20);

        let mut covered = 0usize;
        for y in 0..20usize {
            for x in 0..20usize {
                let inside = x < 10 && y < 10;
                let value = mask.data[y * 20 + x];
                if inside {
                    assert_eq!(value, PAINTABLE, "({x},{y}) should be covered");
                    covered += 1;
                } else {
                    assert_eq!(value, 0, "({x},{y}) should be untouched");
                }
            }
        }
        assert_eq!(covered, 100);
    }

    #[test]
    fn triangle_fills_only_its_interior() {
        let triangle = Polygon::new(vec![(0.0, 0.0), (12.0, 0.0), (0.0, 12.0)]).unwrap();
        let mask = rasterize(&[triangle], 12, 12);
        // Near the right angle: inside.
        assert_eq!(mask.data[1 * 12 + 1], PAINTABLE);
        // Opposite corner: outside the hypotenuse.
        assert_eq!(mask.data[11 * 12 + 11], 0);
    }

    #[test]
    fn multiple_polygons_union() {
        let a = Polygon::from_flat(&[0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0]).unwrap();
        let b = Polygon::from_flat(&[6.0, 6.0, 10.0, 6.0, 10.0, 10.0, 6.0, 10.0]).unwrap();
        let mask = rasterize(&[a, b], 10, 10);
        assert_eq!(mask.data[1 * 10 + 1], PAINTABLE);
        assert_eq!(mask.data[7 * 10 + 7], PAINTABLE);
        assert_eq!(mask.data[5 * 10 + 5], 0);
    }

    #[test]
    fn polygon_clips_at_image_bounds() {
        let oversized =
            Polygon::from_flat(&[-5.0, -5.0, 50.0, -5.0, 50.0, 50.0, -5.0, 50.0]).unwrap();
        let mask = rasterize(&[oversized], 8, 8);
        assert!(mask.data.iter().all(|&v| v == PAINTABLE));
    }
}
