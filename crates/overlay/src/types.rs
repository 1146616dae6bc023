use geo_types::{Coord, LineString, Polygon};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// A traced external boundary of one foreground region, in pixel coordinates.
/// The polygon is implicitly closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub points: Vec<[i32; 2]>,
}

impl Outline {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert to a geo-types polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|&[x, y]| Coord { x: f64::from(x), y: f64::from(y) })
            .collect();
        Polygon::new(LineString::new(coords), vec![])
    }

    /// Axis-aligned bounds as `(top_left, bottom_right)`, both inclusive
    pub fn bounding_box(&self) -> Option<([i32; 2], [i32; 2])> {
        use geo::BoundingRect;

        let rect = self.to_geo_polygon().bounding_rect()?;
        Some((
            [rect.min().x as i32, rect.min().y as i32],
            [rect.max().x as i32, rect.max().y as i32],
        ))
    }

    /// Area enclosed by the polygon vertices
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Length of the closed boundary
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_geo_polygon().exterior().euclidean_length()
    }

    /// Baseline-left point of a label placed `offset` pixels above the bounds
    pub fn label_anchor(&self, offset: i32) -> Option<[i32; 2]> {
        self.bounding_box()
            .map(|([x, y], _)| [x, y.saturating_sub(offset)])
    }
}

/// What was drawn for a single mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    /// Position of the mask in the batch (render order)
    pub index: usize,
    pub color: [u8; 3],
    pub score: Option<f32>,
    /// Pixels strictly above the threshold
    pub foreground_pixels: usize,
    pub outlines: Vec<Outline>,
    /// Where the score label was anchored, if one was drawn
    pub label_anchor: Option<[i32; 2]>,
}

/// The composited overlay together with a per-mask summary
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    pub image: RgbImage,
    pub regions: Vec<RegionReport>,
}

impl RenderedOverlay {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Serialize the region summaries (the image itself is not included)
    pub fn report_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(&self.regions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::new(vec![[2, 3], [12, 3], [12, 13], [2, 13]])
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(square().bounding_box(), Some(([2, 3], [12, 13])));
        assert_eq!(Outline::new(Vec::new()).bounding_box(), None);
    }

    #[test]
    fn test_area_and_perimeter() {
        let outline = square();
        assert!((outline.area() - 100.0).abs() < 1e-9);
        assert!((outline.perimeter() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_anchor_sits_above_bounds() {
        assert_eq!(square().label_anchor(10), Some([2, -7]));
        assert_eq!(Outline::new(vec![[5, 5]]).label_anchor(0), Some([5, 5]));
    }
}
