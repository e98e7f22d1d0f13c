//! Oriented quadrilaterals.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// Four corner points of an oriented box, in source order.
///
/// No winding or ordering is imposed: the corners are kept exactly as the
/// source annotation lists them, and every conversion preserves that order.
#[derive(Clone, Copy, PartialEq)]
pub struct Quad<TSpace> {
    pub points: [Coord<TSpace>; 4],
}

impl<TSpace> Quad<TSpace> {
    #[inline]
    pub fn new(points: [Coord<TSpace>; 4]) -> Self {
        Self { points }
    }

    /// Builds a quad from the flat `x1 y1 x2 y2 x3 y3 x4 y4` layout.
    pub fn from_flat(values: [f64; 8]) -> Self {
        Self {
            points: [
                Coord::new(values[0], values[1]),
                Coord::new(values[2], values[3]),
                Coord::new(values[4], values[5]),
                Coord::new(values[6], values[7]),
            ],
        }
    }

    /// Returns the corners in the flat `x1 y1 … x4 y4` layout.
    pub fn to_flat(&self) -> [f64; 8] {
        let mut flat = [0.0; 8];
        for (i, point) in self.points.iter().enumerate() {
            flat[2 * i] = point.x;
            flat[2 * i + 1] = point.y;
        }
        flat
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Coord::is_finite)
    }
}

impl Quad<Pixel> {
    /// Normalizes every corner against the image size, clamping into `[0, 1]`.
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> Quad<Normalized> {
        Quad::new(
            self.points
                .map(|point| point.to_normalized(image_width, image_height)),
        )
    }
}

impl Quad<Normalized> {
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> Quad<Pixel> {
        Quad::new(self.points.map(|point| point.to_pixel(image_width, image_height)))
    }

    /// True when every component already lies in `[0.0, 1.0]`.
    pub fn is_within_unit(&self) -> bool {
        self.to_flat().iter().all(|v| (0.0..=1.0).contains(v))
    }
}

impl<TSpace> std::fmt::Debug for Quad<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.points.iter()).finish()
    }
}
