//! Typed corner points.

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// A 2D point tagged with the coordinate space it lives in.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Coord<Pixel> {
    /// Divides by the image size and clamps each component into `[0.0, 1.0]`.
    ///
    /// A NaN component (zero-sized image) clamps to `0.0`.
    #[inline]
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> Coord<Normalized> {
        Coord::new(
            clamp_unit(self.x / image_width),
            clamp_unit(self.y / image_height),
        )
    }
}

impl Coord<Normalized> {
    #[inline]
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> Coord<Pixel> {
        Coord::new(self.x * image_width, self.y * image_height)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
