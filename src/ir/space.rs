//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters so pixel-space DOTA corners and
//! normalized YOLO OBB corners cannot be mixed up at compile time.

use std::fmt;

/// Marker type for source pixel coordinates.
///
/// DOTA annotations store corners in pixel units of the source image, with
/// (0, 0) at the top-left corner. Values may lie slightly outside the image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates in `[0.0, 1.0]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
