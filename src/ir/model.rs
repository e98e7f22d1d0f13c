//! Record types flowing through a conversion.

use std::fmt;
use std::path::{Path, PathBuf};

use super::ids::ClassId;
use super::quad::Quad;
use super::space::{Normalized, Pixel};

/// One object parsed from a DOTA annotation line.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationRecord {
    /// Corners in source pixel space, in source order.
    pub quad: Quad<Pixel>,
    /// The 9th token of the line, used verbatim as the class key.
    pub class_name: String,
    /// Optional 10th token. Parsed but never written out.
    pub difficulty: Option<String>,
}

/// A source image discovered on disk.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageRecord {
    pub path: PathBuf,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name without extension; pairs the image with its annotation and label.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Pixel size probed from an image header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
}

impl ImageDimensions {
    /// False when either side is zero; such an image cannot anchor normalized labels.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One YOLO OBB label line: class id plus 4 normalized corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObbLabel {
    pub class_id: ClassId,
    pub quad: Quad<Normalized>,
}

impl fmt::Display for ObbLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_id)?;
        for value in self.quad.to_flat() {
            write!(f, " {}", FloatText(value))?;
        }
        Ok(())
    }
}

/// Shortest round-trip decimal text that always keeps a fractional part
/// (`1.0`, `0.1`, `0.123456789`), never exponent notation.
struct FloatText(f64);

impl fmt::Display for FloatText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        if text.contains('.') || !self.0.is_finite() {
            f.write_str(&text)
        } else {
            write!(f, "{}.0", text)
        }
    }
}
