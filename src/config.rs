//! Run configuration.
//!
//! Every path and knob a conversion needs is carried explicitly in these
//! structures; the CLI builds them from arguments and environment variables.

use std::path::{Path, PathBuf};

use crate::split::SplitOptions;

/// Default image directory name inside a DOTA split.
pub const DEFAULT_IMAGES_DIR: &str = "PNGImages";
/// Default annotation directory name inside a DOTA split.
pub const DEFAULT_ANNOTATIONS_DIR: &str = "Annotations";
/// Image extensions picked up when none are configured.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Source and destination shared by every run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertConfig {
    pub images_dir: PathBuf,
    pub annotations_dir: PathBuf,
    pub output_root: PathBuf,
    /// Matched case-insensitively, without the leading dot.
    pub image_extensions: Vec<String>,
    /// Remove the split directories this run writes before writing.
    pub clean: bool,
}

impl ConvertConfig {
    /// Config for the standard DOTA layout:
    /// `<source_root>/PNGImages` and `<source_root>/Annotations`.
    pub fn from_dota_root(source_root: &Path, output_root: &Path) -> Self {
        Self {
            images_dir: source_root.join(DEFAULT_IMAGES_DIR),
            annotations_dir: source_root.join(DEFAULT_ANNOTATIONS_DIR),
            output_root: output_root.to_path_buf(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            clean: false,
        }
    }
}

/// Configuration for a train/val conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainValConfig {
    pub convert: ConvertConfig,
    pub split: SplitOptions,
}

/// Configuration for converting an additional test split.
#[derive(Clone, Debug, PartialEq)]
pub struct TestConfig {
    pub convert: ConvertConfig,
}
