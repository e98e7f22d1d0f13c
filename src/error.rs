use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dota2yolo operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{role} directory not found: {path}")]
    SourceDirMissing { path: PathBuf, role: &'static str },

    #[error("No class names found in annotations under {path}; check the annotation files")]
    NoClassesFound { path: PathBuf },

    #[error(
        "Class list not found at {path}; run the train/val conversion first so class ids stay stable"
    )]
    ClassListMissing { path: PathBuf },

    #[error("Class list at {path} contains no class names")]
    ClassListEmpty { path: PathBuf },

    #[error("Invalid train ratio {ratio}; expected a value in [0.0, 1.0]")]
    InvalidSplitRatio { ratio: f64 },

    #[error("Failed while traversing {path}: {message}")]
    DirectoryWalk { path: PathBuf, message: String },

    #[error("Invalid annotation line {line} in {path}: {message}")]
    AnnotationLineParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to write data.yaml to {path}: {source}")]
    DataYamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize conversion report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}
