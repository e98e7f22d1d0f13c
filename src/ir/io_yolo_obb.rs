//! Ultralytics-style YOLO OBB dataset writer.
//!
//! Output layout:
//!
//! ```text
//! <root>/classes.txt
//! <root>/data.yaml
//! <root>/<split>/images/<file_name>
//! <root>/<split>/labels/<stem>.txt
//! ```
//!
//! Each label line is `class_id x1 y1 x2 y2 x3 y3 x4 y4` with normalized
//! corners.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use super::model::ObbLabel;
use super::ClassTable;
use crate::conversion::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::ConvertError;

pub const LABEL_EXTENSION: &str = "txt";
pub const CLASSES_FILE: &str = "classes.txt";
pub const DATA_YAML_FILE: &str = "data.yaml";

/// Split keys that may appear in `data.yaml`, in the order they are written.
const SPLIT_KEYS: [&str; 3] = ["train", "val", "test"];
/// Splits whose default path is filled in when `data.yaml` lacks them.
const REQUIRED_SPLITS: [&str; 2] = ["train", "val"];

/// `images/` and `labels/` directories of one output split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitDirs {
    pub name: String,
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl SplitDirs {
    pub fn new(output_root: &Path, name: &str) -> Self {
        let root = output_root.join(name);
        Self {
            name: name.to_string(),
            images_dir: root.join("images"),
            labels_dir: root.join("labels"),
            root,
        }
    }

    /// Create both directories. With `clean`, remove the split first.
    pub fn prepare(&self, clean: bool) -> Result<(), ConvertError> {
        if clean && self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.images_dir)?;
        fs::create_dir_all(&self.labels_dir)?;
        Ok(())
    }

    /// Number of files already present in `images/`; zero when it does not exist.
    pub fn existing_image_count(&self) -> usize {
        if !self.images_dir.is_dir() {
            return 0;
        }
        WalkDir::new(&self.images_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| !entry.file_type().is_dir())
            .count()
    }

    pub fn label_path(&self, stem: &str) -> PathBuf {
        self.labels_dir.join(format!("{stem}.{LABEL_EXTENSION}"))
    }
}

/// Write one label file, replacing any existing file. Zero labels yields an
/// empty file so every image keeps a paired label.
pub fn write_label_file(path: &Path, labels: &[ObbLabel]) -> Result<(), ConvertError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for label in labels {
        writeln!(writer, "{}", label)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `classes.txt`: one name per line in ascending id order.
pub fn write_classes_txt(output_root: &Path, table: &ClassTable) -> Result<PathBuf, ConvertError> {
    let mut text = String::new();
    for name in table.names() {
        text.push_str(name);
        text.push('\n');
    }

    let path = output_root.join(CLASSES_FILE);
    fs::write(&path, text)?;
    info!("wrote {}", path.display());
    Ok(path)
}

/// Read a `classes.txt` written by an earlier run, keeping its order.
///
/// Blank lines are ignored. A missing file or a file without names is fatal:
/// class ids could not be reproduced otherwise.
pub fn read_classes_txt(path: &Path) -> Result<ClassTable, ConvertError> {
    if !path.is_file() {
        return Err(ConvertError::ClassListMissing {
            path: path.to_path_buf(),
        });
    }

    let data = fs::read_to_string(path)?;
    let table = ClassTable::from_ordered(
        data.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty()),
    );

    if table.is_empty() {
        return Err(ConvertError::ClassListEmpty {
            path: path.to_path_buf(),
        });
    }

    Ok(table)
}

/// Create or update `data.yaml`.
///
/// Splits in `produced` always point at this run's image directories.
/// Other split entries already present are kept; missing `train`/`val`
/// entries get the default `<root>/<split>/images` path. `nc` and `names`
/// always reflect `table`. Unrelated keys in an existing file are kept.
pub fn update_data_yaml(
    output_root: &Path,
    table: &ClassTable,
    produced: &[&str],
    report: &mut ConversionReport,
) -> Result<PathBuf, ConvertError> {
    let path = output_root.join(DATA_YAML_FILE);
    let mut doc = load_existing_data_yaml(&path, report)?;

    for split in SPLIT_KEYS {
        let must_write = produced.contains(&split)
            || (REQUIRED_SPLITS.contains(&split) && !has_value(&doc, split));
        if must_write {
            let images_dir = SplitDirs::new(output_root, split).images_dir;
            let resolved = absolute_path(&images_dir)?;
            doc.insert(
                Value::from(split),
                Value::from(resolved.to_string_lossy().into_owned()),
            );
        }
    }

    let nc = serde_yaml::to_value(table.len()).map_err(|source| ConvertError::DataYamlWrite {
        path: path.clone(),
        source,
    })?;
    let names =
        serde_yaml::to_value(table.names()).map_err(|source| ConvertError::DataYamlWrite {
            path: path.clone(),
            source,
        })?;
    doc.insert(Value::from("nc"), nc);
    doc.insert(Value::from("names"), names);

    let text =
        serde_yaml::to_string(&Value::Mapping(doc)).map_err(|source| ConvertError::DataYamlWrite {
            path: path.clone(),
            source,
        })?;
    fs::write(&path, text)?;
    info!("wrote {}", path.display());

    Ok(path)
}

fn load_existing_data_yaml(
    path: &Path,
    report: &mut ConversionReport,
) -> Result<Mapping, ConvertError> {
    if !path.is_file() {
        return Ok(Mapping::new());
    }

    let data = fs::read_to_string(path)?;
    match serde_yaml::from_str::<Value>(&data) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::DataYamlReplaced,
                format!(
                    "{} is not a key/value document; writing a new one",
                    path.display()
                ),
            ));
            Ok(Mapping::new())
        }
        Err(err) => {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::DataYamlReplaced,
                format!(
                    "could not parse {}: {}; writing a new one",
                    path.display(),
                    err
                ),
            ));
            Ok(Mapping::new())
        }
    }
}

fn has_value(doc: &Mapping, key: &str) -> bool {
    match doc.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Sequence(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Resolve `path` to an absolute path, following symlinks when it exists.
pub fn absolute_path(path: &Path) -> Result<PathBuf, ConvertError> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(_) => Ok(std::path::absolute(path)?),
    }
}
