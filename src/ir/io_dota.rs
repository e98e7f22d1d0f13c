//! DOTA oriented-box annotation reader.
//!
//! A DOTA annotation file holds one object per line:
//!
//! ```text
//! x1 y1 x2 y2 x3 y3 x4 y4 class_name [difficulty]
//! ```
//!
//! Corners are in source-image pixel space. Some releases prefix files with
//! `imagesource:` and `gsd:` header lines, which are skipped.
//!
//! Reading happens in two phases: [`discover_classes`] scans every file once
//! to build an immutable [`ClassTable`], then [`convert_annotation_file`]
//! turns each file into normalized YOLO OBB labels using that table.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use super::model::{AnnotationRecord, ImageDimensions, ObbLabel};
use super::{ClassTable, Pixel, Quad};
use crate::conversion::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::ConvertError;

pub const ANNOTATION_EXTENSION: &str = "txt";

const COORD_NAMES: [&str; 8] = ["x1", "y1", "x2", "y2", "x3", "y3", "x4", "y4"];
const HEADER_MARKERS: [&str; 2] = ["imagesource", "gsd"];

/// Scan every annotation file directly inside `dir` and build the class table.
///
/// Only lines that carry 8 parseable coordinates and a class name contribute.
/// Unreadable files are reported and skipped. Fails with
/// [`ConvertError::NoClassesFound`] when no line contributes a class.
pub fn discover_classes(
    dir: &Path,
    report: &mut ConversionReport,
) -> Result<ClassTable, ConvertError> {
    let files = collect_annotation_files(dir, report)?;
    let mut names = BTreeSet::new();

    for path in &files {
        let Some(content) = read_annotation_text(path, report) else {
            continue;
        };

        for (line_idx, line) in content.lines().enumerate() {
            if let Ok(Some(record)) = parse_annotation_line(line, path, line_idx + 1) {
                names.insert(record.class_name);
            }
        }
    }

    if names.is_empty() {
        return Err(ConvertError::NoClassesFound {
            path: dir.to_path_buf(),
        });
    }

    let table = ClassTable::from_names(names);
    info!(
        "discovered {} class(es) across {} annotation file(s)",
        table.len(),
        files.len()
    );
    for (id, name) in table.iter() {
        debug!("class {} -> {}", name, id);
    }

    Ok(table)
}

/// Convert one annotation file into YOLO OBB labels.
///
/// Every problem is local: a missing file yields no labels, and malformed
/// lines or unknown classes are reported and skipped while the rest of the
/// file is still converted.
pub fn convert_annotation_file(
    path: &Path,
    dimensions: ImageDimensions,
    class_table: &ClassTable,
    report: &mut ConversionReport,
) -> Vec<ObbLabel> {
    if !path.is_file() {
        report.add(ConversionIssue::warning(
            ConversionIssueCode::MissingAnnotation,
            format!(
                "annotation file not found: {}; writing an empty label file",
                path.display()
            ),
        ));
        return Vec::new();
    }

    let Some(content) = read_annotation_text(path, report) else {
        return Vec::new();
    };

    let width = dimensions.width as f64;
    let height = dimensions.height as f64;
    let mut labels = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;

        if is_header_line(line) {
            report.counts.header_lines_skipped += 1;
            continue;
        }

        let record = match parse_annotation_line(line, path, line_num) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(err) => {
                report.counts.lines_skipped += 1;
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::MalformedLine,
                    err.to_string(),
                ));
                continue;
            }
        };

        let Some(class_id) = class_table.id_of(&record.class_name) else {
            report.counts.lines_skipped += 1;
            report.add(ConversionIssue::warning(
                ConversionIssueCode::UnknownClass,
                format!(
                    "unknown class '{}' at {} line {}; skipping object",
                    record.class_name,
                    path.display(),
                    line_num
                ),
            ));
            continue;
        };

        labels.push(ObbLabel {
            class_id,
            quad: record.quad.to_normalized(width, height),
        });
    }

    report.counts.objects_converted += labels.len();
    labels
}

/// List `*.txt` files directly inside `dir`, sorted by file name.
pub fn collect_annotation_files(
    dir: &Path,
    report: &mut ConversionReport,
) -> Result<Vec<PathBuf>, ConvertError> {
    collect_files_with_extensions(dir, &[ANNOTATION_EXTENSION], report)
}

/// List regular files directly inside `dir` whose extension matches one of
/// `extensions` (case-insensitive), sorted by file name.
///
/// Only a failure to read `dir` itself is fatal. Entries that cannot be
/// inspected, such as dangling symlinks, are reported and skipped.
pub fn collect_files_with_extensions(
    dir: &Path,
    extensions: &[impl AsRef<str>],
    report: &mut ConversionReport,
) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ConvertError::DirectoryWalk {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                });
            }
            Err(err) => {
                let entry_path = err.path().unwrap_or(dir).display().to_string();
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::UnreadableEntry,
                    format!("skipping {}: {}", entry_path, err),
                ));
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, allowed: &[impl AsRef<str>]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext.as_ref()))
}

fn read_annotation_text(path: &Path, report: &mut ConversionReport) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::UnreadableAnnotation,
                format!("could not read {}: {}", path.display(), err),
            ));
            None
        }
    }
}

/// True for DOTA metadata lines such as `imagesource:GoogleEarth` or `gsd:0.146`.
pub fn is_header_line(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    HEADER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Parse one annotation line.
///
/// Returns `Ok(None)` for blank and header lines. Tokens past the 10th are
/// ignored.
pub fn parse_annotation_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<AnnotationRecord>, ConvertError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_header_line(trimmed) {
        return Ok(None);
    }

    // Bounded so pathological lines do not allocate without limit.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(10).collect();

    if tokens.len() < 9 {
        return Err(ConvertError::AnnotationLineParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "expected at least 9 tokens (8 coordinates + class name), found {}",
                tokens.len()
            ),
        });
    }

    let mut coords = [0.0; 8];
    for (idx, raw) in tokens[..8].iter().enumerate() {
        coords[idx] = parse_f64_token(raw, COORD_NAMES[idx], file_path, line_num)?;
    }

    let quad = Quad::<Pixel>::from_flat(coords);
    if !quad.is_finite() {
        return Err(ConvertError::AnnotationLineParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "coordinates must be finite numbers".to_string(),
        });
    }

    Ok(Some(AnnotationRecord {
        quad,
        class_name: tokens[8].to_string(),
        difficulty: tokens.get(9).map(|raw| raw.to_string()),
    }))
}

/// Fuzz-only entrypoint for single-line DOTA parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_annotation_line(input: &str) -> Result<(), ConvertError> {
    let _ = parse_annotation_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, ConvertError> {
    raw.parse::<f64>()
        .map_err(|_| ConvertError::AnnotationLineParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
        })
}
