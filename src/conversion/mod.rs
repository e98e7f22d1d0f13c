//! The conversion pipeline.
//!
//! A train/val run is a single linear pass:
//!
//! 1. check that the source directories exist,
//! 2. build the class table from every annotation file,
//! 3. discover and split the images,
//! 4. per image: copy, probe dimensions, convert the annotation, write the label,
//! 5. write `classes.txt` and `data.yaml`.
//!
//! A test run replaces step 2 with reading the `classes.txt` of an earlier
//! train/val run and writes every image into a single `test` split.
//!
//! All fatal checks happen before anything is written under the output root.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
    SplitCount,
};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::config::{ConvertConfig, TestConfig, TrainValConfig};
use crate::error::ConvertError;
use crate::ir::io_dota::{self, ANNOTATION_EXTENSION};
use crate::ir::io_yolo_obb::{self, SplitDirs, CLASSES_FILE};
use crate::ir::{ClassTable, ImageDimensions, ImageRecord};
use crate::split::{split_images, validate_split_options};

/// Convert a DOTA train/val source into `train/` and `val/` YOLO OBB splits.
pub fn convert_trainval(config: &TrainValConfig) -> Result<ConversionReport, ConvertError> {
    let convert = &config.convert;
    let mut report = ConversionReport::new("trainval");

    check_source_dirs(convert)?;
    validate_split_options(&config.split)?;

    let table = io_dota::discover_classes(&convert.annotations_dir, &mut report)?;
    report.classes = table.names().to_vec();
    report.add(ConversionIssue::info(
        ConversionIssueCode::ClassIdAssignment,
        format!(
            "class ids assigned by sorted class name ({} class(es))",
            table.len()
        ),
    ));

    let images = discover_images(convert, &mut report)?;

    let assignment = split_images(&images, &config.split)?;
    report.add(ConversionIssue::info(
        ConversionIssueCode::SplitShuffle,
        match config.split.seed {
            Some(seed) => format!(
                "train ratio {} with seed {}: {} train / {} val",
                config.split.train_ratio,
                seed,
                assignment.train.len(),
                assignment.val.len()
            ),
            None => format!(
                "train ratio {} with an unseeded shuffle: {} train / {} val",
                config.split.train_ratio,
                assignment.train.len(),
                assignment.val.len()
            ),
        },
    ));

    fs::create_dir_all(&convert.output_root)?;

    let mut produced = Vec::new();
    for (name, records) in assignment.named() {
        let dirs = SplitDirs::new(&convert.output_root, name);
        prepare_split(&dirs, convert.clean, &mut report)?;
        let written = materialize_split(records, &dirs, &convert.annotations_dir, &table, &mut report)?;
        report.splits.push(SplitCount {
            name: name.to_string(),
            images: written,
        });
        produced.push(name);
    }

    write_summary(&table, &convert.output_root, &produced, &mut report)?;
    Ok(report)
}

/// Convert a DOTA test source into a `test/` split of an existing output root.
///
/// Class ids come from the `classes.txt` written by [`convert_trainval`].
/// Classes not listed there are skipped per object.
pub fn convert_test(config: &TestConfig) -> Result<ConversionReport, ConvertError> {
    let convert = &config.convert;
    let mut report = ConversionReport::new("test");

    check_source_dirs(convert)?;

    let table = io_yolo_obb::read_classes_txt(&convert.output_root.join(CLASSES_FILE))?;
    report.classes = table.names().to_vec();
    report.add(ConversionIssue::info(
        ConversionIssueCode::ClassIdAssignment,
        format!(
            "class ids reused from {} ({} class(es)); classes not listed there are skipped",
            CLASSES_FILE,
            table.len()
        ),
    ));

    let images = discover_images(convert, &mut report)?;
    if images.is_empty() {
        info!(
            "no images found in {}; only data.yaml will be updated",
            convert.images_dir.display()
        );
    }

    let dirs = SplitDirs::new(&convert.output_root, "test");
    prepare_split(&dirs, convert.clean, &mut report)?;
    let written = materialize_split(&images, &dirs, &convert.annotations_dir, &table, &mut report)?;
    report.splits.push(SplitCount {
        name: "test".to_string(),
        images: written,
    });

    write_summary(&table, &convert.output_root, &["test"], &mut report)?;
    Ok(report)
}

fn check_source_dirs(config: &ConvertConfig) -> Result<(), ConvertError> {
    if !config.images_dir.is_dir() {
        return Err(ConvertError::SourceDirMissing {
            path: config.images_dir.clone(),
            role: "Image",
        });
    }
    if !config.annotations_dir.is_dir() {
        return Err(ConvertError::SourceDirMissing {
            path: config.annotations_dir.clone(),
            role: "Annotation",
        });
    }
    Ok(())
}

/// List source images, sorted by path.
///
/// Labels are keyed by file stem, so only the first image of each stem is
/// kept (`P0001.jpg` wins over `P0001.png`). Later ones are reported and
/// counted as excluded.
pub fn discover_images(
    config: &ConvertConfig,
    report: &mut ConversionReport,
) -> Result<Vec<ImageRecord>, ConvertError> {
    let files =
        io_dota::collect_files_with_extensions(&config.images_dir, &config.image_extensions, report)?;
    info!(
        "found {} image(s) in {}",
        files.len(),
        config.images_dir.display()
    );
    report.counts.images_found = files.len();

    let mut seen: HashMap<String, ImageRecord> = HashMap::new();
    let mut images = Vec::with_capacity(files.len());
    for record in files.into_iter().map(ImageRecord::new) {
        let stem = record.stem();
        if let Some(kept) = seen.get(&stem) {
            report.counts.images_excluded += 1;
            report.add(ConversionIssue::warning(
                ConversionIssueCode::DuplicateStem,
                format!(
                    "{} shares the stem '{}' with {}; skipping this image",
                    record.path().display(),
                    stem,
                    kept.path().display()
                ),
            ));
            continue;
        }
        seen.insert(stem, record.clone());
        images.push(record);
    }

    Ok(images)
}

fn prepare_split(
    dirs: &SplitDirs,
    clean: bool,
    report: &mut ConversionReport,
) -> Result<(), ConvertError> {
    if !clean {
        let existing = dirs.existing_image_count();
        if existing > 0 {
            report.add(ConversionIssue::warning(
                ConversionIssueCode::ExistingSplitContents,
                format!(
                    "{} already holds {} file(s); files from earlier runs are kept (use --clean to remove them)",
                    dirs.images_dir.display(),
                    existing
                ),
            ));
        }
    }
    dirs.prepare(clean)
}

/// Write every image of one split and its label file.
///
/// Returns the number of images written. Images that cannot be copied or
/// whose dimensions cannot be read are removed again and excluded.
pub fn materialize_split(
    images: &[ImageRecord],
    dirs: &SplitDirs,
    annotations_dir: &Path,
    table: &ClassTable,
    report: &mut ConversionReport,
) -> Result<usize, ConvertError> {
    let progress = progress_bar(images.len(), &dirs.name);
    let mut written = 0;

    for image in images {
        progress.inc(1);

        let stem = image.stem();
        let dest_image = dirs.images_dir.join(image.file_name());
        let dest_label = dirs.label_path(&stem);

        if let Err(err) = fs::copy(image.path(), &dest_image) {
            remove_if_exists(&dest_image)?;
            remove_if_exists(&dest_label)?;
            report.counts.images_excluded += 1;
            report.add(ConversionIssue::warning(
                ConversionIssueCode::ImageCopy,
                format!(
                    "could not copy {} to {}: {}; skipping this image",
                    image.path().display(),
                    dest_image.display(),
                    err
                ),
            ));
            continue;
        }

        let dimensions = match read_image_dimensions(image.path()) {
            Ok(dimensions) => dimensions,
            Err(err) => {
                remove_if_exists(&dest_image)?;
                remove_if_exists(&dest_label)?;
                report.counts.images_excluded += 1;
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::ImageDimensionRead,
                    format!("{}; skipping this image", err),
                ));
                continue;
            }
        };

        let annotation_path = annotations_dir.join(format!("{stem}.{ANNOTATION_EXTENSION}"));
        let labels = io_dota::convert_annotation_file(&annotation_path, dimensions, table, report);

        io_yolo_obb::write_label_file(&dest_label, &labels)?;
        report.counts.labels_written += 1;
        written += 1;
        debug!("{} -> {} object(s)", dest_label.display(), labels.len());
    }

    progress.finish_and_clear();
    info!("{} split: {} image(s) written", dirs.name, written);
    Ok(written)
}

/// Write `classes.txt` and create or update `data.yaml`.
pub fn write_summary(
    table: &ClassTable,
    output_root: &Path,
    produced: &[&str],
    report: &mut ConversionReport,
) -> Result<(), ConvertError> {
    io_yolo_obb::write_classes_txt(output_root, table)?;
    io_yolo_obb::update_data_yaml(output_root, table, produced, report)?;
    Ok(())
}

/// Probe the image header for its pixel size.
pub fn read_image_dimensions(path: &Path) -> Result<ImageDimensions, ConvertError> {
    let size = imagesize::size(path).map_err(|source| ConvertError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let dimensions = ImageDimensions {
        width: size.width,
        height: size.height,
    };
    if !dimensions.is_usable() {
        return Err(ConvertError::ImageDimensionRead {
            path: path.to_path_buf(),
            source: imagesize::ImageError::CorruptedImage,
        });
    }

    Ok(dimensions)
}

fn remove_if_exists(path: &Path) -> Result<(), ConvertError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ConvertError::Io(err)),
    }
}

fn progress_bar(len: usize, split_name: &str) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    let template = format!(
        "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
        split_name
    );
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        progress.set_style(style.progress_chars("#>-"));
    }
    progress
}
