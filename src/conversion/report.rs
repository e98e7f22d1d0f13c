//! Conversion report types for per-record diagnostics and run counts.
//!
//! Recoverable problems (malformed lines, unknown classes, unreadable images)
//! never abort a run. They are collected here, logged as they happen, and
//! summarized once the run finishes.

use log::{info, warn};
use serde::Serialize;
use std::fmt;

/// A report generated during a conversion run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Which run produced the report (`trainval` or `test`).
    pub run: String,
    /// Classes in the table used for this run.
    pub classes: Vec<String>,
    /// Record counts.
    pub counts: ConversionCounts,
    /// Per-split image counts, in the order the splits were written.
    pub splits: Vec<SplitCount>,
    /// Issues discovered during the run.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report and log it.
    pub fn add(&mut self, issue: ConversionIssue) {
        match issue.severity {
            ConversionSeverity::Warning => warn!("{}", issue.message),
            ConversionSeverity::Info => info!("{}", issue.message),
        }
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Number of issues carrying `code`.
    pub fn count_code(&self, code: ConversionIssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Images written into the named split, if that split was produced.
    pub fn split_images(&self, name: &str) -> Option<usize> {
        self.splits
            .iter()
            .find(|split| split.name == name)
            .map(|split| split.images)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} run: {} image(s) found, {} class(es)",
            self.run,
            self.counts.images_found,
            self.classes.len()
        )?;

        for split in &self.splits {
            writeln!(f, "  {}: {} image(s)", split.name, split.images)?;
        }

        writeln!(
            f,
            "  {} label file(s), {} object(s) converted, {} line(s) skipped",
            self.counts.labels_written, self.counts.objects_converted, self.counts.lines_skipped
        )?;

        if self.counts.images_excluded > 0 {
            writeln!(
                f,
                "  {} image(s) excluded (see warnings)",
                self.counts.images_excluded
            )?;
        }

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

/// Record counts for a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// Source images discovered.
    pub images_found: usize,
    /// Images dropped: duplicate stem, failed copy or unreadable dimensions.
    pub images_excluded: usize,
    pub labels_written: usize,
    pub objects_converted: usize,
    /// Annotation lines skipped as malformed or with an unknown class.
    pub lines_skipped: usize,
    pub header_lines_skipped: usize,
}

/// Images written into one output split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitCount {
    pub name: String,
    pub images: usize,
}

/// A single issue discovered during conversion.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub message: String,
}

impl ConversionIssue {
    /// A record was skipped or degraded.
    pub fn warning(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// A policy note; nothing was lost.
    pub fn info(code: ConversionIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    Warning,
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON output and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// Annotation line with too few tokens or an unparseable coordinate.
    MalformedLine,
    /// Class name absent from the class table.
    UnknownClass,
    /// Image has no annotation file; an empty label file is written.
    MissingAnnotation,
    /// Annotation file exists but could not be read.
    UnreadableAnnotation,
    /// Image header could not be probed; the image is excluded.
    ImageDimensionRead,
    /// Image could not be copied into the output split; the image is excluded.
    ImageCopy,
    /// Another image with the same file stem was found first; this one is excluded.
    DuplicateStem,
    /// Directory entry could not be inspected (e.g. a dangling symlink).
    UnreadableEntry,
    /// Split directory already held images and `--clean` was not given.
    ExistingSplitContents,
    /// Existing data.yaml could not be parsed and was replaced.
    DataYamlReplaced,
    /// Class ids come from sorted names or from an existing classes.txt.
    ClassIdAssignment,
    /// How the train/val partition was drawn.
    SplitShuffle,
}
