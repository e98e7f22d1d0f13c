//! dota2yolo: convert DOTA oriented-box datasets into YOLO OBB datasets.
//!
//! A DOTA split (`PNGImages/` + `Annotations/`) is turned into an
//! Ultralytics-style tree with `train/`, `val/` and optionally `test/`
//! splits, a `classes.txt` and a `data.yaml`.
//!
//! # Modules
//!
//! - [`ir`]: Typed records, the class table and the format readers/writers
//! - [`split`]: Train/val partitioning
//! - [`conversion`]: The conversion pipeline and its report
//! - [`config`]: Explicit run configuration
//! - [`error`]: Error types for dota2yolo operations

pub mod config;
pub mod conversion;
pub mod error;
pub mod ir;
pub mod split;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use config::{ConvertConfig, TestConfig, TrainValConfig, DEFAULT_IMAGE_EXTENSIONS};
use conversion::ConversionReport;
use split::{SplitOptions, DEFAULT_TRAIN_RATIO};

pub use error::ConvertError;

/// The dota2yolo CLI application.
#[derive(Parser)]
#[command(name = "dota2yolo")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a DOTA train/val split into YOLO OBB train/ and val/ splits.
    Trainval(TrainValArgs),
    /// Convert a DOTA test split into test/, reusing an earlier classes.txt.
    Test(TestArgs),
}

/// Source and output arguments shared by both subcommands.
#[derive(clap::Args)]
struct SourceArgs {
    /// DOTA split root containing the image and annotation directories.
    source: PathBuf,

    /// Output YOLO dataset root.
    output: PathBuf,

    /// Image directory, relative to SOURCE unless absolute.
    #[arg(long, env = "DOTA2YOLO_IMAGES_DIR", default_value = config::DEFAULT_IMAGES_DIR)]
    images_dir: PathBuf,

    /// Annotation directory, relative to SOURCE unless absolute.
    #[arg(long, env = "DOTA2YOLO_ANNOTATIONS_DIR", default_value = config::DEFAULT_ANNOTATIONS_DIR)]
    annotations_dir: PathBuf,

    /// Image extensions to pick up (comma separated, case-insensitive).
    #[arg(long = "image-ext", env = "DOTA2YOLO_IMAGE_EXT", value_delimiter = ',')]
    image_ext: Vec<String>,

    /// Remove the split directories this run writes before writing.
    #[arg(long)]
    clean: bool,

    /// Format of the final report.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

/// Arguments for the trainval subcommand.
#[derive(clap::Args)]
struct TrainValArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Fraction of images assigned to train (0.0 to 1.0).
    #[arg(long, env = "DOTA2YOLO_TRAIN_RATIO", default_value_t = DEFAULT_TRAIN_RATIO, value_parser = parse_ratio)]
    train_ratio: f64,

    /// Seed for a reproducible shuffle; unseeded runs differ each time.
    #[arg(long, env = "DOTA2YOLO_SEED")]
    seed: Option<u64>,
}

/// Arguments for the test subcommand.
#[derive(clap::Args)]
struct TestArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ReportFormat {
    Text,
    Json,
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

impl SourceArgs {
    fn to_config(&self) -> ConvertConfig {
        let image_extensions = if self.image_ext.is_empty() {
            DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect()
        } else {
            self.image_ext
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty())
                .collect()
        };

        ConvertConfig {
            images_dir: self.source.join(&self.images_dir),
            annotations_dir: self.source.join(&self.annotations_dir),
            output_root: self.output.clone(),
            image_extensions,
            clean: self.clean,
        }
    }
}

/// Run the dota2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Trainval(args)) => run_trainval(args),
        Some(Commands::Test(args)) => run_test(args),
        None => {
            println!("dota2yolo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert DOTA oriented-box datasets into YOLO OBB datasets.");
            println!();
            println!("Run 'dota2yolo --help' for usage information.");
            Ok(())
        }
    }
}

fn run_trainval(args: TrainValArgs) -> Result<(), ConvertError> {
    let config = TrainValConfig {
        convert: args.source.to_config(),
        split: SplitOptions {
            train_ratio: args.train_ratio,
            seed: args.seed,
        },
    };

    log::info!("source images: {}", config.convert.images_dir.display());
    log::info!("output dataset: {}", config.convert.output_root.display());

    let report = conversion::convert_trainval(&config)?;
    print_report(&report, args.source.report)
}

fn run_test(args: TestArgs) -> Result<(), ConvertError> {
    let config = TestConfig {
        convert: args.source.to_config(),
    };

    log::info!("source images: {}", config.convert.images_dir.display());
    log::info!("output dataset: {}", config.convert.output_root.display());

    let report = conversion::convert_test(&config)?;
    print_report(&report, args.source.report)
}

fn print_report(report: &ConversionReport, format: ReportFormat) -> Result<(), ConvertError> {
    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}
