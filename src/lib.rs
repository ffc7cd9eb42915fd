//! Boxlabel: the core of a bounding-box image annotation tool.
//!
//! Boxlabel keeps a collection of images, the rectangular annotations drawn
//! on them and the label set those annotations use, and moves that data in
//! and out of CSV and COCO JSON. Display-side concerns (fitting an image to a
//! viewport, turning a mouse drag into an image-space box) live here too, so
//! a front end only has to draw.
//!
//! # Modules
//!
//! - [`model`]: boxes, annotations, images and their ids
//! - [`labels`]: the label registry
//! - [`store`]: annotation CRUD and validation
//! - [`collection`]: ordered images with a navigation cursor, bulk loading
//! - [`loader`]: reading image dimensions from disk
//! - [`transform`]: display <-> image coordinate mapping
//! - [`interaction`]: drawing and selecting with a pointer
//! - [`io`]: CSV and COCO formats
//! - [`stats`]: export summaries
//! - [`session`]: one project tying the above together
//! - [`error`]: error types

pub mod collection;
pub mod error;
pub mod interaction;
pub mod io;
pub mod labels;
pub mod loader;
pub mod model;
pub mod session;
pub mod stats;
pub mod store;
pub mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::BoxlabelError;

use crate::io::{ImportOptions, ImportReport};
use crate::labels::LabelConflict;
use crate::loader::ImagesizeLoader;
use crate::session::Session;
use crate::stats::ExportStats;

/// The boxlabel CLI application.
#[derive(Parser)]
#[command(name = "boxlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a COCO JSON dataset, report what was found, optionally re-export.
    Import(ImportArgs),
    /// Load images from subdirectories of a base directory and summarize them.
    Scan(ScanArgs),
}

#[derive(clap::Args)]
struct ImportArgs {
    /// COCO JSON file to import.
    input: PathBuf,

    /// Directory image file names are resolved against (default: the
    /// directory containing the JSON file).
    #[arg(long, env = "BOXLABEL_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Also write the imported annotations as CSV.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Also write the imported annotations as COCO JSON.
    #[arg(long, value_name = "FILE")]
    coco: Option<PathBuf>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Base directory.
    base: PathBuf,

    /// Subdirectories of BASE to load images from.
    #[arg(required = true)]
    subdirs: Vec<PathBuf>,

    /// Label set file (`label_id,label_name` CSV).
    #[arg(long, value_name = "FILE")]
    labels: Option<PathBuf>,

    /// Write the loaded images as COCO JSON.
    #[arg(long, value_name = "FILE")]
    coco: Option<PathBuf>,

    /// Write the loaded images as CSV.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Report format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Result<Self, BoxlabelError> {
        match value {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(BoxlabelError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            ))),
        }
    }
}

/// Run the boxlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxlabelError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Import(args)) => run_import(args),
        Some(Commands::Scan(args)) => run_scan(args),
        None => {
            println!("boxlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box annotation core with CSV and COCO interchange.");
            println!();
            println!("Run 'boxlabel --help' for usage information.");
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ConflictJson {
    label_id: i64,
    label_name: String,
    reason: String,
}

impl From<&LabelConflict> for ConflictJson {
    fn from(conflict: &LabelConflict) -> Self {
        Self {
            label_id: conflict.label_id.as_i64(),
            label_name: conflict.label_name.clone(),
            reason: conflict.reason.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ImportSummary<'a> {
    report: &'a ImportReport,
    label_conflicts: Vec<ConflictJson>,
    stats: &'a ExportStats,
}

fn run_import(args: ImportArgs) -> Result<(), BoxlabelError> {
    let output = OutputFormat::parse(&args.output)?;

    let options = ImportOptions {
        base_dir: args.base_dir,
    };
    let import = io::read_coco_json(&args.input, &options)?;
    let report = import.report.clone();

    let mut session = Session::without_validation();
    let conflicts = session.merge_import(import);
    let stats = session.stats();

    match output {
        OutputFormat::Json => {
            let summary = ImportSummary {
                report: &report,
                label_conflicts: conflicts.iter().map(ConflictJson::from).collect(),
                stats: &stats,
            };
            print_json(&summary)?;
        }
        OutputFormat::Text => {
            println!("Imported {}", args.input.display());
            print!("{}", report);
            if !conflicts.is_empty() {
                println!();
                println!("Label conflicts ({}):", conflicts.len());
                for conflict in &conflicts {
                    println!(
                        "  - {} '{}': {}",
                        conflict.label_id, conflict.label_name, conflict.reason
                    );
                }
            }
            println!();
            print!("{}", stats);
        }
    }

    export_requested(&session, args.csv, args.coco, output)
}

#[derive(Serialize)]
struct ScanSummary<'a> {
    base: &'a std::path::Path,
    loaded: usize,
    skipped: Vec<SkippedJson>,
    labels: Vec<(i64, &'a str)>,
    stats: &'a ExportStats,
}

#[derive(Serialize)]
struct SkippedJson {
    path: String,
    reason: String,
}

fn run_scan(args: ScanArgs) -> Result<(), BoxlabelError> {
    let output = OutputFormat::parse(&args.output)?;

    let mut session = Session::new();
    if let Some(path) = &args.labels {
        session.labels = io::read_labels_csv(path)?;
    }

    let outcome = session.bulk_load(&args.base, &args.subdirs, &ImagesizeLoader)?;
    let stats = session.stats();

    match output {
        OutputFormat::Json => {
            let summary = ScanSummary {
                base: session.images.base_path().unwrap_or(args.base.as_path()),
                loaded: outcome.loaded,
                skipped: outcome
                    .skipped
                    .iter()
                    .map(|s| SkippedJson {
                        path: s.path.display().to_string(),
                        reason: s.reason.clone(),
                    })
                    .collect(),
                labels: session
                    .labels
                    .iter()
                    .map(|(id, name)| (id.as_i64(), name))
                    .collect(),
                stats: &stats,
            };
            print_json(&summary)?;
        }
        OutputFormat::Text => {
            println!(
                "Loaded {} image(s) from {}",
                outcome.loaded,
                args.base.display()
            );
            if !outcome.skipped.is_empty() {
                println!();
                println!("Skipped ({}):", outcome.skipped.len());
                for skipped in &outcome.skipped {
                    println!("  - {}: {}", skipped.path.display(), skipped.reason);
                }
            }
            if !session.labels.is_empty() {
                println!();
                println!("Labels ({}):", session.labels.len());
                for (id, name) in session.labels.iter() {
                    println!("  {:>4}  {}", id, name);
                }
            }
            println!();
            print!("{}", stats);
        }
    }

    export_requested(&session, args.csv, args.coco, output)
}

fn export_requested(
    session: &Session,
    csv: Option<PathBuf>,
    coco: Option<PathBuf>,
    output: OutputFormat,
) -> Result<(), BoxlabelError> {
    if let Some(path) = csv {
        session.export_csv(&path)?;
        if output == OutputFormat::Text {
            println!("Wrote {}", path.display());
        }
    }
    if let Some(path) = coco {
        session.export_coco(&path)?;
        if output == OutputFormat::Text {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BoxlabelError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}
