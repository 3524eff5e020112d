pub mod report;

use crate::extraction::{ExtractionRequest, DEFAULT_JOBS, DEFAULT_OUTPUT_FILE, DEFAULT_TOOL};
use crate::manifest::{ManifestObserver, ManifestRecord};
use crate::types::{
    CaseKey, FeatureFormat, PrepConfig, DEFAULT_MANIFEST_FILE, DEFAULT_MAX_INDEX,
    MAX_INDEX_PAD_WIDTH,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Command-line arguments for radprep
#[derive(Parser, Debug)]
#[command(name = "radprep")]
#[command(about = "Pair image and mask files into a manifest and run radiomics feature extraction")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Summary format
    #[arg(long, default_value = "text", global = true)]
    pub report: ReportFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for image/mask pairs and write the manifest
    Build(SearchArgs),

    /// Run feature extraction on an existing manifest
    Extract(ExtractCommandArgs),

    /// Build the manifest, then run feature extraction
    Run {
        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        tool: ToolArgs,
    },
}

/// Options describing the identifier space and the manifest location
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Directory searched recursively for images and masks
    #[arg(value_name = "DIRECTORY")]
    pub folder: PathBuf,

    /// Highest case index to look for
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_INDEX)]
    pub max_index: u32,

    /// Type codes, in search order
    #[arg(long, value_delimiter = ',', default_values = ["RTF", "RTM", "RCF", "RCM"])]
    pub types: Vec<String>,

    /// Side codes, in search order
    #[arg(long, value_delimiter = ',', default_values = ["Right", "Left"])]
    pub sides: Vec<String>,

    /// Also match indices zero-padded to this width (e.g. 2 for RTF01)
    #[arg(
        long,
        value_name = "WIDTH",
        value_parser = clap::value_parser!(u8).range(1..=MAX_INDEX_PAD_WIDTH as i64)
    )]
    pub pad_width: Option<u8>,

    /// Manifest file to write
    #[arg(short, long, default_value = DEFAULT_MANIFEST_FILE)]
    pub manifest: PathBuf,
}

impl SearchArgs {
    /// Converts the arguments into a search configuration
    pub fn to_config(&self) -> PrepConfig {
        PrepConfig::new(&self.folder)
            .with_max_index(self.max_index)
            .with_type_codes(self.types.iter().cloned())
            .with_sides(self.sides.iter().cloned())
            .with_index_pad_width(self.pad_width.map(usize::from))
            .with_manifest_path(&self.manifest)
    }
}

/// Options passed through to the extraction tool
#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    /// Feature output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Feature output format
    #[arg(short, long, default_value = "csv")]
    pub format: FeatureFormatArg,

    /// Parallel jobs used by the tool
    #[arg(short, long, default_value_t = NonZeroUsize::new(DEFAULT_JOBS).unwrap_or(NonZeroUsize::MIN))]
    pub jobs: NonZeroUsize,

    /// Keep non-numeric feature values instead of passing --skip-nans
    #[arg(long)]
    pub keep_nans: bool,

    /// Extraction program to run
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,
}

impl ToolArgs {
    /// Builds the tool invocation for a manifest
    pub fn to_request(&self, manifest: &Path) -> ExtractionRequest {
        ExtractionRequest::new(manifest, &self.output)
            .with_program(self.tool.clone())
            .with_format(self.format.clone().into())
            .with_jobs(self.jobs)
            .with_skip_nans(!self.keep_nans)
    }
}

/// Arguments of the `extract` subcommand
#[derive(Args, Debug, Clone)]
pub struct ExtractCommandArgs {
    /// Manifest file to read
    #[arg(short, long, default_value = DEFAULT_MANIFEST_FILE)]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub tool: ToolArgs,
}

/// Feature output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum FeatureFormatArg {
    /// Comma-separated values
    Csv,
    /// JSON
    Json,
    /// Plain text
    Txt,
}

impl From<FeatureFormatArg> for FeatureFormat {
    fn from(arg: FeatureFormatArg) -> Self {
        match arg {
            FeatureFormatArg::Csv => FeatureFormat::Csv,
            FeatureFormatArg::Json => FeatureFormat::Json,
            FeatureFormatArg::Txt => FeatureFormat::Txt,
        }
    }
}

/// Summary format options
#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Observer that logs each manifest row as it is emitted
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ManifestObserver for LogObserver {
    fn case_resolved(&mut self, key: &CaseKey, image: Option<&Path>) {
        match image {
            Some(path) => log::debug!("{}: image {}", key, path.display()),
            None => log::trace!("{}: no image", key),
        }
    }

    fn record_emitted(&mut self, record: &ManifestRecord) {
        log::info!(
            "Written to manifest: {}, {}, {}",
            record.case_id,
            record.image_path.display(),
            record.mask_path.display()
        );
    }
}
