use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::estimator::{EstimatorConfig, Platform, ReportFormat, DEFAULT_REPORT_FILE};

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct StandardArgs {
    /// Genotype input (.csv, .tsv, .vcf, .vcf.gz or .bcf)
    pub file: PathBuf,

    /// Output directory
    #[cfg_attr(feature = "clap", arg(short = 'o', long="outdir", default_value_os_t = PathBuf::from("./"), value_hint = clap::ValueHint::DirPath))]
    pub output: PathBuf,

    /// Output filename prefix
    #[cfg_attr(feature = "clap", arg(short = 'p', long))]
    pub prefix: Option<String>,

    /// List of samples to include (one ID per row)
    #[cfg_attr(feature = "clap", arg(short = 'S', long, value_delimiter = ' ', num_args = 1.. ))]
    pub samples: Option<Vec<PathBuf>>,

    /// Region to read from an indexed VCF, i.e. chr9 or chr9:27573534-27673534
    #[cfg_attr(feature = "clap", arg(short = 'c', long))]
    pub coords: Option<String>,

    /// Missing genotype marker in .csv and .tsv inputs (empty cells are always missing)
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("NA")))]
    pub missing: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct EstimatorArgs {
    /// Directory containing the estimator executable (and its libraries on Windows)
    #[cfg_attr(feature = "clap", arg(short = 'i', long, value_hint = clap::ValueHint::DirPath))]
    pub install_dir: PathBuf,

    /// Scratch directory for the estimator run [default: <outdir>/estimator_run]
    #[cfg_attr(feature = "clap", arg(long, value_hint = clap::ValueHint::DirPath))]
    pub scratch: Option<PathBuf>,

    /// File name the estimator writes its report to
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from(DEFAULT_REPORT_FILE)))]
    pub report_name: String,

    /// Allow inbreeding in the estimation
    #[cfg_attr(feature = "clap", arg(long))]
    pub inbreeding: bool,

    /// Random seed for the estimator [default: random]
    #[cfg_attr(feature = "clap", arg(long))]
    pub seed: Option<u64>,

    /// Terminate the estimator after this many seconds
    #[cfg_attr(feature = "clap", arg(long))]
    pub timeout: Option<u64>,

    /// Use the executable of another platform [default: current platform]
    #[cfg_attr(feature = "clap", arg(long, value_enum))]
    pub platform: Option<Platform>,

    /// Layout version of the estimator report
    #[cfg_attr(feature = "clap", arg(long, value_enum, default_value_t = ReportFormat::V1))]
    pub report_format: ReportFormat,
}

impl Default for EstimatorArgs {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("./"),
            scratch: None,
            report_name: String::from(DEFAULT_REPORT_FILE),
            inbreeding: false,
            seed: None,
            timeout: None,
            platform: None,
            report_format: ReportFormat::V1,
        }
    }
}

impl EstimatorArgs {
    pub fn config(&self, outdir: &Path) -> EstimatorConfig {
        let scratch = match &self.scratch {
            Some(scratch) => scratch.clone(),
            None => outdir.join("estimator_run"),
        };

        EstimatorConfig {
            platform: self.platform,
            report_file: self.report_name.clone(),
            inbreeding: self.inbreeding,
            seed: self.seed,
            timeout: self.timeout.map(Duration::from_secs),
            format: self.report_format,
            ..EstimatorConfig::new(&self.install_dir, scratch)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct GraphArgs {
    /// Graph width in px
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 2000.0))]
    pub width: f32,

    /// Graph height in px
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 2000.0))]
    pub height: f32,

    // Font size
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 24.0))]
    pub font_size: f32,

    // Cell color at relatedness 1.0
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("#c1272d")))]
    pub color: String,

    // Cell color for pairs missing from the report
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("#bdbdbd")))]
    pub unset_color: String,

    // Background color
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("white")))]
    pub background_color: String,
}

impl Default for GraphArgs {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            font_size: 24.0,
            color: String::from("#c1272d"),
            unset_color: String::from("#bdbdbd"),
            background_color: String::from("white"),
        }
    }
}
