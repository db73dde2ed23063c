//! Adapter around the external pairwise relatedness estimator.
//!
//! A run flows through the submodules in order: sample labels are swapped for
//! numeric placeholders ([`remap`]), genotypes are written in the estimator's
//! digit format ([`encode`]) next to a control file ([`control`]), the
//! estimator is run inside a scratch directory ([`invoke`]), and its report is
//! parsed ([`report`]) and turned into a labeled matrix ([`assemble`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::structs::GenotypeMatrix;

pub mod assemble;
pub mod control;
pub mod encode;
pub mod invoke;
pub mod remap;
pub mod report;

pub use assemble::{assemble_matrix, RelatednessMatrix};
pub use control::ControlRecord;
pub use encode::{decode_genotype_line, encode_genotypes, MISSING_SENTINEL};
pub use invoke::{run_estimator, Installation, Platform};
pub use remap::PlaceholderMap;
pub use report::{parse_report, read_report, PairRecord, RawReportTable, ReportFormat};

/// Fixed file names inside the scratch directory
pub const CONTROL_FILE: &str = "relatedness.par";
pub const GENOTYPE_FILE: &str = "genotypes.dat";
pub const DEFAULT_REPORT_FILE: &str = "relatedness.out";

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub install_dir: PathBuf,
    /// Must not be shared with another concurrent run
    pub scratch_dir: PathBuf,
    pub platform: Option<Platform>,
    pub report_file: String,
    pub inbreeding: bool,
    pub seed: Option<u64>,
    pub timeout: Option<Duration>,
    pub format: ReportFormat,
}

impl EstimatorConfig {
    pub fn new(install_dir: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            scratch_dir: scratch_dir.into(),
            platform: None,
            report_file: String::from(DEFAULT_REPORT_FILE),
            inbreeding: false,
            seed: None,
            timeout: None,
            format: ReportFormat::default(),
        }
    }

    pub fn installation(&self) -> Result<Installation, Error> {
        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::current()?,
        };
        Ok(Installation::new(self.install_dir.clone(), platform))
    }

    pub fn seed(&self) -> u64 {
        resolve_seed(self.seed)
    }
}

/// The given seed, or a random one that is logged so the run can be repeated
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u32>() as u64;
            tracing::info!("No seed given, using random seed {seed}");
            seed
        }
    }
}

/// Everything the estimator run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RelatednessResult {
    pub matrix: RelatednessMatrix,
    pub table: RawReportTable,
    pub placeholders: PlaceholderMap,
    pub control: ControlRecord,
}

/// Placeholders, control record and encoded genotypes for one run
pub struct PreparedInput {
    pub placeholders: PlaceholderMap,
    pub control: ControlRecord,
    pub genotypes: String,
}

pub fn prepare_input(
    genotypes: &GenotypeMatrix,
    report_file: &str,
    inbreeding: bool,
    seed: u64,
) -> Result<PreparedInput, Error> {
    let placeholders = PlaceholderMap::new(genotypes.samples())?;
    let control = ControlRecord::new(
        genotypes.nsamples(),
        genotypes.nloci(),
        inbreeding,
        GENOTYPE_FILE,
        report_file,
        seed,
    )?;
    let encoded = encode_genotypes(genotypes, &placeholders)?;

    Ok(PreparedInput {
        placeholders,
        control,
        genotypes: encoded,
    })
}

impl PreparedInput {
    pub fn write(&self, dir: &Path) -> Result<(), Error> {
        let genotype_path = dir.join(&self.control.genotype_file);
        std::fs::write(&genotype_path, &self.genotypes).map_err(|e| Error::io(&genotype_path, e))?;
        tracing::info!(
            "Wrote genotypes of {} individuals at {} loci to {genotype_path:?}",
            self.control.n_individuals,
            self.control.n_loci
        );

        self.control.write(&dir.join(CONTROL_FILE))
    }
}

/// Run the estimator on a genotype matrix and read back the relatedness matrix.
///
/// The installation is checked before anything is written. The scratch
/// directory is left in place afterwards, including on failure.
pub fn estimate_relatedness(
    genotypes: &GenotypeMatrix,
    config: &EstimatorConfig,
) -> Result<RelatednessResult, Error> {
    let installation = config.installation()?;
    installation.verify()?;

    let input = prepare_input(
        genotypes,
        &config.report_file,
        config.inbreeding,
        config.seed(),
    )?;

    let scratch = &config.scratch_dir;
    let executable = installation.stage(scratch)?;
    input.write(scratch)?;

    let report_path = scratch.join(&input.control.output_file);
    if report_path.exists() {
        tracing::debug!("Removing a stale report {report_path:?}");
        std::fs::remove_file(&report_path).map_err(|e| Error::io(&report_path, e))?;
    }

    run_estimator(&executable, scratch, CONTROL_FILE, config.timeout)?;

    let table = read_report(&report_path, config.format)?;
    let matrix = assemble_matrix(&table, &input.placeholders)?;

    Ok(RelatednessResult {
        matrix,
        table,
        placeholders: input.placeholders,
        control: input.control,
    })
}
