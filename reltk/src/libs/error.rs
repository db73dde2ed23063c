use std::path::PathBuf;

use thiserror::Error as ThisError;

#[rustfmt::skip]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Required estimator file is missing: {path:?}. Check the installation directory.")]
    DependencyMissing { path: PathBuf },

    #[error("Unsupported genotype value {value:?} for sample {sample} at locus {locus}. Dosages must be 0, 1, 2 or missing.")]
    Encoding { sample: String, locus: String, value: String },

    #[error("Failed to parse the estimator report: {0}. The estimator possibly did not run to completion.")]
    Parse(String),

    #[error("Placeholder {placeholder:?} is outside of the valid range 1..={n}")]
    Index { placeholder: String, n: usize },

    #[error("The estimator did not finish within {seconds:.1} seconds and was terminated")]
    Timeout { seconds: f64 },

    #[error("Failed to start the estimator {path:?}: {source}")]
    Spawn { path: PathBuf, source: std::io::Error },

    #[error("Io error: {path:?} {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Io error: {0}")]
    StdIo(#[from] std::io::Error),

    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Htslib error: {0}")]
    HtsLib(#[from] rust_htslib::errors::Error),

    #[error("Genotype matrix has an invalid shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Failed to parse coords: {coord}")]
    CoordParse { coord: String },

    #[error("Position {value:?} is not an integer in coords {coord}")]
    PosParse { coord: String, value: String },

    #[error("At pos {pos} allele count != 2. Normalize alleles using bcftools norm")]
    Normalize { pos: u64 },

    #[error("Sample does not have a diploid genotype at position: {pos}. Found {num} alleles.")]
    Ploidy { num: usize, pos: u64 },

    #[error("None of the wanted samples was found in the input.")]
    SamplesNotFound,

    #[error("Unknown file extension: {0:?}")]
    UnknownExtension(PathBuf),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = Error::Index { placeholder: String::from("7"), n: 3 };
        assert_eq!("Placeholder \"7\" is outside of the valid range 1..=3", e.to_string());

        let e = Error::DependencyMissing { path: PathBuf::from("/opt/est/relatedness_linux") };
        assert!(e.to_string().contains("relatedness_linux"));
    }
}
