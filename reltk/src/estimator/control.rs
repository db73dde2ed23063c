use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Dosage coded genotypes
pub const DATA_FORM_DOSAGE: u8 = 2;
pub const DELTA_INIT: u8 = 1;
pub const METHOD_CODE: u8 = 1;
pub const ALLELE_FREQ_OUTPUT: u8 = 0;

const N_FIELDS: usize = 10;

/// Parameters for one estimator run, written line by line into the control file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub n_individuals: usize,
    pub n_loci: usize,
    pub data_form: u8,
    pub inbreeding: bool,
    pub genotype_file: String,
    pub output_file: String,
    pub seed: u64,
    pub delta_init: u8,
    pub method: u8,
    pub allele_freq_output: u8,
}

impl ControlRecord {
    pub fn new(
        n_individuals: usize,
        n_loci: usize,
        inbreeding: bool,
        genotype_file: &str,
        output_file: &str,
        seed: u64,
    ) -> Result<Self, Error> {
        if n_individuals == 0 || n_loci == 0 {
            return Err(Error::Configuration(format!(
                "cannot run the estimator on {n_individuals} individuals and {n_loci} loci"
            )));
        }

        for name in [genotype_file, output_file] {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::Configuration(format!(
                    "estimator file name {name:?} must be non-empty and contain no whitespace"
                )));
            }
        }

        Ok(Self {
            n_individuals,
            n_loci,
            data_form: DATA_FORM_DOSAGE,
            inbreeding,
            genotype_file: genotype_file.to_string(),
            output_file: output_file.to_string(),
            seed,
            delta_init: DELTA_INIT,
            method: METHOD_CODE,
            allele_freq_output: ALLELE_FREQ_OUTPUT,
        })
    }

    pub fn to_lines(&self) -> Vec<String> {
        vec![
            self.n_individuals.to_string(),
            self.n_loci.to_string(),
            self.data_form.to_string(),
            u8::from(self.inbreeding).to_string(),
            self.genotype_file.clone(),
            self.output_file.clone(),
            self.seed.to_string(),
            self.delta_init.to_string(),
            self.method.to_string(),
            self.allele_freq_output.to_string(),
        ]
    }

    /// Overwrites any existing file at `path`
    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let mut content = self.to_lines().join("\n");
        content.push('\n');
        std::fs::write(path, content).map_err(|e| Error::io(path, e))?;

        tracing::debug!("Wrote control file {path:?}: {self:?}");
        Ok(())
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        if lines.len() != N_FIELDS {
            return Err(Error::Parse(format!(
                "control file has {} lines, expected {N_FIELDS}",
                lines.len()
            )));
        }

        fn field<T: std::str::FromStr>(lines: &[&str], idx: usize) -> Result<T, Error> {
            lines[idx].parse::<T>().map_err(|_| {
                Error::Parse(format!(
                    "control file line {} is not a valid value: {:?}",
                    idx + 1,
                    lines[idx]
                ))
            })
        }

        let inbreeding = match lines[3] {
            "0" => false,
            "1" => true,
            v => {
                return Err(Error::Parse(format!(
                    "control file inbreeding flag must be 0 or 1, found {v:?}"
                )))
            }
        };

        Ok(Self {
            n_individuals: field(&lines, 0)?,
            n_loci: field(&lines, 1)?,
            data_form: field(&lines, 2)?,
            inbreeding,
            genotype_file: lines[4].to_string(),
            output_file: lines[5].to_string(),
            seed: field(&lines, 6)?,
            delta_init: field(&lines, 7)?,
            method: field(&lines, 8)?,
            allele_freq_output: field(&lines, 9)?,
        })
    }
}
