use ndarray::{Array2, ArrayView1, Axis};

use crate::error::Error;
use crate::utils::filter_samples;

/// Individuals-by-loci dosage matrix. `None` marks a missing genotype.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeMatrix {
    samples: Vec<String>,
    loci: Vec<String>,
    dosages: Array2<Option<u8>>,
}

impl GenotypeMatrix {
    pub fn new(
        samples: Vec<String>,
        loci: Vec<String>,
        dosages: Array2<Option<u8>>,
    ) -> Result<Self, Error> {
        if dosages.nrows() != samples.len() || dosages.ncols() != loci.len() {
            return Err(Error::Configuration(format!(
                "genotype matrix is {}x{} but {} samples and {} loci were given",
                dosages.nrows(),
                dosages.ncols(),
                samples.len(),
                loci.len()
            )));
        }

        Ok(Self {
            samples,
            loci,
            dosages,
        })
    }

    pub fn from_rows(
        samples: Vec<String>,
        loci: Vec<String>,
        rows: Vec<Vec<Option<u8>>>,
    ) -> Result<Self, Error> {
        let shape = (rows.len(), loci.len());
        if let Some(row) = rows.iter().find(|row| row.len() != loci.len()) {
            return Err(Error::Configuration(format!(
                "genotype row has {} values but {} loci were given",
                row.len(),
                loci.len()
            )));
        }
        let dosages = Array2::from_shape_vec(shape, rows.into_iter().flatten().collect())?;
        Self::new(samples, loci, dosages)
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn loci(&self) -> &[String] {
        &self.loci
    }

    pub fn dosages(&self) -> &Array2<Option<u8>> {
        &self.dosages
    }

    pub fn nsamples(&self) -> usize {
        self.samples.len()
    }

    pub fn nloci(&self) -> usize {
        self.loci.len()
    }

    pub fn row(&self, idx: usize) -> ArrayView1<Option<u8>> {
        self.dosages.row(idx)
    }

    pub fn nmissing(&self) -> usize {
        self.dosages.iter().filter(|gt| gt.is_none()).count()
    }

    /// Keep only the wanted samples, in the order they appear in the matrix.
    pub fn select_samples(self, wanted: &[String]) -> Result<Self, Error> {
        let indexes = filter_samples(&self.samples, Some(wanted.to_vec()));

        for sample in wanted {
            if !self.samples.contains(sample) {
                tracing::warn!("Wanted sample {sample} is not in the genotype input");
            }
        }

        if indexes.is_empty() {
            return Err(Error::SamplesNotFound);
        }

        let samples = indexes.iter().map(|i| self.samples[*i].clone()).collect();
        let dosages = self.dosages.select(Axis(0), &indexes);

        Self::new(samples, self.loci, dosages)
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    fn matrix() -> GenotypeMatrix {
        GenotypeMatrix::from_rows(
            vec!["A".into(), "B".into(), "C".into()],
            vec!["m1".into(), "m2".into()],
            vec![
                vec![Some(0), Some(1)],
                vec![Some(2), None],
                vec![None, Some(1)],
            ],
        ).unwrap()
    }

    #[test]
    fn from_rows_shape() {
        let m = matrix();
        assert_eq!(3, m.nsamples());
        assert_eq!(2, m.nloci());
        assert_eq!(2, m.nmissing());
        assert_eq!(vec![Some(2), None], m.row(1).to_vec());

        let res = GenotypeMatrix::from_rows(
            vec!["A".into()],
            vec!["m1".into(), "m2".into()],
            vec![vec![Some(0)]],
        );
        assert!(matches!(res, Err(Error::Configuration(_))));
    }

    #[test]
    fn select_samples() {
        let m = matrix().select_samples(&["C".into(), "A".into(), "X".into()]).unwrap();
        assert_eq!(vec!["A", "C"], m.samples());
        assert_eq!(vec![None, Some(1)], m.row(1).to_vec());

        let res = matrix().select_samples(&["X".into()]);
        assert!(matches!(res, Err(Error::SamplesNotFound)));
    }
}
