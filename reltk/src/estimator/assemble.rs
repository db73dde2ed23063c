use ndarray::Array2;

use crate::error::Error;
use crate::estimator::remap::PlaceholderMap;
use crate::estimator::report::RawReportTable;

/// Square relatedness matrix labeled by the original sample names.
/// Cells that no report record covers hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatednessMatrix {
    labels: Vec<String>,
    values: Array2<f64>,
}

impl RelatednessMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nsamples(&self) -> usize {
        self.labels.len()
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// `None` for unknown labels and for pairs the report did not cover
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let value = self.values[(self.index_of(row)?, self.index_of(col)?)];
        match value.is_nan() {
            true => None,
            false => Some(value),
        }
    }

    pub fn nunset(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Copy where every unset cell (j, i) takes the value of a set cell (i, j).
    /// Cells that were set in the report are never overwritten.
    pub fn mirrored(&self) -> Self {
        let mut values = self.values.clone();
        for ((i, j), value) in self.values.indexed_iter() {
            if !value.is_nan() && values[(j, i)].is_nan() {
                values[(j, i)] = *value;
            }
        }
        Self {
            labels: self.labels.clone(),
            values,
        }
    }
}

/// Place every pair record into its directional cell (first, second).
/// Only that one cell is written, the transposed cell is left as it is.
pub fn assemble_matrix(
    table: &RawReportTable,
    map: &PlaceholderMap,
) -> Result<RelatednessMatrix, Error> {
    let n = map.len();
    let mut values = Array2::from_elem((n, n), f64::NAN);

    for record in table.records() {
        let row = map.ordinal(&record.first)?;
        let col = map.ordinal(&record.second)?;
        values[(row, col)] = record.relatedness;
    }

    let matrix = RelatednessMatrix {
        labels: map.labels().map(String::from).collect(),
        values,
    };

    tracing::info!(
        "Assembled a {n}x{n} relatedness matrix from {} pairs, {} cells unset",
        table.len(),
        matrix.nunset()
    );

    Ok(matrix)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::estimator::report::{parse_report, ReportFormat};

    fn report(rows: &[(&str, &str, f64)]) -> RawReportTable {
        let heading = "Pair Ind1 Ind2 Delta1 Delta2 Delta3 Delta4 Delta5 Delta6 Delta7 Delta8 Delta9 Theta Relatedness F_Ind1 F_Ind2 Fraternity R_Lower R_Upper Theta_Lower Theta_Upper LogL";
        let mut text = format!("Pairwise estimates\n\n{heading}\n");
        for (i, (a, b, r)) in rows.iter().enumerate() {
            text.push_str(&format!("{} {a} {b} 0 0 0 0 0 0 0 0 0 0 {r} 0 0 0 0 0 0 0 0\n", i + 1));
        }
        text.push_str("\n\n\nTotal computation time: 1 s\n");
        parse_report(&text, ReportFormat::V1).unwrap()
    }

    fn labels() -> Vec<String> {
        vec![String::from("A"), String::from("B"), String::from("C")]
    }

    #[test]
    fn directional_cells_only() {
        let map = PlaceholderMap::new(&labels()).unwrap();
        let matrix = assemble_matrix(&report(&[("1", "2", 0.5), ("2", "3", 0.25)]), &map).unwrap();

        assert_eq!(vec!["A", "B", "C"], matrix.labels());
        assert_eq!(Some(0.5), matrix.get("A", "B"));
        assert_eq!(Some(0.25), matrix.get("B", "C"));
        assert_eq!(None, matrix.get("A", "C"));
        assert_eq!(None, matrix.get("B", "A"));
        assert_eq!(None, matrix.get("1", "2"));
        assert_eq!(7, matrix.nunset());
    }

    #[test]
    fn out_of_range_placeholder() {
        let map = PlaceholderMap::new(&labels()).unwrap();
        let res = assemble_matrix(&report(&[("1", "2", 0.5), ("2", "4", 0.25)]), &map);
        assert!(matches!(res, Err(Error::Index { .. })));

        let res = assemble_matrix(&report(&[("0", "2", 0.5)]), &map);
        assert!(matches!(res, Err(Error::Index { .. })));
    }

    #[test]
    fn mirrored_keeps_reported_cells() {
        let map = PlaceholderMap::new(&labels()).unwrap();
        let matrix = assemble_matrix(&report(&[("1", "2", 0.5), ("2", "1", 0.4), ("2", "3", 0.25)]), &map).unwrap();
        let mirrored = matrix.mirrored();

        assert_eq!(Some(0.5), mirrored.get("A", "B"));
        assert_eq!(Some(0.4), mirrored.get("B", "A"));
        assert_eq!(Some(0.25), mirrored.get("C", "B"));
        assert_eq!(None, mirrored.get("A", "C"));
        assert_eq!(None, matrix.get("C", "B"));
    }
}
