use std::path::Path;

use crate::error::Error;

/// Versions of the estimator report layout this crate knows how to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    V1,
}

impl ReportFormat {
    pub fn layout(&self) -> ReportLayout {
        match self {
            Self::V1 => ReportLayout {
                start_prefix: "Pairwise estimates",
                end_marker: "Total computation time",
                heading_offset: 2,
                end_offset: 4,
                first_column: 1,
                n_columns: 21,
                relatedness_column: "Relatedness",
            },
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::V1 => write!(f, "v1"),
        }
    }
}

/// Where the pairwise table sits inside a free-form report.
///
/// The column heading line is `heading_offset` lines below the first line
/// starting with `start_prefix`. Data rows follow the heading and end
/// `end_offset` lines above the first later line containing `end_marker`.
/// Each row is split on whitespace and `n_columns` fields starting at
/// `first_column` (0-based) are kept: two identifiers, then coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub start_prefix: &'static str,
    pub end_marker: &'static str,
    pub heading_offset: usize,
    pub end_offset: usize,
    pub first_column: usize,
    pub n_columns: usize,
    pub relatedness_column: &'static str,
}

/// One individual pair from the report, identifiers still as placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PairRecord {
    pub first: String,
    pub second: String,
    pub relatedness: f64,
    pub coefficients: Vec<String>,
}

/// The pairwise table as read from the report
#[derive(Debug, Clone, PartialEq)]
pub struct RawReportTable {
    columns: Vec<String>,
    records: Vec<PairRecord>,
}

impl RawReportTable {
    /// All kept column names, identifiers first
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn coefficient_names(&self) -> &[String] {
        &self.columns[2..]
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn coefficient<'a>(&self, record: &'a PairRecord, name: &str) -> Option<&'a str> {
        self.coefficient_names()
            .iter()
            .position(|c| c == name)
            .and_then(|i| record.coefficients.get(i))
            .map(String::as_str)
    }
}

impl ReportLayout {
    fn table_bounds(&self, lines: &[&str]) -> Result<(usize, usize), Error> {
        let start = lines
            .iter()
            .position(|l| l.starts_with(self.start_prefix))
            .ok_or_else(|| {
                Error::Parse(format!(
                    "no line starting with {:?} was found",
                    self.start_prefix
                ))
            })?;

        let end = lines
            .iter()
            .skip(start + 1)
            .position(|l| l.contains(self.end_marker))
            .map(|i| i + start + 1)
            .ok_or_else(|| {
                Error::Parse(format!(
                    "no line containing {:?} was found after line {}",
                    self.end_marker,
                    start + 1
                ))
            })?;

        tracing::debug!(
            "Report table anchors at lines {} and {}",
            start + 1,
            end + 1
        );

        let heading = start + self.heading_offset;
        let rows_end = (end + 1).checked_sub(self.end_offset);

        match rows_end {
            Some(rows_end) if heading < end && rows_end > heading => Ok((heading, rows_end)),
            _ => Err(Error::Parse(format!(
                "table heading at line {} and end marker at line {} overlap",
                heading + 1,
                end + 1
            ))),
        }
    }

    pub fn parse(&self, text: &str) -> Result<RawReportTable, Error> {
        let lines: Vec<&str> = text.lines().collect();
        let (heading_idx, rows_end) = self.table_bounds(&lines)?;

        let heading: Vec<&str> = lines[heading_idx].split_whitespace().collect();
        let last_column = self.first_column + self.n_columns;
        if heading.len() < last_column {
            return Err(Error::Parse(format!(
                "column heading at line {} has {} fields, expected at least {last_column}",
                heading_idx + 1,
                heading.len()
            )));
        }

        let columns: Vec<String> = heading[self.first_column..last_column]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let relatedness_idx = columns
            .iter()
            .skip(2)
            .position(|c| c == self.relatedness_column)
            .map(|i| i + 2)
            .ok_or_else(|| {
                Error::Parse(format!(
                    "column heading has no {:?} column",
                    self.relatedness_column
                ))
            })?;

        let mut records = Vec::with_capacity(rows_end - heading_idx - 1);

        for (line_idx, line) in lines
            .iter()
            .enumerate()
            .take(rows_end)
            .skip(heading_idx + 1)
        {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != heading.len() {
                return Err(Error::Parse(format!(
                    "line {} has {} fields, expected {}",
                    line_idx + 1,
                    fields.len(),
                    heading.len()
                )));
            }

            let values = &fields[self.first_column..last_column];
            let relatedness = values[relatedness_idx].parse::<f64>().map_err(|_| {
                Error::Parse(format!(
                    "line {}: {} value {:?} is not a number",
                    line_idx + 1,
                    self.relatedness_column,
                    values[relatedness_idx]
                ))
            })?;

            records.push(PairRecord {
                first: values[0].to_string(),
                second: values[1].to_string(),
                relatedness,
                coefficients: values[2..].iter().map(|v| v.to_string()).collect(),
            });
        }

        tracing::info!("Parsed {} pairwise estimates from the report", records.len());

        Ok(RawReportTable { columns, records })
    }
}

pub fn parse_report(text: &str, format: ReportFormat) -> Result<RawReportTable, Error> {
    format.layout().parse(text)
}

/// A report that was never written means the estimator did not complete
pub fn read_report(path: &Path, format: ReportFormat) -> Result<RawReportTable, Error> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::Parse(format!(
                "report file {path:?} was not produced"
            )))
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    tracing::debug!("Read {} bytes from the report {path:?}", bytes.len());
    parse_report(&String::from_utf8_lossy(&bytes), format)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;

    const HEADING: &str = "Pair Ind1 Ind2 Delta1 Delta2 Delta3 Delta4 Delta5 Delta6 Delta7 Delta8 Delta9 Theta Relatedness F_Ind1 F_Ind2 Fraternity R_Lower R_Upper Theta_Lower Theta_Upper LogL";

    fn row(pair: usize, a: usize, b: usize, r: f64) -> String {
        let deltas = "0.0000 0.0000 0.0000 0.0000 0.0000 0.0000 0.2500 0.5000 0.2500";
        format!("{pair} {a} {b} {deltas} {:.4} {r:.4} 0.0000 0.0000 0.2500 0.1000 0.9000 0.0500 0.4500 -1234.5", r / 2.0)
    }

    fn report(preamble: usize, n_rows: usize) -> String {
        let mut lines: Vec<String> = (0..preamble).map(|i| format!("preamble line {i}")).collect();
        lines.push(String::from("Pairwise estimates of relatedness and inbreeding"));
        lines.push("-".repeat(40));
        lines.push(String::from(HEADING));
        for i in 0..n_rows {
            lines.push(row(i + 1, 1, i + 2, 0.5 / (i + 1) as f64));
        }
        lines.push("-".repeat(40));
        lines.push(String::new());
        lines.push(format!("Number of pairs: {n_rows}"));
        lines.push(String::from("Total computation time: 0.12 s"));
        lines.push(String::from("Bye"));
        lines.join("\n")
    }

    #[test]
    fn parse_rows_between_anchors() {
        for preamble in [0, 1, 7, 30] {
            for n_rows in [0, 1, 2, 15] {
                let table = parse_report(&report(preamble, n_rows), ReportFormat::V1).unwrap();
                assert_eq!(n_rows, table.len());
                assert_eq!(21, table.columns().len());
                assert_eq!(19, table.coefficient_names().len());

                for (i, record) in table.records().iter().enumerate() {
                    assert_eq!("1", record.first);
                    assert_eq!((i + 2).to_string(), record.second);
                    assert_eq!(format!("{:.4}", 0.5 / (i + 1) as f64).parse::<f64>().unwrap(), record.relatedness);
                }
            }
        }
    }

    #[test]
    fn coefficient_lookup() {
        let table = parse_report(&report(3, 1), ReportFormat::V1).unwrap();
        let record = &table.records()[0];
        assert_eq!(Some("0.2500"), table.coefficient(record, "Theta"));
        assert_eq!(Some("-1234.5"), table.coefficient(record, "LogL"));
        assert_eq!(None, table.coefficient(record, "Ind1"));
        assert_eq!("Ind1", table.columns()[0]);
    }

    #[test]
    fn missing_anchors() {
        let text = report(2, 2).replace("Pairwise estimates", "Estimates");
        assert!(matches!(parse_report(&text, ReportFormat::V1), Err(Error::Parse(_))));

        let text = report(2, 2).replace("Total computation time", "Done");
        assert!(matches!(parse_report(&text, ReportFormat::V1), Err(Error::Parse(_))));

        assert!(matches!(parse_report("", ReportFormat::V1), Err(Error::Parse(_))));
    }

    #[test]
    fn end_marker_before_start_is_ignored() {
        let text = format!("Total computation time: earlier run\n{}", report(0, 2));
        let table = parse_report(&text, ReportFormat::V1).unwrap();
        assert_eq!(2, table.len());
    }

    #[test]
    fn malformed_rows() {
        let text = report(1, 3).replace(&row(2, 1, 3, 0.25), "2 1 3 0.1 truncated");
        assert!(matches!(parse_report(&text, ReportFormat::V1), Err(Error::Parse(_))));

        // Delta8 and Relatedness both read 0.5000, the field count stays intact
        let bad = row(1, 1, 2, 0.5).replacen(" 0.5000 ", " n/a ", 2);
        assert_eq!(22, bad.split_whitespace().count());
        let text = report(1, 1).replace(&row(1, 1, 2, 0.5), &bad);
        assert!(matches!(parse_report(&text, ReportFormat::V1), Err(Error::Parse(_))));
    }

    #[test]
    fn truncated_report() {
        let text = "Pairwise estimates\n----\nTotal computation time: 0 s\n";
        assert!(matches!(parse_report(text, ReportFormat::V1), Err(Error::Parse(_))));
    }

    #[test]
    fn missing_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_report(&dir.path().join("relatedness.out"), ReportFormat::V1);
        assert!(matches!(res, Err(Error::Parse(_))));
    }
}
