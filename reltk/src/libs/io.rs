use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use csv::{Reader, ReaderBuilder, Writer, WriterBuilder};

use crate::args::StandardArgs;
use crate::error::Error;
use crate::estimator::{PlaceholderMap, RawReportTable, RelatednessMatrix};
use crate::read_vcf::read_vcf_to_genotypes;
use crate::structs::GenotypeMatrix;
use crate::utils::{format_value, strip_prefix};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    VCF,
    CSV,
    TSV,
}

impl FileType {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let extension: &str = path
            .extension()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::UnknownExtension(path.to_path_buf()))?;

        let extension = match extension {
            "gz" | "bgz" => return_double_extension_filetype(path, extension)?,
            _ => extension.to_string(),
        };

        Ok(match extension.as_str() {
            "vcf.gz" | "vcf.bgz" | "vcf" | "bcf" => Self::VCF,
            "csv.gz" | "csv" => Self::CSV,
            "tsv.gz" | "tsv" | "txt" => Self::TSV,
            _ => return Err(Error::UnknownExtension(path.to_path_buf())),
        })
    }
}

pub fn return_double_extension_filetype(path: &Path, e1: &str) -> Result<String, Error> {
    let e2 = path
        .file_stem()
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(OsStr::to_str)
        .ok_or_else(|| Error::UnknownExtension(path.to_path_buf()))?;
    Ok(format!("{e2}.{e1}"))
}

/// Read the genotype input named in `args`, restricted to the wanted samples
pub fn read_genotypes(args: &StandardArgs) -> Result<GenotypeMatrix> {
    tracing::info!("Reading genotypes from {:?}", args.file);

    let matrix = match FileType::from_path(&args.file)? {
        FileType::VCF => read_vcf_to_genotypes(&args.file, args.coords.as_deref())?,
        FileType::CSV => {
            read_dosage_table(get_csv_reader(get_input(Some(args.file.clone()))?), &args.missing)?
        }
        FileType::TSV => read_dosage_table(
            get_tsv_reader(get_input(Some(args.file.clone()))?, true),
            &args.missing,
        )?,
    };

    let matrix = match read_multiple_sample_ids(&args.samples)? {
        Some(wanted) => matrix.select_samples(&wanted)?,
        None => matrix,
    };

    tracing::info!(
        "Read {} samples and {} loci, {} genotypes missing",
        matrix.nsamples(),
        matrix.nloci(),
        matrix.nmissing()
    );

    Ok(matrix)
}

/// Samples as rows, loci as columns. The first header cell is ignored.
pub fn read_dosage_table<R: io::Read>(
    mut rdr: Reader<R>,
    missing: &str,
) -> Result<GenotypeMatrix, Error> {
    let loci: Vec<String> = rdr.headers()?.iter().skip(1).map(String::from).collect();

    let mut samples = vec![];
    let mut rows = vec![];

    for record in rdr.records() {
        let record = record?;
        let mut fields = record.iter();
        let sample = fields.next().unwrap_or_default().to_string();

        let row = fields
            .zip(&loci)
            .map(|(value, locus)| {
                let value = value.trim();
                if value.is_empty() || value == missing {
                    return Ok(None);
                }
                value.parse::<u8>().map(Some).map_err(|_| Error::Encoding {
                    sample: sample.clone(),
                    locus: locus.clone(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<Option<u8>>, Error>>()?;

        samples.push(sample);
        rows.push(row);
    }

    GenotypeMatrix::from_rows(samples, loci, rows)
}

pub fn read_lines<P>(filename: P) -> Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let name = filename.as_ref().display();
    let file = match File::open(&filename) {
        Ok(x) => x,
        Err(err) => {
            let msg = format!("failed to open {name}: {err}");
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, msg))?;
        }
    };
    Ok(io::BufReader::new(file).lines())
}

pub fn read_multiple_sample_ids(path: &Option<Vec<PathBuf>>) -> Result<Option<Vec<String>>> {
    match path {
        Some(paths) => {
            let mut samples = vec![];
            for path in paths {
                for line in read_lines(path)?.map_while(Result::ok) {
                    let line = line.trim();
                    if !line.is_empty() {
                        samples.push(line.to_string());
                    }
                }
            }
            Ok(Some(samples))
        }
        None => Ok(None),
    }
}

pub fn push_to_output(prefix: &Option<String>, output: &mut PathBuf, name: &str, suffix: &str) {
    match strip_prefix(prefix.clone()) {
        Some(prefix) => output.push(format!("{prefix}_{name}.{suffix}")),
        None => output.push(format!("{name}.{suffix}")),
    }
}

pub fn get_tsv_reader<R: io::Read>(input: R, has_headers: bool) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(false)
        .from_reader(input)
}

pub fn get_csv_reader<R: io::Read>(input: R) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(false)
        .from_reader(input)
}

pub fn get_csv_writer<W: io::Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_writer(output)
}

pub fn get_input(filename: Option<PathBuf>) -> Result<Box<dyn io::Read>> {
    let input: Box<dyn io::Read> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdin()),
            Some(name) => {
                let r = match niffler::from_path(name) {
                    Ok(x) => x.0,
                    Err(err) => {
                        let msg = format!("failed to open \"{name}\": {err}");
                        return Err(eyre!(msg))?;
                    }
                };
                Box::new(r)
            }
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdin()),
    };
    Ok(input)
}

pub fn get_output(filename: Option<PathBuf>) -> Result<Box<dyn io::Write>> {
    let output: Box<dyn io::Write> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdout()),
            Some(name) => Box::new(
                match std::fs::File::options()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(name)
                {
                    Ok(x) => x,
                    Err(err) => return Err(eyre!("failed to open \"{name}\": {err}"))?,
                },
            ),
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdout()),
    };
    Ok(output)
}

pub fn open_csv_writer(name: PathBuf) -> Result<Writer<Box<dyn io::Write>>> {
    Ok(get_csv_writer(get_output(Some(name))?))
}

pub fn write_relatedness_matrix(path: PathBuf, matrix: &RelatednessMatrix) -> Result<()> {
    let mut writer = open_csv_writer(path.clone())?;

    let mut header = vec![String::from("sample")];
    header.extend(matrix.labels().iter().cloned());
    writer.write_record(&header)?;

    for (label, row) in matrix.labels().iter().zip(matrix.values().rows()) {
        let mut record = vec![label.clone()];
        record.extend(row.iter().map(|v| format_value(*v)));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

/// Raw pairwise table with placeholders swapped back to sample labels
pub fn write_pair_table(path: PathBuf, table: &RawReportTable, map: &PlaceholderMap) -> Result<()> {
    let mut writer = open_csv_writer(path.clone())?;
    writer.write_record(table.columns())?;

    for record in table.records() {
        let mut row = vec![
            map.label(&record.first)?.to_string(),
            map.label(&record.second)?.to_string(),
        ];
        row.extend(record.coefficients.iter().cloned());
        writer.write_record(&row)?;
    }

    writer
        .flush()
        .wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

pub fn write_placeholder_key(path: PathBuf, map: &PlaceholderMap) -> Result<()> {
    let mut writer = open_csv_writer(path.clone())?;
    writer.write_record(["placeholder", "sample"])?;
    for (placeholder, label) in map.iter() {
        writer.write_record([placeholder, label])?;
    }
    writer
        .flush()
        .wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

pub fn read_placeholder_key(path: PathBuf) -> Result<PlaceholderMap> {
    let mut rdr = get_csv_reader(get_input(Some(path.clone()))?);

    let pairs = rdr
        .records()
        .map(|record| {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(placeholder), Some(label)) => {
                    Ok((placeholder.to_string(), label.to_string()))
                }
                _ => Err(eyre!("Placeholder key {path:?} needs two columns")),
            }
        })
        .collect::<Result<Vec<(String, String)>>>()?;

    Ok(PlaceholderMap::from_key(pairs)?)
}
