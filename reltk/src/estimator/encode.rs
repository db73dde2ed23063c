use itertools::Itertools;

use crate::error::Error;
use crate::estimator::remap::PlaceholderMap;
use crate::structs::GenotypeMatrix;

/// Missing genotypes are written as this digit. Valid dosages stay strictly
/// below it, so a `3` in the genotype file always means missing.
pub const MISSING_SENTINEL: u8 = 3;

/// Serialize a genotype matrix into the estimator's genotype file format.
///
/// The first line holds the space separated placeholders in matrix row order,
/// followed by one line per individual with one digit per locus.
pub fn encode_genotypes(matrix: &GenotypeMatrix, map: &PlaceholderMap) -> Result<String, Error> {
    if matrix.nsamples() != map.len() {
        return Err(Error::Configuration(format!(
            "genotype matrix has {} samples but {} placeholders were assigned",
            matrix.nsamples(),
            map.len()
        )));
    }

    let mut out = String::with_capacity(matrix.nsamples() * (matrix.nloci() + 1) + 8);
    out.push_str(&map.placeholders().join(" "));
    out.push('\n');

    for (row_idx, sample) in matrix.samples().iter().enumerate() {
        for (locus_idx, gt) in matrix.row(row_idx).iter().enumerate() {
            out.push(encode_dosage(*gt).ok_or_else(|| Error::Encoding {
                sample: sample.clone(),
                locus: matrix.loci()[locus_idx].clone(),
                value: gt.map(|v| v.to_string()).unwrap_or_default(),
            })?);
        }
        out.push('\n');
    }

    Ok(out)
}

fn encode_dosage(gt: Option<u8>) -> Option<char> {
    match gt {
        None => Some(char::from(b'0' + MISSING_SENTINEL)),
        Some(v) if v < MISSING_SENTINEL => Some(char::from(b'0' + v)),
        Some(_) => None,
    }
}

/// Decode one genotype line back into digit values. Missing genotypes come
/// back as [`MISSING_SENTINEL`].
pub fn decode_genotype_line(line: &str) -> Result<Vec<u8>, Error> {
    line.trim_end()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if d <= u32::from(MISSING_SENTINEL) => Ok(d as u8),
            _ => Err(Error::Parse(format!(
                "unexpected character {c:?} in genotype line"
            ))),
        })
        .collect()
}
