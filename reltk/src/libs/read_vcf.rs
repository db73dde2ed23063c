use std::path::Path;

use ndarray::{Array2, ShapeBuilder};
use rust_htslib::bcf::header::HeaderView;
use rust_htslib::bcf::record::GenotypeAllele;
use rust_htslib::bcf::{IndexedReader, Read, Reader, Record};

use crate::error::Error;
use crate::structs::GenotypeMatrix;
use crate::utils::parse_coords;

pub fn get_reader(
    path: &Path,
    contig: &str,
    range: Option<(u64, u64)>,
) -> Result<IndexedReader, Error> {
    let mut reader = IndexedReader::from_path(path)?;
    let rid = reader.header().name2rid(contig.as_bytes())?;

    match range {
        // RUST-HTSLIB is 0-based so subtract 1
        Some((start, end)) => {
            reader.fetch(rid, start.saturating_sub(1), Some(end.saturating_sub(1)))?
        }
        None => reader.fetch(rid, 0, None)?,
    };

    Ok(reader)
}

pub fn get_samples(header: &HeaderView) -> Vec<String> {
    header
        .samples()
        .into_iter()
        .map(|sample| String::from_utf8_lossy(sample).to_string())
        .collect()
}

/// Read diploid genotypes as reference allele dosages.
///
/// Without coords the whole file is streamed, with coords the file must be
/// indexed. A genotype with any missing allele is missing.
pub fn read_vcf_to_genotypes(path: &Path, coords: Option<&str>) -> Result<GenotypeMatrix, Error> {
    tracing::info!("Input VCF: {path:?}");

    match coords {
        Some(coords) => {
            let (contig, start, stop) = parse_coords(coords)?;
            tracing::info!("Reading genotypes from {coords}");
            let mut reader = get_reader(path, contig, start.zip(stop))?;
            let samples = get_samples(reader.header());
            collect_genotypes(&mut reader, samples)
        }
        None => {
            let mut reader = Reader::from_path(path)?;
            let samples = get_samples(reader.header());
            collect_genotypes(&mut reader, samples)
        }
    }
}

fn collect_genotypes<R: Read>(reader: &mut R, samples: Vec<String>) -> Result<GenotypeMatrix, Error> {
    let (mut markers, mut loci) = (vec![], vec![]);
    let mut gt_buffer = rust_htslib::bcf::record::Buffer::new();

    for record in reader.records() {
        let record = record?;

        // HTSlib is 0-based so add 1
        let pos = (record.pos() + 1) as u64;
        tracing::trace!("Reading record at position {pos}");

        if record.alleles().len() != 2 {
            return Err(Error::Normalize { pos });
        }

        let gts = record.genotypes_shared_buffer(&mut gt_buffer)?;

        for i in 0..samples.len() {
            let alleles = gts.get(i);
            if alleles.len() != 2 {
                return Err(Error::Ploidy {
                    num: alleles.len(),
                    pos,
                });
            }
            markers.push(genotype_to_dosage(&alleles));
        }

        loci.push(locus_name(&record, pos));
    }

    let dosages = Array2::from_shape_vec((samples.len(), loci.len()).f(), markers)?;

    tracing::info!(
        "Constructed a genotype matrix of {} samples from {} records",
        samples.len(),
        loci.len()
    );

    GenotypeMatrix::new(samples, loci, dosages)
}

fn genotype_to_dosage(alleles: &[GenotypeAllele]) -> Option<u8> {
    alleles.iter().try_fold(0, |dosage, allele| match allele {
        GenotypeAllele::Unphased(v) | GenotypeAllele::Phased(v) => Some(dosage + (*v == 0) as u8),
        GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => None,
    })
}

fn locus_name(record: &Record, pos: u64) -> String {
    let contig = record
        .rid()
        .and_then(|rid| record.header().rid2name(rid).ok())
        .map(|name| String::from_utf8_lossy(name).to_string())
        .unwrap_or_default();
    format!("{contig}:{pos}")
}
