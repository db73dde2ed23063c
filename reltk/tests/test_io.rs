mod common;

use std::path::PathBuf;

use reltk::{
    error::Error,
    estimator::ControlRecord,
    io::read_genotypes,
    read_vcf::read_vcf_to_genotypes,
    subcommands::prepare,
};

use crate::common::{read_output, standard_args, CHILD, FATHER, MOTHER, TEST_GENOTYPES, TEST_MULTIALLELIC, TEST_SAMPLES, TEST_VCF};

#[test]
fn read_csv_genotypes() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = read_genotypes(&standard_args(TEST_GENOTYPES, dir.path())).unwrap();

    assert_eq!(vec![MOTHER, FATHER, CHILD], matrix.samples());
    assert_eq!(vec!["rs1", "rs2", "rs3", "rs4"], matrix.loci());
    assert_eq!(vec![Some(1), Some(1), None, Some(0)], matrix.row(1).to_vec());
    assert_eq!(2, matrix.nmissing());
}

#[test]
fn read_sample_subset() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = standard_args(TEST_GENOTYPES, dir.path());
    args.samples = Some(vec![PathBuf::from(TEST_SAMPLES)]);

    let matrix = read_genotypes(&args).unwrap();
    assert_eq!(vec![FATHER, CHILD], matrix.samples());
    assert_eq!(vec![Some(2), Some(1), Some(1), Some(0)], matrix.row(1).to_vec());

    let samples = dir.path().join("nobody.txt");
    std::fs::write(&samples, "SAMPLE404\n").unwrap();
    args.samples = Some(vec![samples]);
    let err = read_genotypes(&args).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::SamplesNotFound)));
}

#[test]
fn read_vcf_dosages() {
    let matrix = read_vcf_to_genotypes(&PathBuf::from(TEST_VCF), None).unwrap();

    assert_eq!(vec!["SAMPLE1", "SAMPLE2", "SAMPLE3"], matrix.samples());
    assert_eq!(vec!["chr9:10", "chr9:20", "chr9:30"], matrix.loci());
    assert_eq!(vec![Some(2), Some(1), Some(0)], matrix.row(0).to_vec());
    assert_eq!(vec![Some(1), None, Some(1)], matrix.row(1).to_vec());
    assert_eq!(vec![Some(0), Some(2), Some(1)], matrix.row(2).to_vec());
}

#[test]
fn read_vcf_multiallelic() {
    let res = read_vcf_to_genotypes(&PathBuf::from(TEST_MULTIALLELIC), None);
    assert!(matches!(res, Err(Error::Normalize { pos: 10 })));
}

#[test]
fn unknown_input_type() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_genotypes(&standard_args("tests/data/genotypes.xlsx", dir.path())).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownExtension(_))));
}

#[test]
fn prepare_writes_estimator_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let args = standard_args(TEST_GENOTYPES, dir.path());
    prepare::run(args, true, Some(1234), String::from("family.out")).unwrap();

    assert_eq!("1 2 3\n0123\n1130\n2110\n", read_output(dir.path(), "genotypes.dat"));
    assert_eq!(read_output(dir.path(), "placeholder_key.csv"), std::fs::read_to_string(common::TEST_KEY).unwrap());

    let control = ControlRecord::parse(&read_output(dir.path(), "relatedness.par")).unwrap();
    assert_eq!(3, control.n_individuals);
    assert_eq!(4, control.n_loci);
    assert!(control.inbreeding);
    assert_eq!("family.out", control.output_file);
    assert_eq!(1234, control.seed);
}

#[test]
fn prepare_rejects_bad_report_name() {
    let dir = tempfile::tempdir().unwrap();
    let args = standard_args(TEST_GENOTYPES, dir.path());
    let err = prepare::run(args, false, Some(1), String::from("my report.out")).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Configuration(_))));
    assert!(!dir.path().join("relatedness.par").exists());
}
