mod common;

use std::path::PathBuf;

use reltk::{
    args::GraphArgs,
    estimator::{assemble_matrix, read_report, ReportFormat},
    io::read_placeholder_key,
    subcommands::{parse_report, MatrixOutputs},
};

use crate::common::{read_output, CHILD, FATHER, MOTHER, TEST_KEY, TEST_REPORT};

#[test]
fn report_fixture_into_matrix() {
    let table = read_report(&PathBuf::from(TEST_REPORT), ReportFormat::V1).unwrap();
    let placeholders = read_placeholder_key(PathBuf::from(TEST_KEY)).unwrap();
    let matrix = assemble_matrix(&table, &placeholders).unwrap();

    assert_eq!(3, table.len());
    assert_eq!(Some("0.0625"), table.coefficient(&table.records()[1], "Theta"));
    assert_eq!(Some(0.5), matrix.get(MOTHER, FATHER));
    assert_eq!(Some(-0.0312), matrix.get(FATHER, CHILD));
    assert_eq!(None, matrix.get(CHILD, MOTHER));
}

#[test]
fn parse_report_pairs() {
    let output = tempfile::tempdir().unwrap();
    parse_report::run(
        PathBuf::from(TEST_REPORT),
        PathBuf::from(TEST_KEY),
        output.path().to_path_buf(),
        None,
        ReportFormat::V1,
        MatrixOutputs::default(),
        GraphArgs::default(),
    )
    .unwrap();

    assert!(!output.path().join("relatedness_heatmap.svg").exists());
    assert!(!output.path().join("relatedness_matrix_mirrored.csv").exists());

    let res = read_output(output.path(), "relatedness_pairs.csv");
    insta::assert_snapshot!(res);
}

#[test]
fn key_that_does_not_cover_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("key.csv");
    std::fs::write(&key, "placeholder,sample\n1,A\n2,B\n").unwrap();

    let res = parse_report::run(
        PathBuf::from(TEST_REPORT),
        key,
        dir.path().to_path_buf(),
        None,
        ReportFormat::V1,
        MatrixOutputs::default(),
        GraphArgs::default(),
    );
    let err = res.unwrap_err();
    assert!(matches!(err.downcast_ref::<reltk::error::Error>(), Some(reltk::error::Error::Index { .. })));
}

#[test]
#[cfg(feature = "clap")]
fn parse_report_command() {
    let output = tempfile::tempdir().unwrap();
    let cmd = reltk::clap::SubCommand::ParseReport {
        report: PathBuf::from(TEST_REPORT),
        key: PathBuf::from(TEST_KEY),
        output: output.path().to_path_buf(),
        prefix: Some(String::from("cli")),
        report_format: ReportFormat::V1,
        outputs: reltk::clap::MatrixOutputs { plot: false, npy: false, mirror: true },
        graph_args: GraphArgs::default(),
        log_and_verbosity: common::silent_verbosity(),
    };
    reltk::clap::run_cmd(cmd).unwrap();

    let mirrored = read_output(output.path(), "cli_relatedness_matrix_mirrored.csv");
    assert!(mirrored.contains(&format!("{CHILD},0.125,-0.0312,NA")));
}
