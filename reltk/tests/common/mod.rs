#![allow(dead_code)]
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reltk::args::StandardArgs;

pub const TEST_GENOTYPES: &str = "tests/data/genotypes.csv";
pub const TEST_VCF: &str = "tests/data/test.vcf";
pub const TEST_MULTIALLELIC: &str = "tests/data/multiallelic.vcf";
pub const TEST_REPORT: &str = "tests/data/report_v1.txt";
pub const TEST_KEY: &str = "tests/data/placeholder_key.csv";
pub const TEST_SAMPLES: &str = "tests/data/samples.txt";

pub const MOTHER: &str = "Family 1/Mother";
pub const FATHER: &str = "Family 1/Father";
pub const CHILD: &str = "child-with-a-very-long-identifier_0001";

/// Tests that write and execute a stand-in estimator take this lock
pub static ESTIMATOR_LOCK: Mutex<()> = Mutex::new(());

pub fn standard_args(file: &str, output: &Path) -> StandardArgs {
    StandardArgs {
        file: PathBuf::from(file),
        output: output.to_path_buf(),
        missing: String::from("NA"),
        ..Default::default()
    }
}

pub fn read_output(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

/// Install a shell script named like the Linux estimator executable.
/// `body` runs with the control file as `$1` inside the scratch directory.
#[cfg(unix)]
pub fn install_estimator(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("relatedness_linux");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Stand-in that copies the report fixture to the output file named in the control file
#[cfg(unix)]
pub fn install_copying_estimator(dir: &Path) -> PathBuf {
    let report = std::fs::canonicalize(TEST_REPORT).unwrap();
    install_estimator(
        dir,
        &format!("echo \"reading $1\"\nout=$(sed -n 6p \"$1\")\ncp '{}' \"$out\"", report.display()),
    )
}

#[cfg(feature = "clap")]
pub fn silent_verbosity() -> reltk::clap::LogAndVerbosity {
    reltk::clap::LogAndVerbosity {
        verbosity: 1,
        log_file: None,
        silent: false,
    }
}
