// RELTK - Relatedness estimation toolkit
// Copyright (C) 2022  Osma S. Rautila
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
//
//

//! RELTK - Relatedness estimation toolkit
//!
//! This library and program estimate pairwise relatedness between samples by running an
//! external relatedness estimator on their genotypes and reading its report back into a
//! labeled relatedness matrix.
//!
//! The estimator itself is not part of this crate. Its executable (and on Windows its
//! runtime libraries) must be installed in a directory passed with `--install-dir`.
//!
//! RELTK toolkit commands
//!
//! * Estimate a relatedness matrix from a CSV, TSV or VCF genotype file
//! * Prepare the estimator input files for a manual run
//! * Parse an existing estimator report into a relatedness matrix
//!
//! # Getting started
//!
//! ## Installing RELTK
//!
//! Rust and its package manager cargo can be installed following the instruction for [rustup](https://rustup.rs/).
//!
//! After installing cargo, run the following command
//!
//! ```bash
//! cargo install reltk
//! ```
//!
//! ## Running RELTK
//!
//! To print the available commands use:
//! ```bash
//! reltk --help
//! ```
//! To estimate relatedness between the samples of a VCF region use:
//! ```bash
//! reltk estimate $file -c chr9:27573534-27673534 -i $estimator_dir -o $outdir --plot
//! ```
//!
//! To run the estimator by hand (for example on a cluster) and read its report afterwards:
//! ```bash
//!reltk prepare $file -o $rundir --seed 42
//!
//!(cd $rundir && ./relatedness_linux relatedness.par)
//!
//!reltk parse-report $rundir/relatedness.out -k $rundir/placeholder_key.csv -o $outdir
//!```
//!

#[doc(hidden)]
pub mod args;

#[doc(hidden)]
pub mod io;

/// Functions for reading vcfs into genotype matrices
pub mod read_vcf;

/// RELTK structs
pub mod structs;

#[doc(hidden)]
pub mod utils;

#[doc(hidden)]
pub mod error;

#[cfg(feature = "clap")]
pub mod clap;
