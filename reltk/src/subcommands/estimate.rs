use std::path::PathBuf;
use std::time::Instant;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use serde::Serialize;

use super::{write_matrix_outputs, MatrixOutputs};
use crate::args::{EstimatorArgs, GraphArgs, StandardArgs};
use crate::estimator::{estimate_relatedness, ControlRecord, RelatednessResult};
use crate::io::{get_output, push_to_output, read_genotypes, write_placeholder_key};

/// Written next to the matrix so a run can be traced back to its inputs
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub scratch_dir: PathBuf,
    pub samples: usize,
    pub loci: usize,
    pub missing_genotypes: usize,
    pub pairs: usize,
    pub unset_cells: usize,
    pub control: ControlRecord,
}

#[doc(hidden)]
pub fn run(
    args: StandardArgs,
    estimator: EstimatorArgs,
    outputs: MatrixOutputs,
    graph_args: GraphArgs,
) -> Result<()> {
    let config = estimator.config(&args.output);
    let genotypes = read_genotypes(&args)?;

    let now = Instant::now();
    let RelatednessResult {
        matrix,
        table,
        placeholders,
        control,
    } = estimate_relatedness(&genotypes, &config)?;
    tracing::info!("Estimation finished in {:?}", now.elapsed());

    let mut key_output = args.output.clone();
    push_to_output(&args.prefix, &mut key_output, "placeholder_key", "csv");
    write_placeholder_key(key_output, &placeholders)?;

    write_matrix_outputs(
        &matrix,
        &table,
        &placeholders,
        &args.output,
        &args.prefix,
        outputs,
        graph_args,
    )?;

    let summary = RunSummary {
        input: args.file.clone(),
        scratch_dir: config.scratch_dir.clone(),
        samples: genotypes.nsamples(),
        loci: genotypes.nloci(),
        missing_genotypes: genotypes.nmissing(),
        pairs: table.len(),
        unset_cells: matrix.nunset(),
        control,
    };

    let mut summary_output = args.output.clone();
    push_to_output(&args.prefix, &mut summary_output, "run_summary", "json");
    let writer = get_output(Some(summary_output.clone()))?;
    serde_json::to_writer_pretty(writer, &summary)
        .wrap_err(eyre!("Failed writing to {summary_output:?}"))?;

    Ok(())
}
