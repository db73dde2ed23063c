use std::path::PathBuf;

use color_eyre::Result;

use super::{write_matrix_outputs, MatrixOutputs};
use crate::args::GraphArgs;
use crate::estimator::{assemble_matrix, read_report, ReportFormat};
use crate::io::read_placeholder_key;

#[doc(hidden)]
pub fn run(
    report: PathBuf,
    key: PathBuf,
    output: PathBuf,
    prefix: Option<String>,
    format: ReportFormat,
    outputs: MatrixOutputs,
    graph_args: GraphArgs,
) -> Result<()> {
    let placeholders = read_placeholder_key(key)?;
    tracing::info!("Read a placeholder key of {} samples", placeholders.len());

    let table = read_report(&report, format)?;
    let matrix = assemble_matrix(&table, &placeholders)?;

    write_matrix_outputs(
        &matrix,
        &table,
        &placeholders,
        &output,
        &prefix,
        outputs,
        graph_args,
    )
}
