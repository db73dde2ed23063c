use std::path::Path;

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};

use crate::args::GraphArgs;
use crate::estimator::{PlaceholderMap, RawReportTable, RelatednessMatrix};
use crate::graphs::Heatmap;
use crate::io::{push_to_output, write_pair_table, write_relatedness_matrix};

/// Run the estimator on a genotype file
pub mod estimate;

/// Write estimator inputs for a manual run
pub mod prepare;

/// Read back a report from an earlier run
pub mod parse_report;

/// Optional matrix outputs shared by `estimate` and `parse-report`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixOutputs {
    pub plot: bool,
    pub npy: bool,
    pub mirror: bool,
}

#[doc(hidden)]
pub fn write_matrix_outputs(
    matrix: &RelatednessMatrix,
    table: &RawReportTable,
    placeholders: &PlaceholderMap,
    output: &Path,
    prefix: &Option<String>,
    outputs: MatrixOutputs,
    graph_args: GraphArgs,
) -> Result<()> {
    let mut matrix_output = output.to_path_buf();
    push_to_output(prefix, &mut matrix_output, "relatedness_matrix", "csv");
    write_relatedness_matrix(matrix_output.to_path_buf(), matrix)?;
    tracing::info!("Relatedness matrix output: {matrix_output:?}");

    let mut pairs_output = output.to_path_buf();
    push_to_output(prefix, &mut pairs_output, "relatedness_pairs", "csv");
    write_pair_table(pairs_output, table, placeholders)?;

    if outputs.mirror {
        let mut mirrored_output = output.to_path_buf();
        push_to_output(prefix, &mut mirrored_output, "relatedness_matrix_mirrored", "csv");
        write_relatedness_matrix(mirrored_output, &matrix.mirrored())?;
    }

    if outputs.npy {
        let mut npy_output = output.to_path_buf();
        push_to_output(prefix, &mut npy_output, "relatedness_matrix", "npy");
        ndarray_npy::write_npy(&npy_output, matrix.values())
            .wrap_err(eyre!("Failed writing to {npy_output:?}"))?;
    }

    if outputs.plot {
        let mut img_output = output.to_path_buf();
        push_to_output(prefix, &mut img_output, "relatedness_heatmap", "svg");
        let mut graph = Heatmap::new(matrix, graph_args);
        graph.draw_graph();
        graph.save(&img_output)?;
        tracing::info!("Heatmap output: {img_output:?}");
    }

    Ok(())
}
