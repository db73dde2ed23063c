use color_eyre::Result;

use crate::args::StandardArgs;
use crate::estimator::{prepare_input, resolve_seed, CONTROL_FILE};
use crate::io::{push_to_output, read_genotypes, write_placeholder_key};

#[doc(hidden)]
pub fn run(
    args: StandardArgs,
    inbreeding: bool,
    seed: Option<u64>,
    report_name: String,
) -> Result<()> {
    let genotypes = read_genotypes(&args)?;

    let input = prepare_input(&genotypes, &report_name, inbreeding, resolve_seed(seed))?;
    input.write(&args.output)?;

    let mut key_output = args.output.clone();
    push_to_output(&args.prefix, &mut key_output, "placeholder_key", "csv");
    write_placeholder_key(key_output.clone(), &input.placeholders)?;

    tracing::info!(
        "Estimator inputs written to {:?}. Run the estimator there with {CONTROL_FILE} and pass the report and {key_output:?} to parse-report.",
        args.output
    );

    Ok(())
}
