use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::OffsetTime;

use crate::args::{EstimatorArgs, GraphArgs, StandardArgs};
use crate::estimator::{ReportFormat, DEFAULT_REPORT_FILE};
use crate::subcommands::{estimate, parse_report, prepare};

#[derive(Parser, Debug)]
#[command(author, version, about, styles=get_styles())]
pub struct Arguments {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Args, Debug, Clone)]
pub struct LogAndVerbosity {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, default_value_t = 3)]
    pub verbosity: u8,

    /// A file path to save logs to
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// Silence all warning and info messages
    #[arg(long)]
    pub silent: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MatrixOutputs {
    /// Draw the relatedness matrix as an .svg heatmap
    #[arg(long)]
    pub plot: bool,

    /// Also write the relatedness matrix as a .npy array
    #[arg(long)]
    pub npy: bool,

    /// Also write a matrix where unreported cells take the value of the transposed cell
    #[arg(long)]
    pub mirror: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Estimate pairwise relatedness by running the external estimator
    Estimate {
        #[command(flatten)]
        args: StandardArgs,

        #[command(flatten)]
        estimator: EstimatorArgs,

        #[command(flatten)]
        outputs: MatrixOutputs,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Write the estimator input files without running the estimator
    Prepare {
        #[command(flatten)]
        args: StandardArgs,

        /// Allow inbreeding in the estimation
        #[arg(long)]
        inbreeding: bool,

        /// Random seed for the estimator [default: random]
        #[arg(long)]
        seed: Option<u64>,

        /// File name the estimator should write its report to
        #[arg(long, default_value_t = String::from(DEFAULT_REPORT_FILE))]
        report_name: String,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Build the relatedness matrix from an existing estimator report
    ParseReport {
        /// Estimator report
        report: PathBuf,

        /// Placeholder key written by `estimate` or `prepare`
        #[arg(short = 'k', long)]
        key: PathBuf,

        /// Output directory
        #[arg(short = 'o', long = "outdir", default_value_os_t = PathBuf::from("./"), value_hint = clap::ValueHint::DirPath)]
        output: PathBuf,

        /// Output filename prefix
        #[arg(short = 'p', long)]
        prefix: Option<String>,

        /// Layout version of the estimator report
        #[arg(long, value_enum, default_value_t = ReportFormat::V1)]
        report_format: ReportFormat,

        #[command(flatten)]
        outputs: MatrixOutputs,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },
}

impl SubCommand {
    #[rustfmt::skip]
    pub fn log_and_verbosity(&self) -> (u8, &Option<PathBuf>, bool) {
        match self {
            SubCommand::Estimate { log_and_verbosity, .. }
            | SubCommand::Prepare { log_and_verbosity, .. }
            | SubCommand::ParseReport { log_and_verbosity, .. }
            => (log_and_verbosity.verbosity, &log_and_verbosity.log_file, log_and_verbosity.silent)
        }
    }

    #[rustfmt::skip]
    pub fn output(&self) -> Option<PathBuf> {
        match self {
            SubCommand::Estimate { args: StandardArgs { output, .. }, ..}
            | SubCommand::Prepare { args: StandardArgs { output, .. }, ..}
            | SubCommand::ParseReport { output, .. }
            => Some(output.clone()),
        }
    }
}

pub fn run_args(args: Arguments) -> Result<()> {
    let (verbosity, log_file, is_silent) = args.cmd.log_and_verbosity();

    let (level, wrtr, _guard) = init_tracing(verbosity, log_file, is_silent)?;

    let timer = time::format_description::parse("[hour]:[minute]:[second].[subsecond digits:3]")?;
    let time_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(time_offset, timer);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(wrtr)
        .with_timer(timer)
        .init();

    if let Some(output) = args.cmd.output() {
        if let Err(e) = std::fs::create_dir_all(output.clone()) {
            match e.kind() {
                std::io::ErrorKind::AlreadyExists => (),
                _ => return Err(eyre!("Error creating directory {output:?}")),
            }
        }
    }

    run_cmd(args.cmd)?;

    Ok(())
}

#[rustfmt::skip]
pub fn run_cmd(cmd: SubCommand) -> Result<()> {
    match cmd {
        SubCommand::Estimate { args, estimator, outputs, graph_args, .. }
            => estimate::run(args, estimator, outputs.into(), graph_args)?,

        SubCommand::Prepare { args, inbreeding, seed, report_name, .. }
            => prepare::run(args, inbreeding, seed, report_name)?,

        SubCommand::ParseReport { report, key, output, prefix, report_format, outputs, graph_args, .. }
            => parse_report::run(report, key, output, prefix, report_format, outputs.into(), graph_args)?,
    };
    Ok(())
}

impl From<MatrixOutputs> for crate::subcommands::MatrixOutputs {
    fn from(outputs: MatrixOutputs) -> Self {
        Self {
            plot: outputs.plot,
            npy: outputs.npy,
            mirror: outputs.mirror,
        }
    }
}

pub fn init_tracing(
    verbosity: u8,
    log_file: &Option<PathBuf>,
    is_silent: bool,
) -> Result<(Level, NonBlocking, WorkerGuard)> {
    let level = if is_silent {
        Level::ERROR
    } else {
        match verbosity {
            0 | 1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            5..=u8::MAX => Level::TRACE,
        }
    };

    // Write logs to stderr or file
    let (wrtr, _guard) = match log_file {
        Some(path) => {
            let file = std::fs::File::options()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    Ok((level, wrtr, _guard))
}

pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing() {
        let (level, _, _) = init_tracing(1, &None, false).unwrap();
        assert_eq!(Level::ERROR, level);
        let (level, _, _) = init_tracing(2, &None, false).unwrap();
        assert_eq!(Level::WARN, level);
        let (level, _, _) = init_tracing(3, &None, false).unwrap();
        assert_eq!(Level::INFO, level);
        let (level, _, _) = init_tracing(4, &None, false).unwrap();
        assert_eq!(Level::DEBUG, level);
        let (level, _, _) = init_tracing(5, &None, false).unwrap();
        assert_eq!(Level::TRACE, level);
        let (level, _, _) = init_tracing(5, &None, true).unwrap();
        assert_eq!(Level::ERROR, level);
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Arguments::try_parse_from([
            "reltk", "estimate", "genotypes.csv", "-i", "/opt/estimator", "--seed", "7", "--timeout", "60", "--mirror",
        ])
        .unwrap();

        match args.cmd {
            SubCommand::Estimate { args, estimator, outputs, log_and_verbosity, .. } => {
                assert_eq!(PathBuf::from("genotypes.csv"), args.file);
                assert_eq!("NA", args.missing);
                assert_eq!(PathBuf::from("/opt/estimator"), estimator.install_dir);
                assert_eq!(Some(7), estimator.seed);
                assert_eq!(Some(60), estimator.timeout);
                assert_eq!("relatedness.out", estimator.report_name);
                assert!(outputs.mirror);
                assert!(!outputs.plot);
                assert_eq!(3, log_and_verbosity.verbosity);
            }
            _ => panic!("expected the estimate subcommand"),
        }

        let args = Arguments::try_parse_from([
            "reltk", "parse-report", "relatedness.out", "-k", "placeholder_key.csv", "-o", "results",
        ])
        .unwrap();
        assert_eq!(Some(PathBuf::from("results")), args.cmd.output());

        assert!(Arguments::try_parse_from(["reltk", "estimate", "genotypes.csv"]).is_err());
    }
}
