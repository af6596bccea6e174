use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "pairff - energies, analytic gradients and analytic Hessians of pairwise non-bonded force fields.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the energy of a system and, on request, its gradient and Hessian.
    Evaluate(EvaluateArgs),
    /// Check the analytic derivatives of a system against finite differences.
    Check(CheckArgs),
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the TOML system description.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub system: PathBuf,

    /// Also print the gradient, one row of three components per atom.
    #[arg(short, long)]
    pub gradient: bool,

    /// Also print the flattened 3N x 3N Hessian.
    #[arg(long)]
    pub hessian: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the TOML system description.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub system: PathBuf,

    /// Central-difference step.
    #[arg(long, value_name = "FLOAT")]
    pub step: Option<f64>,

    /// Largest accepted relative gradient deviation.
    #[arg(long, value_name = "FLOAT")]
    pub gradient_tolerance: Option<f64>,

    /// Largest accepted relative Hessian deviation.
    #[arg(long, value_name = "FLOAT")]
    pub hessian_tolerance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluate_parses_flags_and_global_options() {
        let cli = Cli::try_parse_from([
            "pairff", "-vv", "-j", "4", "evaluate", "--system", "water.toml", "--gradient",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.system, PathBuf::from("water.toml"));
                assert!(args.gradient);
                assert!(!args.hessian);
            }
            _ => panic!("expected the evaluate subcommand"),
        }
    }

    #[test]
    fn check_parses_tolerance_overrides() {
        let cli = Cli::try_parse_from([
            "pairff",
            "check",
            "-s",
            "dimer.toml",
            "--step",
            "1e-4",
            "--hessian-tolerance",
            "1e-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.step, Some(1e-4));
                assert_eq!(args.gradient_tolerance, None);
                assert_eq!(args.hessian_tolerance, Some(1e-3));
            }
            _ => panic!("expected the check subcommand"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pairff", "-q", "-v", "check", "-s", "a.toml"]).is_err());
    }

    #[test]
    fn system_is_required() {
        assert!(Cli::try_parse_from(["pairff", "evaluate"]).is_err());
    }
}
