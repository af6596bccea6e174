use crate::cli::CheckArgs;
use crate::error::{CliError, Result};
use pairff::core::forcefield::params::SystemParams;
use pairff::engine::config::ValidationConfig;
use pairff::engine::validation::ValidationReport;
use pairff::workflows::validate;
use tracing::info;

pub fn config_from_args(args: &CheckArgs) -> ValidationConfig {
    let defaults = ValidationConfig::default();
    ValidationConfig {
        step: args.step.unwrap_or(defaults.step),
        gradient_tolerance: args
            .gradient_tolerance
            .unwrap_or(defaults.gradient_tolerance),
        hessian_tolerance: args.hessian_tolerance.unwrap_or(defaults.hessian_tolerance),
        invariant_tolerance: defaults.invariant_tolerance,
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Loading system description from {:?}", &args.system);
    let params = SystemParams::load(&args.system)?;
    let config = config_from_args(&args);

    let report = validate::validate(&params, &config)?;
    print!("{}", render(&report, &config));

    if report.passes(&config) {
        Ok(())
    } else {
        Err(CliError::ValidationFailed(args.system.display().to_string()))
    }
}

fn verdict(value: f64, tolerance: f64) -> &'static str {
    if value <= tolerance { "ok" } else { "FAIL" }
}

pub fn render(report: &ValidationReport, config: &ValidationConfig) -> String {
    let rows = [
        ("gradient error", report.gradient_error, config.gradient_tolerance),
        ("hessian error", report.hessian_error, config.hessian_tolerance),
        ("row sum", report.row_sum_error, config.invariant_tolerance),
        ("asymmetry", report.asymmetry, config.invariant_tolerance),
        ("gradient sum", report.gradient_sum, config.invariant_tolerance),
        ("translation", report.translation_error, config.invariant_tolerance),
    ];
    let mut out = format!("energy          {:>14.6e}\n", report.energy);
    for (name, value, tolerance) in rows {
        out.push_str(&format!(
            "{name:<15} {value:>14.6e}  (tolerance {tolerance:.1e})  {}\n",
            verdict(value, tolerance)
        ));
    }
    out
}
