use super::evaluate::build_force_field;
use crate::core::forcefield::params::SystemParams;
use crate::engine::config::ValidationConfig;
use crate::engine::error::EngineError;
use crate::engine::validation::{self, ValidationReport};
use tracing::{instrument, warn};

/// Checks the analytic derivatives of the system described by `params`
/// against finite differences and the translation invariants.
#[instrument(skip_all, name = "validate_workflow")]
pub fn validate(
    params: &SystemParams,
    config: &ValidationConfig,
) -> Result<ValidationReport, EngineError> {
    config.check()?;
    let mut ff = build_force_field(params)?;
    let report = validation::validate(&mut ff, config)?;
    if !report.passes(config) {
        warn!(
            gradient_error = report.gradient_error,
            hessian_error = report.hessian_error,
            row_sum_error = report.row_sum_error,
            asymmetry = report.asymmetry,
            translation_error = report.translation_error,
            "Derivative validation failed."
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::ParameterError;

    const SYSTEM: &str = r#"
        coordinates = [
            [0.0, 0.0, 0.0],
            [1.4, 0.2, -0.3],
            [-0.2, 1.3, 0.5],
            [0.9, -0.7, 1.1],
        ]

        [mask]
        exclude = [[0, 3]]
        scale = [{ pair = [1, 2], weight = 0.5 }]

        [coulomb]
        charges = [0.4, -0.6, 0.1, 0.1]
        dipoles = [[0.1, 0.0, 0.2], [0.0, -0.3, 0.1], [0.2, 0.2, 0.0], [-0.1, 0.1, 0.3]]

        [dispersion]
        uniform = -0.5

        [pauli]
        uniform = 0.02
    "#;

    #[test]
    fn full_system_passes_validation() {
        let params = SystemParams::from_toml_str(SYSTEM).unwrap();
        let config = ValidationConfig::default();
        let report = validate(&params, &config).unwrap();
        assert!(report.passes(&config), "{report:?}");
    }

    #[test]
    fn strict_tolerances_are_reported_as_failures() {
        let params = SystemParams::from_toml_str(SYSTEM).unwrap();
        let config = ValidationConfig {
            step: 1e-2,
            gradient_tolerance: 1e-12,
            ..Default::default()
        };
        let report = validate(&params, &config).unwrap();
        assert!(!report.passes(&config));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let params = SystemParams::from_toml_str(SYSTEM).unwrap();
        let config = ValidationConfig {
            step: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            validate(&params, &config),
            Err(EngineError::Parameter {
                source: ParameterError::InvalidValue { .. }
            })
        ));
    }
}
