use super::config::ValidationConfig;
use super::error::EngineError;
use super::evaluator::ForceField;
use super::hessian::HessianBlocks;
use itertools::iproduct;
use nalgebra::{DMatrix, Matrix3, Point3, Vector3};
use tracing::{debug, info, instrument};

const TRANSLATION_SHIFT: Vector3<f64> = Vector3::new(0.37, -1.21, 0.53);

/// Largest deviations between analytic derivatives and their finite-difference
/// estimates, together with the translation-invariance residuals.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub energy: f64,
    /// Largest gradient deviation, relative to `1 + max |analytic|`.
    pub gradient_error: f64,
    /// Largest Hessian deviation, relative to `1 + max |analytic|`.
    pub hessian_error: f64,
    pub row_sum_error: f64,
    pub asymmetry: f64,
    /// Norm of the summed gradient; zero for a translation-invariant energy.
    pub gradient_sum: f64,
    /// Energy change under a rigid translation of every atom.
    pub translation_error: f64,
}

impl ValidationReport {
    pub fn passes(&self, config: &ValidationConfig) -> bool {
        self.gradient_error <= config.gradient_tolerance
            && self.hessian_error <= config.hessian_tolerance
            && self.row_sum_error <= config.invariant_tolerance
            && self.asymmetry <= config.invariant_tolerance
            && self.gradient_sum <= config.invariant_tolerance
            && self.translation_error <= config.invariant_tolerance
    }
}

/// Runs `f` with atom `atom`'s coordinate `axis` displaced by `shift`,
/// then restores the original coordinates.
fn displaced<F, T>(
    ff: &mut F,
    atom: usize,
    axis: usize,
    shift: f64,
    f: impl Fn(&F) -> Result<T, EngineError>,
) -> Result<T, EngineError>
where
    F: ForceField + ?Sized,
{
    let original: Vec<Point3<f64>> = ff
        .coordinates()
        .ok_or(EngineError::MissingCoordinates("validation"))?
        .to_vec();
    let mut moved = original.clone();
    moved[atom][axis] += shift;
    ff.update_coordinates(Some(moved))?;
    let result = f(ff);
    ff.update_coordinates(Some(original))?;
    result
}

/// Central-difference gradient from energies.
pub fn numerical_gradient<F>(ff: &mut F, step: f64) -> Result<Vec<Vector3<f64>>, EngineError>
where
    F: ForceField + ?Sized,
{
    let mut gradient = vec![Vector3::zeros(); ff.atom_count()];
    for (atom, axis) in iproduct!(0..ff.atom_count(), 0..3) {
        let plus = displaced(ff, atom, axis, step, |ff| ff.energy())?;
        let minus = displaced(ff, atom, axis, -step, |ff| ff.energy())?;
        gradient[atom][axis] = (plus - minus) / (2.0 * step);
    }
    Ok(gradient)
}

/// Central-difference Hessian from analytic gradients. Column `(atom, axis)`
/// of the result is the derivative of the gradient along that coordinate.
pub fn numerical_hessian<F>(ff: &mut F, step: f64) -> Result<HessianBlocks, EngineError>
where
    F: ForceField + ?Sized,
{
    let n = ff.atom_count();
    let mut hessian = HessianBlocks::zeros(n);
    for (atom, axis) in iproduct!(0..n, 0..3) {
        let plus = displaced(ff, atom, axis, step, |ff| ff.gradient())?;
        let minus = displaced(ff, atom, axis, -step, |ff| ff.gradient())?;
        for (row_atom, (p, m)) in plus.iter().zip(&minus).enumerate() {
            let column = (p - m) / (2.0 * step);
            hessian.block_mut(row_atom, atom).set_column(axis, &column);
        }
    }
    Ok(hessian)
}

/// Largest entry of any block-row sum `sum_j H_ij`.
pub fn hessian_row_sum_residual(hessian: &HessianBlocks) -> f64 {
    let n = hessian.atom_count();
    (0..n)
        .map(|i| {
            (0..n)
                .fold(Matrix3::zeros(), |acc, j| acc + hessian.block(i, j))
                .amax()
        })
        .fold(0.0, f64::max)
}

pub fn hessian_asymmetry(hessian: &HessianBlocks) -> f64 {
    let flat = hessian.to_flat();
    max_abs_entry(&(&flat - flat.transpose()))
}

pub fn gradient_sum_residual(gradient: &[Vector3<f64>]) -> f64 {
    gradient.iter().sum::<Vector3<f64>>().norm()
}

/// `|E(x + shift) - E(x)|`, with the coordinates restored afterwards.
pub fn translation_residual<F>(ff: &mut F, shift: &Vector3<f64>) -> Result<f64, EngineError>
where
    F: ForceField + ?Sized,
{
    let original: Vec<Point3<f64>> = ff
        .coordinates()
        .ok_or(EngineError::MissingCoordinates("validation"))?
        .to_vec();
    let reference = ff.energy()?;
    ff.update_coordinates(Some(original.iter().map(|p| p + shift).collect()))?;
    let shifted = ff.energy();
    ff.update_coordinates(Some(original))?;
    Ok((shifted? - reference).abs())
}

fn max_abs_entry(matrix: &DMatrix<f64>) -> f64 {
    matrix.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

fn relative_error(analytic_max: f64, deviation: f64) -> f64 {
    deviation / (1.0 + analytic_max)
}

/// Compares the analytic gradient and Hessian of `ff` at its current
/// coordinates against central differences.
#[instrument(skip_all, name = "validate_derivatives", fields(ff = %ff.name()))]
pub fn validate<F>(ff: &mut F, config: &ValidationConfig) -> Result<ValidationReport, EngineError>
where
    F: ForceField + ?Sized,
{
    config.check()?;
    let energy = ff.energy()?;
    let gradient = ff.gradient()?;
    let hessian = ff.hessian()?;

    let numeric_gradient = numerical_gradient(ff, config.step)?;
    let gradient_deviation = gradient
        .iter()
        .zip(&numeric_gradient)
        .map(|(a, b)| (a - b).amax())
        .fold(0.0, f64::max);
    let gradient_scale = gradient.iter().map(|g| g.amax()).fold(0.0, f64::max);
    debug!(gradient_deviation, "Gradient compared.");

    let numeric_hessian = numerical_hessian(ff, config.step)?;
    let hessian_deviation = max_abs_entry(&(hessian.to_flat() - numeric_hessian.to_flat()));
    debug!(hessian_deviation, "Hessian compared.");

    let report = ValidationReport {
        energy,
        gradient_error: relative_error(gradient_scale, gradient_deviation),
        hessian_error: relative_error(hessian.max_abs(), hessian_deviation),
        row_sum_error: hessian_row_sum_residual(&hessian),
        asymmetry: hessian_asymmetry(&hessian),
        gradient_sum: gradient_sum_residual(&gradient),
        translation_error: translation_residual(ff, &TRANSLATION_SHIFT)?,
    };
    info!(
        energy = report.energy,
        gradient_error = report.gradient_error,
        hessian_error = report.hessian_error,
        passed = report.passes(config),
        "Derivative validation complete."
    );
    Ok(report)
}
