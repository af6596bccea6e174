use super::params::ParameterError;
use super::term::{PairTerm, RadialFactor};
use crate::core::geometry::PairGeometry;
use nalgebra::DMatrix;
use tracing::warn;

/// A pairwise potential written as `E = sum_{i<j} sum_k s_k(r_ij) v_k(r_ij)`.
///
/// Implementations enumerate the terms of one ordered pair. The accumulation
/// engine applies the same product-rule identities to every term, so a
/// potential never differentiates anything beyond its own `s` and `v`.
pub trait PairPotential: Send + Sync {
    fn name(&self) -> &'static str;

    /// Checks that the per-atom parameters fit a system of `atom_count` atoms.
    fn validate(&self, atom_count: usize) -> Result<(), ParameterError>;

    fn pair_terms(&self, pair: &PairGeometry) -> Vec<PairTerm>;
}

/// `s(r) = c r^-n` together with its first two derivatives.
#[inline]
pub fn inverse_power(coefficient: f64, exponent: i32, distance: f64) -> RadialFactor {
    let n = f64::from(exponent);
    let inverse = distance.recip();
    let value = coefficient * inverse.powi(exponent);
    RadialFactor {
        value,
        first: -n * value * inverse,
        second: n * (n + 1.0) * value * inverse * inverse,
    }
}

pub(crate) fn check_length(
    what: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), ParameterError> {
    if expected == found {
        Ok(())
    } else {
        Err(ParameterError::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}

pub(crate) fn check_square(
    what: &'static str,
    atom_count: usize,
    matrix: &DMatrix<f64>,
) -> Result<(), ParameterError> {
    check_length(what, atom_count, matrix.nrows())?;
    check_length(what, atom_count, matrix.ncols())
}

/// Returns whether `strengths` is symmetric, warning when it is not.
/// An asymmetric matrix is still accepted.
pub(crate) fn check_symmetric(potential: &'static str, strengths: &DMatrix<f64>) -> bool {
    let symmetric = *strengths == strengths.transpose();
    if !symmetric {
        warn!(
            potential,
            "Strength matrix is not symmetric; pair (i, j) uses the value stored at row i."
        );
    }
    symmetric
}
