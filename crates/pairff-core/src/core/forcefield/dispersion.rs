use super::params::ParameterError;
use super::potentials::{PairPotential, check_square, check_symmetric, inverse_power};
use super::term::{PairTerm, TermKind};
use crate::core::geometry::PairGeometry;
use nalgebra::DMatrix;

const DISPERSION_EXPONENT: i32 = 6;

/// London dispersion, `C_ij r^-6` per pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispersion {
    strengths: DMatrix<f64>,
}

impl Dispersion {
    /// `strengths` holds the symmetric coefficients `C_ij` in front of `r^-6`.
    pub fn new(strengths: DMatrix<f64>) -> Self {
        Self { strengths }
    }

    pub fn strengths(&self) -> &DMatrix<f64> {
        &self.strengths
    }
}

impl PairPotential for Dispersion {
    fn name(&self) -> &'static str {
        "dispersion"
    }

    fn validate(&self, atom_count: usize) -> Result<(), ParameterError> {
        check_square("strengths", atom_count, &self.strengths)?;
        check_symmetric(self.name(), &self.strengths);
        Ok(())
    }

    fn pair_terms(&self, pair: &PairGeometry) -> Vec<PairTerm> {
        let strength = self.strengths[(pair.index1, pair.index2)];
        vec![PairTerm::isotropic(
            TermKind::Dispersion,
            inverse_power(strength, DISPERSION_EXPONENT, pair.distance),
        )]
    }
}
