use super::params::ParameterError;
use super::potentials::{PairPotential, check_square, check_symmetric, inverse_power};
use super::term::{PairTerm, TermKind};
use crate::core::geometry::PairGeometry;
use nalgebra::DMatrix;

const PAULI_EXPONENT: i32 = 12;

/// Pauli repulsion, `A_ij r^-12` per pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Pauli {
    strengths: DMatrix<f64>,
}

impl Pauli {
    pub fn new(strengths: DMatrix<f64>) -> Self {
        Self { strengths }
    }

    pub fn strengths(&self) -> &DMatrix<f64> {
        &self.strengths
    }
}

impl PairPotential for Pauli {
    fn name(&self) -> &'static str {
        "pauli"
    }

    fn validate(&self, atom_count: usize) -> Result<(), ParameterError> {
        check_square("strengths", atom_count, &self.strengths)?;
        check_symmetric(self.name(), &self.strengths);
        Ok(())
    }

    fn pair_terms(&self, pair: &PairGeometry) -> Vec<PairTerm> {
        let strength = self.strengths[(pair.index1, pair.index2)];
        vec![PairTerm::isotropic(
            TermKind::Pauli,
            inverse_power(strength, PAULI_EXPONENT, pair.distance),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::GeometryCache;
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn pair_term_at_unit_distance_carries_the_bare_prefactors() {
        let cache = GeometryCache::new(&[Point3::origin(), Point3::new(0.0, 0.0, 1.0)]);
        let pauli = Pauli::new(DMatrix::from_element(2, 2, 2.0));
        let terms = pauli.pair_terms(&cache.pair(1, 0));
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].kind, TermKind::Pauli);
        assert!((terms[0].radial.value - 2.0).abs() < TOLERANCE);
        assert!((terms[0].radial.first + 24.0).abs() < TOLERANCE);
        assert!((terms[0].radial.second - 312.0).abs() < TOLERANCE);
    }

    #[test]
    fn repulsion_decays_with_the_twelfth_power() {
        let near = GeometryCache::new(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        let far = GeometryCache::new(&[Point3::origin(), Point3::new(2.0, 0.0, 0.0)]);
        let pauli = Pauli::new(DMatrix::from_element(2, 2, 1.0));
        let ratio = pauli.pair_terms(&near.pair(0, 1))[0].energy()
            / pauli.pair_terms(&far.pair(0, 1))[0].energy();
        assert!((ratio - 4096.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_strengths_of_the_wrong_shape() {
        let pauli = Pauli::new(DMatrix::zeros(3, 2));
        assert!(pauli.validate(3).is_err());
    }

    #[test]
    fn validate_accepts_asymmetric_strengths() {
        let mut strengths = DMatrix::from_element(2, 2, 0.1);
        strengths[(1, 0)] = 0.3;
        assert!(Pauli::new(strengths).validate(2).is_ok());
    }
}
