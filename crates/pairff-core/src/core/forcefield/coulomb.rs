use super::params::ParameterError;
use super::potentials::{PairPotential, check_length, inverse_power};
use super::term::{PairTerm, TermKind};
use crate::core::geometry::PairGeometry;
use nalgebra::{Matrix3, Vector3};

/// The electrostatic sources carried by the atoms.
///
/// Which terms a pair produces is fixed by the variant: charges alone give one
/// term, dipoles alone give two, and both together give five.
#[derive(Debug, Clone, PartialEq)]
pub enum ElectrostaticSources {
    Charges(Vec<f64>),
    Dipoles(Vec<Vector3<f64>>),
    ChargesAndDipoles {
        charges: Vec<f64>,
        dipoles: Vec<Vector3<f64>>,
    },
}

impl ElectrostaticSources {
    pub fn from_parts(
        charges: Option<Vec<f64>>,
        dipoles: Option<Vec<Vector3<f64>>>,
    ) -> Result<Self, ParameterError> {
        match (charges, dipoles) {
            (Some(charges), Some(dipoles)) => Ok(Self::ChargesAndDipoles { charges, dipoles }),
            (Some(charges), None) => Ok(Self::Charges(charges)),
            (None, Some(dipoles)) => Ok(Self::Dipoles(dipoles)),
            (None, None) => Err(ParameterError::MissingParameter("charges or dipoles")),
        }
    }

    pub fn charges(&self) -> Option<&[f64]> {
        match self {
            Self::Charges(charges) | Self::ChargesAndDipoles { charges, .. } => Some(charges),
            Self::Dipoles(_) => None,
        }
    }

    pub fn dipoles(&self) -> Option<&[Vector3<f64>]> {
        match self {
            Self::Dipoles(dipoles) | Self::ChargesAndDipoles { dipoles, .. } => Some(dipoles),
            Self::Charges(_) => None,
        }
    }
}

/// Electrostatics of point charges and point dipoles.
#[derive(Debug, Clone, PartialEq)]
pub struct Coulomb {
    sources: ElectrostaticSources,
}

impl Coulomb {
    pub fn new(sources: ElectrostaticSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &ElectrostaticSources {
        &self.sources
    }
}

fn charge_charge(q1: f64, q2: f64, r: f64) -> PairTerm {
    PairTerm::isotropic(TermKind::ChargeCharge, inverse_power(q1 * q2, 1, r))
}

fn dipole_terms(p1: &Vector3<f64>, p2: &Vector3<f64>, pair: &PairGeometry) -> [PairTerm; 2] {
    let r = pair.distance;
    let delta = &pair.delta;
    let p1_delta = p1.dot(delta);
    let p2_delta = p2.dot(delta);
    let isotropic = PairTerm::isotropic(TermKind::DipoleDipole, inverse_power(p1.dot(p2), 3, r));
    let orientation = PairTerm {
        kind: TermKind::DipoleOrientation,
        radial: inverse_power(-3.0, 5, r),
        value: p1_delta * p2_delta,
        gradient: p1 * p2_delta + p2 * p1_delta,
        hessian: p1 * p2.transpose() + p2 * p1.transpose(),
    };
    [isotropic, orientation]
}

/// Charge `q` on one atom interacting with dipole `p` on the other, where
/// `v = p . delta` and `delta` points from the dipole towards the charge.
fn charge_dipole(q: f64, p: Vector3<f64>, delta: &Vector3<f64>, r: f64) -> PairTerm {
    PairTerm {
        kind: TermKind::ChargeDipole,
        radial: inverse_power(q, 3, r),
        value: p.dot(delta),
        gradient: p,
        hessian: Matrix3::zeros(),
    }
}

impl PairPotential for Coulomb {
    fn name(&self) -> &'static str {
        "coulomb"
    }

    fn validate(&self, atom_count: usize) -> Result<(), ParameterError> {
        if let Some(charges) = self.sources.charges() {
            check_length("charges", atom_count, charges.len())?;
        }
        if let Some(dipoles) = self.sources.dipoles() {
            check_length("dipoles", atom_count, dipoles.len())?;
        }
        Ok(())
    }

    fn pair_terms(&self, pair: &PairGeometry) -> Vec<PairTerm> {
        let (i, j) = (pair.index1, pair.index2);
        let r = pair.distance;
        match &self.sources {
            ElectrostaticSources::Charges(charges) => vec![charge_charge(charges[i], charges[j], r)],
            ElectrostaticSources::Dipoles(dipoles) => {
                dipole_terms(&dipoles[i], &dipoles[j], pair).to_vec()
            }
            ElectrostaticSources::ChargesAndDipoles { charges, dipoles } => {
                let [isotropic, orientation] = dipole_terms(&dipoles[i], &dipoles[j], pair);
                vec![
                    charge_charge(charges[i], charges[j], r),
                    isotropic,
                    orientation,
                    charge_dipole(charges[i], dipoles[j], &pair.delta, r),
                    charge_dipole(charges[j], -dipoles[i], &pair.delta, r),
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::GeometryCache;
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn pair_energy(coulomb: &Coulomb, cache: &GeometryCache, i: usize, j: usize) -> f64 {
        coulomb
            .pair_terms(&cache.pair(i, j))
            .iter()
            .map(PairTerm::energy)
            .sum()
    }

    fn two_atoms() -> GeometryCache {
        GeometryCache::new(&[Point3::origin(), Point3::new(2.0, 0.0, 0.0)])
    }

    #[test]
    fn from_parts_requires_at_least_one_source() {
        assert_eq!(
            ElectrostaticSources::from_parts(None, None),
            Err(ParameterError::MissingParameter("charges or dipoles"))
        );
        assert!(matches!(
            ElectrostaticSources::from_parts(Some(vec![1.0]), None),
            Ok(ElectrostaticSources::Charges(_))
        ));
        assert!(matches!(
            ElectrostaticSources::from_parts(Some(vec![1.0]), Some(vec![Vector3::zeros()])),
            Ok(ElectrostaticSources::ChargesAndDipoles { .. })
        ));
    }

    #[test]
    fn charges_only_emit_a_single_term() {
        let coulomb = Coulomb::new(ElectrostaticSources::Charges(vec![1.0, -1.0]));
        let terms = coulomb.pair_terms(&two_atoms().pair(0, 1));
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].kind, TermKind::ChargeCharge);
        assert!(f64_approx_equal(terms[0].energy(), -0.5));
    }

    #[test]
    fn dipoles_only_emit_two_terms() {
        let coulomb = Coulomb::new(ElectrostaticSources::Dipoles(vec![
            Vector3::x(),
            Vector3::x(),
        ]));
        let terms = coulomb.pair_terms(&two_atoms().pair(0, 1));
        let kinds: Vec<_> = terms.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TermKind::DipoleDipole, TermKind::DipoleOrientation]);
    }

    #[test]
    fn charges_and_dipoles_emit_terms_in_a_fixed_order() {
        let coulomb = Coulomb::new(ElectrostaticSources::ChargesAndDipoles {
            charges: vec![1.0, 2.0],
            dipoles: vec![Vector3::x(), Vector3::y()],
        });
        let kinds: Vec<_> = coulomb
            .pair_terms(&two_atoms().pair(0, 1))
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TermKind::ChargeCharge,
                TermKind::DipoleDipole,
                TermKind::DipoleOrientation,
                TermKind::ChargeDipole,
                TermKind::ChargeDipole,
            ]
        );
    }

    #[test]
    fn head_to_tail_dipoles_attract_with_minus_two_over_r_cubed() {
        let coulomb = Coulomb::new(ElectrostaticSources::Dipoles(vec![
            Vector3::x(),
            Vector3::x(),
        ]));
        let energy = pair_energy(&coulomb, &two_atoms(), 0, 1);
        assert!(f64_approx_equal(energy, -2.0 / 8.0));
    }

    #[test]
    fn side_by_side_parallel_dipoles_repel_with_one_over_r_cubed() {
        let coulomb = Coulomb::new(ElectrostaticSources::Dipoles(vec![
            Vector3::z(),
            Vector3::z(),
        ]));
        let energy = pair_energy(&coulomb, &two_atoms(), 0, 1);
        assert!(f64_approx_equal(energy, 1.0 / 8.0));
    }

    #[test]
    fn charge_dipole_energy_is_the_dipole_potential_at_the_charge() {
        // unit dipole at the origin pointing at a unit charge two units away
        let coulomb = Coulomb::new(ElectrostaticSources::ChargesAndDipoles {
            charges: vec![0.0, 1.0],
            dipoles: vec![Vector3::x(), Vector3::zeros()],
        });
        let energy = pair_energy(&coulomb, &two_atoms(), 0, 1);
        assert!(f64_approx_equal(energy, 1.0 / 4.0));
    }

    #[test]
    fn pair_energy_is_independent_of_pair_orientation() {
        let cache = GeometryCache::new(&[
            Point3::new(0.1, -0.3, 0.2),
            Point3::new(1.4, 0.7, -0.9),
        ]);
        let coulomb = Coulomb::new(ElectrostaticSources::ChargesAndDipoles {
            charges: vec![0.4, -0.7],
            dipoles: vec![Vector3::new(0.2, -0.1, 0.3), Vector3::new(-0.4, 0.5, 0.1)],
        });
        let forward = pair_energy(&coulomb, &cache, 0, 1);
        let backward = pair_energy(&coulomb, &cache, 1, 0);
        assert!(f64_approx_equal(forward, backward));
    }

    #[test]
    fn orientation_term_derivatives_match_its_value() {
        let cache = GeometryCache::new(&[
            Point3::new(0.3, 0.2, -0.1),
            Point3::new(-0.5, 1.1, 0.4),
        ]);
        let p1 = Vector3::new(0.2, -0.1, 0.3);
        let p2 = Vector3::new(-0.4, 0.5, 0.1);
        let [_, orientation] = dipole_terms(&p1, &p2, &cache.pair(0, 1));
        let delta = cache.delta(0, 1);
        assert!(f64_approx_equal(
            orientation.value,
            p1.dot(delta) * p2.dot(delta)
        ));
        assert_eq!(orientation.hessian, orientation.hessian.transpose());
    }

    #[test]
    fn validate_checks_charge_and_dipole_lengths() {
        let coulomb = Coulomb::new(ElectrostaticSources::ChargesAndDipoles {
            charges: vec![1.0, 2.0],
            dipoles: vec![Vector3::zeros()],
        });
        assert_eq!(
            coulomb.validate(2),
            Err(ParameterError::DimensionMismatch {
                what: "dipoles",
                expected: 2,
                found: 1
            })
        );
        assert!(matches!(
            coulomb.validate(3),
            Err(ParameterError::DimensionMismatch { what: "charges", .. })
        ));
    }
}
