use super::error::EngineError;
use super::hessian::HessianBlocks;
use crate::core::forcefield::params::ParameterError;
use crate::core::forcefield::potentials::PairPotential;
use crate::core::forcefield::term::{EnergyTerm, PairTerm};
use crate::core::geometry::GeometryCache;
use crate::core::mask::ExclusionMask;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector, Matrix3, Point3, Vector3};
use tracing::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Anything that can report the energy of a set of atoms and its first two
/// derivatives with respect to their Cartesian coordinates.
pub trait ForceField: Send + Sync {
    fn name(&self) -> String;

    fn atom_count(&self) -> usize;

    fn coordinates(&self) -> Option<&[Point3<f64>]>;

    /// Replaces the coordinates, or rebuilds derived data from the stored
    /// ones when `coordinates` is `None`.
    fn update_coordinates(
        &mut self,
        coordinates: Option<Vec<Point3<f64>>>,
    ) -> Result<(), EngineError>;

    fn energy(&self) -> Result<f64, EngineError>;

    fn energy_terms(&self) -> Result<EnergyTerm, EngineError>;

    fn gradient(&self) -> Result<Vec<Vector3<f64>>, EngineError>;

    fn hessian(&self) -> Result<HessianBlocks, EngineError>;

    fn gradient_flat(&self) -> Result<DVector<f64>, EngineError> {
        Ok(flatten_gradient(&self.gradient()?))
    }

    fn hessian_flat(&self) -> Result<DMatrix<f64>, EngineError> {
        Ok(self.hessian()?.to_flat())
    }
}

/// Lays out per-atom gradient vectors as one `3N` vector, atom-major.
pub fn flatten_gradient(gradient: &[Vector3<f64>]) -> DVector<f64> {
    DVector::from_iterator(
        3 * gradient.len(),
        gradient.iter().flat_map(|g| g.iter().copied()),
    )
}

/// Energy, gradient and Hessian of one pair potential over all unmasked pairs.
///
/// Every pair contribution is built from the potential's terms `s(r) v(delta)`
/// with the product rule, so potentials never see atoms other than the two of
/// the pair at hand. The cost of every query is quadratic in the atom count.
///
/// Atoms must be at distinct positions; coincident atoms make the results
/// non-finite.
#[derive(Debug, Clone)]
pub struct PairFF<P> {
    mask: ExclusionMask,
    potential: P,
    coordinates: Option<Vec<Point3<f64>>>,
    geometry: Option<GeometryCache>,
}

impl<P: PairPotential> PairFF<P> {
    pub fn new(mask: ExclusionMask, potential: P) -> Result<Self, EngineError> {
        potential.validate(mask.atom_count())?;
        if !mask.is_symmetric() {
            warn!(
                potential = potential.name(),
                "Exclusion mask is not symmetric; pair (i, j) uses the weight stored at row i."
            );
        }
        Ok(Self {
            mask,
            potential,
            coordinates: None,
            geometry: None,
        })
    }

    pub fn with_coordinates(mut self, coordinates: Vec<Point3<f64>>) -> Result<Self, EngineError> {
        self.update_coordinates(Some(coordinates))?;
        Ok(self)
    }

    pub fn update_coordinates(
        &mut self,
        coordinates: Option<Vec<Point3<f64>>>,
    ) -> Result<(), EngineError> {
        if let Some(coordinates) = coordinates {
            if coordinates.len() != self.atom_count() {
                return Err(ParameterError::DimensionMismatch {
                    what: "coordinates",
                    expected: self.atom_count(),
                    found: coordinates.len(),
                }
                .into());
            }
            self.coordinates = Some(coordinates);
        }
        let coordinates = self
            .coordinates
            .as_deref()
            .ok_or(EngineError::MissingCoordinates(self.potential.name()))?;
        self.geometry = Some(GeometryCache::new(coordinates));
        trace!(
            potential = self.potential.name(),
            atom_count = coordinates.len(),
            "Geometry cache rebuilt."
        );
        Ok(())
    }

    pub fn coordinates(&self) -> Option<&[Point3<f64>]> {
        self.coordinates.as_deref()
    }

    /// In-place access to the stored coordinates. The cached geometry goes
    /// stale until `update_coordinates(None)` is called.
    pub fn coordinates_mut(&mut self) -> Option<&mut [Point3<f64>]> {
        self.coordinates.as_deref_mut()
    }

    pub fn mask(&self) -> &ExclusionMask {
        &self.mask
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.mask.atom_count()
    }

    fn geometry(&self) -> Result<&GeometryCache, EngineError> {
        self.geometry
            .as_ref()
            .ok_or(EngineError::MissingCoordinates(self.potential.name()))
    }

    fn check_index(&self, index: usize) -> Result<(), EngineError> {
        if index < self.atom_count() {
            Ok(())
        } else {
            Err(ParameterError::AtomIndexOutOfRange {
                index,
                atom_count: self.atom_count(),
            }
            .into())
        }
    }

    fn pair_energy(&self, geometry: &GeometryCache, index1: usize, index2: usize) -> f64 {
        let weight = self.mask.weight(index1, index2);
        if !self.mask.is_included(index1, index2) {
            return 0.0;
        }
        let pair = geometry.pair(index1, index2);
        let energy: f64 = self
            .potential
            .pair_terms(&pair)
            .iter()
            .map(PairTerm::energy)
            .sum();
        energy * weight
    }

    fn pair_gradient(&self, geometry: &GeometryCache, index1: usize, index2: usize) -> Vector3<f64> {
        let weight = self.mask.weight(index1, index2);
        if !self.mask.is_included(index1, index2) {
            return Vector3::zeros();
        }
        let pair = geometry.pair(index1, index2);
        self.potential
            .pair_terms(&pair)
            .iter()
            .fold(Vector3::zeros(), |acc, term| acc + term.gradient(&pair))
            * weight
    }

    fn pair_hessian(&self, geometry: &GeometryCache, index1: usize, index2: usize) -> Matrix3<f64> {
        let weight = self.mask.weight(index1, index2);
        if !self.mask.is_included(index1, index2) {
            return Matrix3::zeros();
        }
        let pair = geometry.pair(index1, index2);
        self.potential
            .pair_terms(&pair)
            .iter()
            .fold(Matrix3::zeros(), |acc, term| acc + term.hessian(&pair))
            * weight
    }

    fn atom_gradient(&self, geometry: &GeometryCache, index1: usize) -> Vector3<f64> {
        (0..self.atom_count()).fold(Vector3::zeros(), |acc, index2| {
            acc + self.pair_gradient(geometry, index1, index2)
        })
    }

    /// The diagonal block collects every pair of the atom; an off-diagonal
    /// block is minus the pair's own block, so each block row sums to zero.
    fn hessian_block(&self, geometry: &GeometryCache, index1: usize, index2: usize) -> Matrix3<f64> {
        if index1 == index2 {
            (0..self.atom_count()).fold(Matrix3::zeros(), |acc, index3| {
                acc + self.pair_hessian(geometry, index1, index3)
            })
        } else {
            -self.pair_hessian(geometry, index1, index2)
        }
    }

    pub fn energy(&self) -> Result<f64, EngineError> {
        let geometry = self.geometry()?;
        let n = self.atom_count();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..n;

        #[cfg(feature = "parallel")]
        let iterator = (0..n).into_par_iter();

        Ok(iterator
            .map(|index1| {
                ((index1 + 1)..n)
                    .map(|index2| self.pair_energy(geometry, index1, index2))
                    .sum::<f64>()
            })
            .sum())
    }

    /// Energy split by term kind. Serial, and summed in a fixed pair order.
    pub fn energy_terms(&self) -> Result<EnergyTerm, EngineError> {
        let geometry = self.geometry()?;
        let mut breakdown = EnergyTerm::default();
        for (index1, index2) in (0..self.atom_count()).tuple_combinations() {
            let weight = self.mask.weight(index1, index2);
            if !self.mask.is_included(index1, index2) {
                continue;
            }
            for term in self.potential.pair_terms(&geometry.pair(index1, index2)) {
                breakdown.accumulate(term.kind, term.energy() * weight);
            }
        }
        Ok(breakdown)
    }

    pub fn gradient_component(&self, index: usize) -> Result<Vector3<f64>, EngineError> {
        let geometry = self.geometry()?;
        self.check_index(index)?;
        Ok(self.atom_gradient(geometry, index))
    }

    pub fn gradient(&self) -> Result<Vec<Vector3<f64>>, EngineError> {
        let geometry = self.geometry()?;

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..self.atom_count();

        #[cfg(feature = "parallel")]
        let iterator = (0..self.atom_count()).into_par_iter();

        Ok(iterator
            .map(|index| self.atom_gradient(geometry, index))
            .collect())
    }

    pub fn hessian_component(
        &self,
        index1: usize,
        index2: usize,
    ) -> Result<Matrix3<f64>, EngineError> {
        let geometry = self.geometry()?;
        self.check_index(index1)?;
        self.check_index(index2)?;
        Ok(self.hessian_block(geometry, index1, index2))
    }

    pub fn hessian(&self) -> Result<HessianBlocks, EngineError> {
        let geometry = self.geometry()?;
        let n = self.atom_count();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..n;

        #[cfg(feature = "parallel")]
        let iterator = (0..n).into_par_iter();

        let rows: Vec<Vec<Matrix3<f64>>> = iterator
            .map(|index1| {
                (0..n)
                    .map(|index2| self.hessian_block(geometry, index1, index2))
                    .collect()
            })
            .collect();
        Ok(HessianBlocks::from_rows(n, rows))
    }

    pub fn gradient_flat(&self) -> Result<DVector<f64>, EngineError> {
        Ok(flatten_gradient(&self.gradient()?))
    }

    pub fn hessian_flat(&self) -> Result<DMatrix<f64>, EngineError> {
        Ok(self.hessian()?.to_flat())
    }
}

impl<P: PairPotential> ForceField for PairFF<P> {
    fn name(&self) -> String {
        self.potential.name().to_string()
    }

    fn atom_count(&self) -> usize {
        PairFF::atom_count(self)
    }

    fn coordinates(&self) -> Option<&[Point3<f64>]> {
        PairFF::coordinates(self)
    }

    fn update_coordinates(
        &mut self,
        coordinates: Option<Vec<Point3<f64>>>,
    ) -> Result<(), EngineError> {
        PairFF::update_coordinates(self, coordinates)
    }

    fn energy(&self) -> Result<f64, EngineError> {
        PairFF::energy(self)
    }

    fn energy_terms(&self) -> Result<EnergyTerm, EngineError> {
        PairFF::energy_terms(self)
    }

    fn gradient(&self) -> Result<Vec<Vector3<f64>>, EngineError> {
        PairFF::gradient(self)
    }

    fn hessian(&self) -> Result<HessianBlocks, EngineError> {
        PairFF::hessian(self)
    }
}
