use crate::core::forcefield::coulomb::{Coulomb, ElectrostaticSources};
use crate::core::forcefield::dispersion::Dispersion;
use crate::core::forcefield::params::ParameterError;
use crate::core::forcefield::pauli::Pauli;
use crate::core::forcefield::potentials::PairPotential;
use crate::core::mask::ExclusionMask;
use crate::engine::error::EngineError;
use crate::engine::evaluator::PairFF;
use nalgebra::{DMatrix, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Central-difference displacement, in coordinate units.
    pub step: f64,
    pub gradient_tolerance: f64,
    pub hessian_tolerance: f64,
    /// Bound on the Hessian row sums, its asymmetry and the translation residual.
    pub invariant_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            step: 1e-5,
            gradient_tolerance: 1e-6,
            hessian_tolerance: 1e-5,
            invariant_tolerance: 1e-8,
        }
    }
}

impl ValidationConfig {
    pub fn check(&self) -> Result<(), ParameterError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ParameterError::InvalidValue {
                what: "finite difference step",
                value: self.step,
            });
        }
        for (what, value) in [
            ("gradient tolerance", self.gradient_tolerance),
            ("hessian tolerance", self.hessian_tolerance),
            ("invariant tolerance", self.invariant_tolerance),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ParameterError::InvalidValue { what, value });
            }
        }
        Ok(())
    }
}

/// Collects the inputs of a pair force field and builds one of the three
/// potentials from them.
///
/// Without an explicit mask every distinct pair is included.
#[derive(Debug, Default, Clone)]
pub struct ForceFieldBuilder {
    mask: Option<ExclusionMask>,
    coordinates: Option<Vec<Point3<f64>>>,
    charges: Option<Vec<f64>>,
    dipoles: Option<Vec<Vector3<f64>>>,
    strengths: Option<DMatrix<f64>>,
}

impl ForceFieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask(mut self, mask: ExclusionMask) -> Self {
        self.mask = Some(mask);
        self
    }
    pub fn coordinates(mut self, coordinates: Vec<Point3<f64>>) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
    pub fn charges(mut self, charges: Vec<f64>) -> Self {
        self.charges = Some(charges);
        self
    }
    pub fn dipoles(mut self, dipoles: Vec<Vector3<f64>>) -> Self {
        self.dipoles = Some(dipoles);
        self
    }
    pub fn strengths(mut self, strengths: DMatrix<f64>) -> Self {
        self.strengths = Some(strengths);
        self
    }

    fn resolve_mask(&mut self) -> Result<ExclusionMask, ParameterError> {
        match (self.mask.take(), &self.coordinates) {
            (Some(mask), _) => Ok(mask),
            (None, Some(coordinates)) => Ok(ExclusionMask::full(coordinates.len())),
            (None, None) => Err(ParameterError::MissingParameter("mask")),
        }
    }

    fn finish<P: PairPotential>(
        self,
        mask: ExclusionMask,
        potential: P,
    ) -> Result<PairFF<P>, EngineError> {
        let ff = PairFF::new(mask, potential)?;
        match self.coordinates {
            Some(coordinates) => ff.with_coordinates(coordinates),
            None => Ok(ff),
        }
    }

    pub fn build_coulomb(mut self) -> Result<PairFF<Coulomb>, EngineError> {
        let mask = self.resolve_mask()?;
        let sources = ElectrostaticSources::from_parts(self.charges.take(), self.dipoles.take())?;
        self.finish(mask, Coulomb::new(sources))
    }

    pub fn build_dispersion(mut self) -> Result<PairFF<Dispersion>, EngineError> {
        let mask = self.resolve_mask()?;
        let strengths = self
            .strengths
            .take()
            .ok_or(ParameterError::MissingParameter("strengths"))?;
        self.finish(mask, Dispersion::new(strengths))
    }

    pub fn build_pauli(mut self) -> Result<PairFF<Pauli>, EngineError> {
        let mask = self.resolve_mask()?;
        let strengths = self
            .strengths
            .take()
            .ok_or(ParameterError::MissingParameter("strengths"))?;
        self.finish(mask, Pauli::new(strengths))
    }
}
