use super::error::EngineError;
use super::evaluator::ForceField;
use super::hessian::HessianBlocks;
use crate::core::forcefield::params::ParameterError;
use crate::core::forcefield::term::EnergyTerm;
use nalgebra::{Point3, Vector3};
use std::fmt;
use tracing::debug;

/// A sum of force fields over the same atoms, sharing one set of coordinates.
#[derive(Default)]
pub struct CompositeFF {
    atom_count: usize,
    coordinates: Option<Vec<Point3<f64>>>,
    members: Vec<Box<dyn ForceField>>,
}

impl CompositeFF {
    pub fn new(atom_count: usize) -> Self {
        Self {
            atom_count,
            coordinates: None,
            members: Vec::new(),
        }
    }

    /// Adds a member. If the composite already holds coordinates they are
    /// pushed into the new member.
    pub fn push(&mut self, mut member: Box<dyn ForceField>) -> Result<(), EngineError> {
        if member.atom_count() != self.atom_count {
            return Err(ParameterError::DimensionMismatch {
                what: "force field atoms",
                expected: self.atom_count,
                found: member.atom_count(),
            }
            .into());
        }
        if let Some(coordinates) = &self.coordinates {
            member.update_coordinates(Some(coordinates.clone()))?;
        }
        debug!(member = %member.name(), "Added force field to composite.");
        self.members.push(member);
        Ok(())
    }

    pub fn with_member<F: ForceField + 'static>(mut self, member: F) -> Result<Self, EngineError> {
        self.push(Box::new(member))?;
        Ok(self)
    }

    pub fn members(&self) -> &[Box<dyn ForceField>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn check_coordinates(&self) -> Result<(), EngineError> {
        match self.coordinates {
            Some(_) => Ok(()),
            None => Err(EngineError::MissingCoordinates("composite")),
        }
    }
}

impl fmt::Debug for CompositeFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFF")
            .field("atom_count", &self.atom_count)
            .field("members", &self.name())
            .field("has_coordinates", &self.coordinates.is_some())
            .finish()
    }
}

impl ForceField for CompositeFF {
    fn name(&self) -> String {
        self.members
            .iter()
            .map(|member| member.name())
            .collect::<Vec<_>>()
            .join("+")
    }

    fn atom_count(&self) -> usize {
        self.atom_count
    }

    fn coordinates(&self) -> Option<&[Point3<f64>]> {
        self.coordinates.as_deref()
    }

    fn update_coordinates(
        &mut self,
        coordinates: Option<Vec<Point3<f64>>>,
    ) -> Result<(), EngineError> {
        if let Some(coordinates) = coordinates {
            if coordinates.len() != self.atom_count {
                return Err(ParameterError::DimensionMismatch {
                    what: "coordinates",
                    expected: self.atom_count,
                    found: coordinates.len(),
                }
                .into());
            }
            self.coordinates = Some(coordinates);
        }
        let coordinates = self
            .coordinates
            .as_ref()
            .ok_or(EngineError::MissingCoordinates("composite"))?;
        for member in &mut self.members {
            member.update_coordinates(Some(coordinates.clone()))?;
        }
        Ok(())
    }

    fn energy(&self) -> Result<f64, EngineError> {
        self.check_coordinates()?;
        self.members.iter().map(|member| member.energy()).sum()
    }

    fn energy_terms(&self) -> Result<EnergyTerm, EngineError> {
        self.check_coordinates()?;
        self.members
            .iter()
            .try_fold(EnergyTerm::default(), |acc, member| {
                Ok(acc + member.energy_terms()?)
            })
    }

    fn gradient(&self) -> Result<Vec<Vector3<f64>>, EngineError> {
        self.check_coordinates()?;
        let mut total = vec![Vector3::zeros(); self.atom_count];
        for member in &self.members {
            for (acc, g) in total.iter_mut().zip(member.gradient()?) {
                *acc += g;
            }
        }
        Ok(total)
    }

    fn hessian(&self) -> Result<HessianBlocks, EngineError> {
        self.check_coordinates()?;
        let mut total = HessianBlocks::zeros(self.atom_count);
        for member in &self.members {
            total += &member.hessian()?;
        }
        Ok(total)
    }
}
