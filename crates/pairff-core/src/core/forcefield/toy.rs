//! Cheap restraint-like terms for pre-relaxing guessed geometries.
//!
//! These terms only provide an energy and a gradient. They are meant to push
//! a rough structure towards sensible interatomic distances before a physical
//! force field takes over, not to model any real interaction.
//!
//! This module is library-only: the TOML system description, the workflows
//! and the CLI never build a [`ToyForceField`]. Callers construct one directly
//! and drive it with their own coordinates.

use super::params::ParameterError;
use super::potentials::check_length;
use nalgebra::{DMatrix, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub enum ToyTerm {
    /// `amp (d - d0 (R_i + R_j))^2 R_i R_j / d0` for every pair with graph
    /// distance `d0 > 0`.
    DistanceMatrixQuadratic {
        radii: Vec<f64>,
        graph_distances: DMatrix<u32>,
        amplitude: f64,
    },
    /// `amp (x - 1)^2 / (x d0)` with `x = d / (R_i + R_j)`, only for pairs
    /// with graph distance `d0 > 1` that are closer than `R_i + R_j`.
    DistanceMatrixReciprocal {
        radii: Vec<f64>,
        graph_distances: DMatrix<u32>,
        amplitude: f64,
    },
    /// `amp (d - l)^2` for every listed bond.
    BondQuadratic {
        pairs: Vec<[usize; 2]>,
        lengths: Vec<f64>,
        amplitude: f64,
    },
    /// `amp (cosh(scale (d - l)) - 1)` for every listed bond.
    BondHyperbolic {
        pairs: Vec<[usize; 2]>,
        lengths: Vec<f64>,
        scale: f64,
        amplitude: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToyForceField {
    terms: Vec<ToyTerm>,
}

#[inline]
fn add_gradient(
    gradient: &mut [Vector3<f64>],
    index1: usize,
    index2: usize,
    factor: f64,
    delta: &Vector3<f64>,
) {
    gradient[index1] += delta * factor;
    gradient[index2] -= delta * factor;
}

impl ToyTerm {
    fn validate(&self, atom_count: usize) -> Result<(), ParameterError> {
        match self {
            ToyTerm::DistanceMatrixQuadratic {
                radii,
                graph_distances,
                ..
            }
            | ToyTerm::DistanceMatrixReciprocal {
                radii,
                graph_distances,
                ..
            } => {
                check_length("radii", atom_count, radii.len())?;
                check_length("graph distances", atom_count, graph_distances.nrows())?;
                check_length("graph distances", atom_count, graph_distances.ncols())
            }
            ToyTerm::BondQuadratic { pairs, lengths, .. }
            | ToyTerm::BondHyperbolic { pairs, lengths, .. } => {
                check_length("bond lengths", pairs.len(), lengths.len())?;
                match pairs.iter().flatten().find(|&&index| index >= atom_count) {
                    Some(&index) => Err(ParameterError::AtomIndexOutOfRange { index, atom_count }),
                    None => Ok(()),
                }
            }
        }
    }

    fn accumulate(&self, coordinates: &[Point3<f64>], gradient: &mut [Vector3<f64>]) -> f64 {
        let mut energy = 0.0;
        match self {
            ToyTerm::DistanceMatrixQuadratic {
                radii,
                graph_distances,
                amplitude,
            } => {
                for (index1, index2) in lower_pairs(coordinates.len()) {
                    let d0 = graph_distances[(index1, index2)];
                    if d0 == 0 {
                        continue;
                    }
                    let d0 = f64::from(d0);
                    let delta = coordinates[index1] - coordinates[index2];
                    let distance = delta.norm();
                    let radius_product = radii[index1] * radii[index2];
                    let stretch = distance - d0 * (radii[index1] + radii[index2]);
                    energy += amplitude * stretch * stretch * radius_product / d0;
                    let factor = 2.0 * amplitude * stretch * radius_product / (d0 * distance);
                    add_gradient(gradient, index1, index2, factor, &delta);
                }
            }
            ToyTerm::DistanceMatrixReciprocal {
                radii,
                graph_distances,
                amplitude,
            } => {
                for (index1, index2) in lower_pairs(coordinates.len()) {
                    let d0 = graph_distances[(index1, index2)];
                    if d0 <= 1 {
                        continue;
                    }
                    let d0 = f64::from(d0);
                    let delta = coordinates[index1] - coordinates[index2];
                    let distance = delta.norm();
                    let contact = radii[index1] + radii[index2];
                    if distance >= contact {
                        continue;
                    }
                    let x = distance / contact;
                    energy += amplitude * (x - 1.0) * (x - 1.0) / (x * d0);
                    let factor = amplitude * (1.0 - 1.0 / (x * x)) / (d0 * contact * distance);
                    add_gradient(gradient, index1, index2, factor, &delta);
                }
            }
            ToyTerm::BondQuadratic {
                pairs,
                lengths,
                amplitude,
            } => {
                for (&[index1, index2], &length) in pairs.iter().zip(lengths) {
                    let delta = coordinates[index1] - coordinates[index2];
                    let distance = delta.norm();
                    let stretch = distance - length;
                    energy += amplitude * stretch * stretch;
                    let factor = 2.0 * amplitude * stretch / distance;
                    add_gradient(gradient, index1, index2, factor, &delta);
                }
            }
            ToyTerm::BondHyperbolic {
                pairs,
                lengths,
                scale,
                amplitude,
            } => {
                for (&[index1, index2], &length) in pairs.iter().zip(lengths) {
                    let delta = coordinates[index1] - coordinates[index2];
                    let distance = delta.norm();
                    let stretch = scale * (distance - length);
                    energy += amplitude * (stretch.cosh() - 1.0);
                    let factor = amplitude * scale * stretch.sinh() / distance;
                    add_gradient(gradient, index1, index2, factor, &delta);
                }
            }
        }
        energy
    }
}

fn lower_pairs(atom_count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..atom_count).flat_map(|index1| (0..index1).map(move |index2| (index1, index2)))
}

impl ToyForceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: ToyTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn terms(&self) -> &[ToyTerm] {
        &self.terms
    }

    pub fn energy(&self, coordinates: &[Point3<f64>]) -> Result<f64, ParameterError> {
        self.energy_gradient(coordinates).map(|(energy, _)| energy)
    }

    pub fn energy_gradient(
        &self,
        coordinates: &[Point3<f64>],
    ) -> Result<(f64, Vec<Vector3<f64>>), ParameterError> {
        for term in &self.terms {
            term.validate(coordinates.len())?;
        }
        let mut gradient = vec![Vector3::zeros(); coordinates.len()];
        let energy: f64 = self
            .terms
            .iter()
            .map(|term| term.accumulate(coordinates, &mut gradient))
            .sum();
        Ok((energy, gradient))
    }
}
