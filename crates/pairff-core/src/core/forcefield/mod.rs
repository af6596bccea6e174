//! # Force Field Module
//!
//! Pairwise non-bonded potentials written as `E = sum_{i<j} sum_k s_k(r_ij) v_k(r_ij)`,
//! where `s_k` depends only on the interatomic distance and `v_k` on the full
//! displacement vector (and on per-atom vectors such as dipoles).
//!
//! ## Key Components
//!
//! - [`potentials`] - The [`potentials::PairPotential`] trait and the inverse-power radial factor
//! - [`term`] - Lock-step term records and the per-kind energy breakdown
//! - [`coulomb`] - Charge and point-dipole electrostatics
//! - [`dispersion`] - London dispersion, `C_ij r^-6`
//! - [`pauli`] - Pauli repulsion, `A_ij r^-12`
//! - [`params`] - Parameter errors and TOML system descriptions
//! - [`toy`] - Gradient-only restraint terms for pre-relaxing guessed geometries
//!
//! ## Usage
//!
//! Potentials only enumerate terms; summing them over atom pairs and
//! differentiating is the job of [`crate::engine::evaluator::PairFF`].
//!
//! ```ignore
//! use pairff::core::forcefield::coulomb::{Coulomb, ElectrostaticSources};
//! use pairff::core::mask::ExclusionMask;
//! use pairff::engine::evaluator::PairFF;
//!
//! let coulomb = Coulomb::new(ElectrostaticSources::Charges(vec![1.0, -1.0]));
//! let ff = PairFF::new(ExclusionMask::full(2), coulomb)?.with_coordinates(coordinates)?;
//! let energy = ff.energy()?;
//! ```

pub mod coulomb;
pub mod dispersion;
pub mod params;
pub mod pauli;
pub mod potentials;
pub mod term;
pub mod toy;
