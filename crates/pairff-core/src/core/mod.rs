//! # Core Module
//!
//! Stateless building blocks of the pairwise force fields: the geometry cache
//! derived from one set of Cartesian coordinates, the symmetric exclusion
//! mask, and the potentials themselves.
//!
//! - **Geometry** ([`geometry`]) - Pair displacements, distances, unit directions and outer products
//! - **Exclusions** ([`mask`]) - Which atom pairs interact, and with what weight
//! - **Potentials** ([`forcefield`]) - Term providers, parameters and energy breakdowns

pub mod forcefield;
pub mod geometry;
pub mod mask;
