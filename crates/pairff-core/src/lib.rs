//! # pairff Core Library
//!
//! Energy, analytic gradient and analytic Hessian of pairwise non-bonded force
//! fields: Coulomb interactions of point charges and point dipoles, London
//! dispersion (`r^-6`) and Pauli repulsion (`r^-12`), with per-pair exclusion
//! masks and weights.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless numerics: the cached pair
//!   geometry, the exclusion mask, and the potentials, which only enumerate
//!   the `s(r) v(delta)` terms of one pair. Parameter files live here too.
//!
//! - **[`engine`]: The Logic Core.** [`engine::evaluator::PairFF`] owns the
//!   coordinates and sums pair terms into energies, gradients and Hessians with
//!   one shared set of product-rule identities. Composite force fields and
//!   finite-difference validation build on top of it.
//!
//! - **[`workflows`]: The Public API.** Turns a TOML system description into a
//!   composite force field and evaluates or validates it.

pub mod core;
pub mod engine;
pub mod workflows;
