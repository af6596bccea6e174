//! # Engine Module
//!
//! The stateful layer: force fields that own their coordinates and turn the
//! term lists of [`crate::core::forcefield`] potentials into energies,
//! gradients and Hessians.
//!
//! ## Architecture
//!
//! - **Evaluation** ([`evaluator`]) - The [`evaluator::ForceField`] trait and the generic
//!   pair accumulation engine [`evaluator::PairFF`]
//! - **Composition** ([`composite`]) - Sums of force fields sharing one set of coordinates
//! - **Second Derivatives** ([`hessian`]) - Block storage for `3N x 3N` Hessians
//! - **Configuration** ([`config`]) - Force field builder and validation settings
//! - **Validation** ([`validation`]) - Finite-difference checks of analytic derivatives
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! With the `parallel` feature (on by default) the outer atom loop of every
//! full-system query runs on the rayon thread pool. Results do not depend on
//! the thread count beyond floating-point summation order.

pub mod composite;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod hessian;
pub mod validation;
