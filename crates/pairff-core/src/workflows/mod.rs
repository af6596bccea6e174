//! # Workflows Module
//!
//! High level entry points for users of the library. A workflow takes a
//! [`crate::core::forcefield::params::SystemParams`] description, assembles a
//! [`crate::engine::composite::CompositeFF`] from every potential section it
//! contains, and evaluates or validates it.
//!
//! - **Evaluation** ([`evaluate`]) - Energy, per-kind breakdown and optional derivatives
//! - **Validation** ([`validate`]) - Finite-difference and invariant checks of the derivatives

pub mod evaluate;
pub mod validate;
