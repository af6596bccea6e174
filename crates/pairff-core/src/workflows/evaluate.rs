use crate::core::forcefield::params::SystemParams;
use crate::core::forcefield::term::EnergyTerm;
use crate::engine::composite::CompositeFF;
use crate::engine::config::ForceFieldBuilder;
use crate::engine::error::EngineError;
use crate::engine::evaluator::ForceField;
use nalgebra::{DMatrix, Vector3};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationRequest {
    pub gradient: bool,
    pub hessian: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub energy: f64,
    pub terms: EnergyTerm,
    pub gradient: Option<Vec<Vector3<f64>>>,
    /// Flattened `3N x 3N` Hessian.
    pub hessian: Option<DMatrix<f64>>,
}

/// Builds one pair force field per potential section of `params`, all sharing
/// the same mask, and applies the coordinates.
#[instrument(skip_all, name = "build_force_field")]
pub fn build_force_field(params: &SystemParams) -> Result<CompositeFF, EngineError> {
    let atom_count = params.atom_count();
    let mask = params.mask()?;
    if !mask.is_symmetric() {
        warn!("Exclusion mask built from the parameter file is not symmetric.");
    }
    let included_pairs = mask.included_pair_count();
    let builder = ForceFieldBuilder::new()
        .mask(mask)
        .coordinates(params.positions());

    let mut ff = CompositeFF::new(atom_count);
    if let Some(coulomb) = &params.coulomb {
        let mut coulomb_builder = builder.clone();
        if let Some(charges) = &coulomb.charges {
            coulomb_builder = coulomb_builder.charges(charges.clone());
        }
        if let Some(dipoles) = coulomb.dipole_vectors() {
            coulomb_builder = coulomb_builder.dipoles(dipoles);
        }
        ff.push(Box::new(coulomb_builder.build_coulomb()?))?;
    }
    if let Some(dispersion) = &params.dispersion {
        let strengths = dispersion.to_matrix(atom_count)?;
        ff.push(Box::new(builder.clone().strengths(strengths).build_dispersion()?))?;
    }
    if let Some(pauli) = &params.pauli {
        let strengths = pauli.to_matrix(atom_count)?;
        ff.push(Box::new(builder.clone().strengths(strengths).build_pauli()?))?;
    }
    if ff.is_empty() {
        warn!("System defines no potentials; every energy will be zero.");
    }
    ff.update_coordinates(Some(params.positions()))?;

    info!(
        atom_count,
        potentials = %ff.name(),
        included_pairs,
        "Force field assembled."
    );
    Ok(ff)
}

#[instrument(skip_all, name = "evaluate_workflow")]
pub fn evaluate(
    params: &SystemParams,
    request: &EvaluationRequest,
) -> Result<EvaluationResult, EngineError> {
    let ff = build_force_field(params)?;
    let terms = ff.energy_terms()?;
    let energy = ff.energy()?;
    debug!(energy, breakdown = ?terms, "Energy evaluated.");

    let gradient = if request.gradient {
        Some(ff.gradient()?)
    } else {
        None
    };
    let hessian = if request.hessian {
        Some(ff.hessian_flat()?)
    } else {
        None
    };
    info!(
        energy,
        gradient = request.gradient,
        hessian = request.hessian,
        "Evaluation complete."
    );
    Ok(EvaluationResult {
        energy,
        terms,
        gradient,
        hessian,
    })
}
