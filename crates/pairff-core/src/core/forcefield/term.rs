use crate::core::geometry::PairGeometry;
use nalgebra::{Matrix3, Vector3};
use std::ops::{Add, AddAssign, Mul};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    ChargeCharge,
    DipoleDipole,
    DipoleOrientation,
    ChargeDipole,
    Dispersion,
    Pauli,
}

/// Radial factor `s(r)` with its first and second derivative in `r`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialFactor {
    pub value: f64,
    pub first: f64,
    pub second: f64,
}

/// One term `s(r) v(delta)` of a pair interaction.
///
/// `gradient` and `hessian` are the first and second derivatives of `v` with
/// respect to the position of the first atom of the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTerm {
    pub kind: TermKind,
    pub radial: RadialFactor,
    pub value: f64,
    pub gradient: Vector3<f64>,
    pub hessian: Matrix3<f64>,
}

impl PairTerm {
    /// A term with `v = 1`.
    pub fn isotropic(kind: TermKind, radial: RadialFactor) -> Self {
        Self {
            kind,
            radial,
            value: 1.0,
            gradient: Vector3::zeros(),
            hessian: Matrix3::zeros(),
        }
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.radial.value * self.value
    }

    /// `s' u v + s grad(v)`, the derivative with respect to the first atom.
    #[inline]
    pub fn gradient(&self, pair: &PairGeometry) -> Vector3<f64> {
        pair.direction * (self.radial.first * self.value) + self.gradient * self.radial.value
    }

    /// Second derivative with respect to the first atom, twice.
    #[inline]
    pub fn hessian(&self, pair: &PairGeometry) -> Matrix3<f64> {
        let s = &self.radial;
        let transverse = (Matrix3::identity() - pair.outer) * (self.value / pair.distance);
        let cross = pair.direction * self.gradient.transpose()
            + self.gradient * pair.direction.transpose();
        pair.outer * (s.second * self.value)
            + transverse * s.first
            + cross * s.first
            + self.hessian * s.value
    }
}

/// Energy split by the kind of interaction that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub charge_charge: f64,
    pub charge_dipole: f64,
    pub dipole_dipole: f64,
    pub dispersion: f64,
    pub pauli: f64,
}

impl EnergyTerm {
    #[inline]
    pub fn total(&self) -> f64 {
        self.charge_charge + self.charge_dipole + self.dipole_dipole + self.dispersion + self.pauli
    }

    #[inline]
    pub fn electrostatic(&self) -> f64 {
        self.charge_charge + self.charge_dipole + self.dipole_dipole
    }

    pub fn accumulate(&mut self, kind: TermKind, energy: f64) {
        match kind {
            TermKind::ChargeCharge => self.charge_charge += energy,
            TermKind::ChargeDipole => self.charge_dipole += energy,
            TermKind::DipoleDipole | TermKind::DipoleOrientation => self.dipole_dipole += energy,
            TermKind::Dispersion => self.dispersion += energy,
            TermKind::Pauli => self.pauli += energy,
        }
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            charge_charge: self.charge_charge + rhs.charge_charge,
            charge_dipole: self.charge_dipole + rhs.charge_dipole,
            dipole_dipole: self.dipole_dipole + rhs.dipole_dipole,
            dispersion: self.dispersion + rhs.dispersion,
            pauli: self.pauli + rhs.pauli,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for EnergyTerm {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            charge_charge: self.charge_charge * rhs,
            charge_dipole: self.charge_dipole * rhs,
            dipole_dipole: self.dipole_dipole * rhs,
            dispersion: self.dispersion * rhs,
            pauli: self.pauli * rhs,
        }
    }
}
