use crate::core::forcefield::params::ParameterError;
use nalgebra::DMatrix;

/// Symmetric pair-inclusion weights.
///
/// A pair `(i, j)` contributes to every sum iff its weight is strictly
/// positive, and its contribution is scaled by that weight. The diagonal is
/// always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionMask {
    weights: DMatrix<f64>,
}

impl ExclusionMask {
    pub fn full(atom_count: usize) -> Self {
        let mut weights = DMatrix::from_element(atom_count, atom_count, 1.0);
        weights.fill_diagonal(0.0);
        Self { weights }
    }

    /// Wraps a square weight matrix, forcing its diagonal to zero.
    /// Off-diagonal weights must be finite.
    ///
    /// Symmetry of the values is the caller's responsibility; see
    /// [`ExclusionMask::is_symmetric`].
    pub fn from_matrix(mut weights: DMatrix<f64>) -> Result<Self, ParameterError> {
        if weights.nrows() != weights.ncols() {
            return Err(ParameterError::DimensionMismatch {
                what: "mask columns",
                expected: weights.nrows(),
                found: weights.ncols(),
            });
        }
        weights.fill_diagonal(0.0);
        if let Some(&value) = weights.iter().find(|value| !value.is_finite()) {
            return Err(ParameterError::InvalidValue {
                what: "mask weight",
                value,
            });
        }
        Ok(Self { weights })
    }

    pub fn from_bools(rows: &[Vec<bool>]) -> Result<Self, ParameterError> {
        let atom_count = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != atom_count) {
            return Err(ParameterError::DimensionMismatch {
                what: "mask columns",
                expected: atom_count,
                found: row.len(),
            });
        }
        let weights = DMatrix::from_fn(atom_count, atom_count, |i, j| {
            if rows[i][j] { 1.0 } else { 0.0 }
        });
        Self::from_matrix(weights)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.weights.nrows()
    }

    #[inline]
    pub fn weight(&self, index1: usize, index2: usize) -> f64 {
        self.weights[(index1, index2)]
    }

    #[inline]
    pub fn is_included(&self, index1: usize, index2: usize) -> bool {
        self.weight(index1, index2) > 0.0
    }

    pub fn exclude(&mut self, index1: usize, index2: usize) {
        self.write_pair(index1, index2, 0.0);
    }

    /// Sets the weight of both orientations of a pair. Writes to the
    /// diagonal are ignored.
    pub fn set_weight(
        &mut self,
        index1: usize,
        index2: usize,
        weight: f64,
    ) -> Result<(), ParameterError> {
        if !weight.is_finite() {
            return Err(ParameterError::InvalidValue {
                what: "mask weight",
                value: weight,
            });
        }
        self.write_pair(index1, index2, weight);
        Ok(())
    }

    fn write_pair(&mut self, index1: usize, index2: usize, weight: f64) {
        if index1 == index2 {
            return;
        }
        self.weights[(index1, index2)] = weight;
        self.weights[(index2, index1)] = weight;
    }

    pub fn is_symmetric(&self) -> bool {
        self.weights == self.weights.transpose()
    }

    pub fn included_pair_count(&self) -> usize {
        let n = self.atom_count();
        (0..n)
            .map(|i| ((i + 1)..n).filter(|&j| self.is_included(i, j)).count())
            .sum()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mask_includes_every_off_diagonal_pair() {
        let mask = ExclusionMask::full(3);
        assert_eq!(mask.atom_count(), 3);
        assert_eq!(mask.included_pair_count(), 3);
        for i in 0..3 {
            assert!(!mask.is_included(i, i));
        }
        assert!(mask.is_included(0, 2));
        assert!(mask.is_included(2, 0));
    }

    #[test]
    fn from_matrix_forces_the_diagonal_off() {
        let mask = ExclusionMask::from_matrix(DMatrix::from_element(2, 2, 1.0)).unwrap();
        assert_eq!(mask.weight(0, 0), 0.0);
        assert_eq!(mask.weight(1, 1), 0.0);
        assert_eq!(mask.weight(0, 1), 1.0);
    }

    #[test]
    fn from_matrix_rejects_non_square_input() {
        let result = ExclusionMask::from_matrix(DMatrix::from_element(2, 3, 1.0));
        assert_eq!(
            result,
            Err(ParameterError::DimensionMismatch {
                what: "mask columns",
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn from_bools_rejects_ragged_rows() {
        let result = ExclusionMask::from_bools(&[vec![false, true], vec![true]]);
        assert!(matches!(
            result,
            Err(ParameterError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn from_bools_maps_flags_to_unit_weights() {
        let mask = ExclusionMask::from_bools(&[
            vec![true, true, false],
            vec![true, true, true],
            vec![false, true, true],
        ])
        .unwrap();
        assert_eq!(mask.weight(0, 1), 1.0);
        assert_eq!(mask.weight(0, 2), 0.0);
        assert_eq!(mask.weight(2, 2), 0.0);
        assert_eq!(mask.included_pair_count(), 2);
    }

    #[test]
    fn exclude_switches_off_both_orientations() {
        let mut mask = ExclusionMask::full(3);
        mask.exclude(2, 1);
        assert!(!mask.is_included(1, 2));
        assert!(!mask.is_included(2, 1));
        assert!(mask.is_symmetric());
    }

    #[test]
    fn set_weight_ignores_the_diagonal() {
        let mut mask = ExclusionMask::full(2);
        mask.set_weight(1, 1, 5.0).unwrap();
        assert_eq!(mask.weight(1, 1), 0.0);
    }

    #[test]
    fn negative_weights_exclude_the_pair() {
        let mut mask = ExclusionMask::full(2);
        mask.set_weight(0, 1, -0.5).unwrap();
        assert!(!mask.is_included(0, 1));
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let mut mask = ExclusionMask::full(2);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                mask.set_weight(0, 1, value),
                Err(ParameterError::InvalidValue { what: "mask weight", .. })
            ));
        }
        assert_eq!(mask, ExclusionMask::full(2));

        let mut weights = DMatrix::from_element(3, 3, 1.0);
        weights[(2, 0)] = f64::NAN;
        assert!(matches!(
            ExclusionMask::from_matrix(weights),
            Err(ParameterError::InvalidValue { what: "mask weight", .. })
        ));
    }

    #[test]
    fn non_finite_diagonal_entries_are_overwritten() {
        let mut weights = DMatrix::from_element(2, 2, 1.0);
        weights.fill_diagonal(f64::NAN);
        let mask = ExclusionMask::from_matrix(weights).unwrap();
        assert_eq!(mask, ExclusionMask::full(2));
    }

    #[test]
    fn asymmetric_values_are_detected() {
        let mut weights = DMatrix::from_element(2, 2, 1.0);
        weights[(0, 1)] = 0.5;
        let mask = ExclusionMask::from_matrix(weights).unwrap();
        assert!(!mask.is_symmetric());
    }

    #[test]
    fn empty_mask_has_no_pairs() {
        let mask = ExclusionMask::full(0);
        assert_eq!(mask.atom_count(), 0);
        assert_eq!(mask.included_pair_count(), 0);
    }
}
