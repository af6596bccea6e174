use nalgebra::{DMatrix, Matrix3};
use std::ops::{Add, AddAssign};

/// Hessian stored as an `N x N` grid of Cartesian `3 x 3` blocks.
///
/// Block `(i, j)` holds `d^2 E / (d r_i d r_j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HessianBlocks {
    atom_count: usize,
    blocks: Vec<Matrix3<f64>>,
}

impl HessianBlocks {
    pub fn zeros(atom_count: usize) -> Self {
        Self {
            atom_count,
            blocks: vec![Matrix3::zeros(); atom_count * atom_count],
        }
    }

    /// Builds the grid from blocks listed row by row.
    pub(crate) fn from_rows(atom_count: usize, rows: Vec<Vec<Matrix3<f64>>>) -> Self {
        let blocks: Vec<_> = rows.into_iter().flatten().collect();
        debug_assert_eq!(blocks.len(), atom_count * atom_count);
        Self { atom_count, blocks }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    #[inline]
    pub fn block(&self, index1: usize, index2: usize) -> &Matrix3<f64> {
        &self.blocks[index1 * self.atom_count + index2]
    }

    #[inline]
    pub fn block_mut(&mut self, index1: usize, index2: usize) -> &mut Matrix3<f64> {
        &mut self.blocks[index1 * self.atom_count + index2]
    }

    /// The `3N x 3N` matrix with rows and columns ordered atom-major.
    pub fn to_flat(&self) -> DMatrix<f64> {
        let n = self.atom_count;
        DMatrix::from_fn(3 * n, 3 * n, |row, col| {
            self.block(row / 3, col / 3)[(row % 3, col % 3)]
        })
    }

    pub fn max_abs(&self) -> f64 {
        self.blocks
            .iter()
            .flat_map(|block| block.iter())
            .fold(0.0, |acc: f64, value| acc.max(value.abs()))
    }
}

impl AddAssign<&HessianBlocks> for HessianBlocks {
    fn add_assign(&mut self, rhs: &HessianBlocks) {
        debug_assert_eq!(self.atom_count, rhs.atom_count);
        for (lhs, rhs) in self.blocks.iter_mut().zip(&rhs.blocks) {
            *lhs += rhs;
        }
    }
}

impl Add for HessianBlocks {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}
