use nalgebra::{DMatrix, Matrix3, Point3, Vector3};

/// Geometry of one ordered atom pair `(index1, index2)`.
///
/// `delta` points from atom `index2` to atom `index1`, so the pair seen from
/// the other side has the opposite `delta` and `direction` but the same
/// `distance` and `outer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    pub index1: usize,
    pub index2: usize,
    pub delta: Vector3<f64>,
    pub distance: f64,
    pub direction: Vector3<f64>,
    pub outer: Matrix3<f64>,
}

/// Pairwise displacements, distances, unit directions and direction outer
/// products for every ordered atom pair of one coordinate set.
///
/// Self pairs keep zero direction and outer product. Two distinct atoms at
/// the same position give a non-finite direction; atoms must be distinct.
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    atom_count: usize,
    deltas: Vec<Vector3<f64>>,
    distances: DMatrix<f64>,
    directions: Vec<Vector3<f64>>,
    outers: Vec<Matrix3<f64>>,
}

impl GeometryCache {
    pub fn new(coordinates: &[Point3<f64>]) -> Self {
        let n = coordinates.len();
        let mut deltas = vec![Vector3::zeros(); n * n];
        let mut distances = DMatrix::zeros(n, n);
        let mut directions = vec![Vector3::zeros(); n * n];
        let mut outers = vec![Matrix3::zeros(); n * n];

        for (index1, coordinate1) in coordinates.iter().enumerate() {
            for (index2, coordinate2) in coordinates.iter().enumerate() {
                let slot = index1 * n + index2;
                let delta = coordinate1 - coordinate2;
                let distance = delta.norm();
                deltas[slot] = delta;
                distances[(index1, index2)] = distance;
                if index1 != index2 {
                    let direction = delta / distance;
                    directions[slot] = direction;
                    outers[slot] = direction * direction.transpose();
                }
            }
        }

        Self {
            atom_count: n,
            deltas,
            distances,
            directions,
            outers,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    #[inline]
    fn slot(&self, index1: usize, index2: usize) -> usize {
        index1 * self.atom_count + index2
    }

    #[inline]
    pub fn delta(&self, index1: usize, index2: usize) -> &Vector3<f64> {
        &self.deltas[self.slot(index1, index2)]
    }

    #[inline]
    pub fn distance(&self, index1: usize, index2: usize) -> f64 {
        self.distances[(index1, index2)]
    }

    #[inline]
    pub fn direction(&self, index1: usize, index2: usize) -> &Vector3<f64> {
        &self.directions[self.slot(index1, index2)]
    }

    #[inline]
    pub fn outer(&self, index1: usize, index2: usize) -> &Matrix3<f64> {
        &self.outers[self.slot(index1, index2)]
    }

    pub fn distances(&self) -> &DMatrix<f64> {
        &self.distances
    }

    pub fn pair(&self, index1: usize, index2: usize) -> PairGeometry {
        let slot = self.slot(index1, index2);
        PairGeometry {
            index1,
            index2,
            delta: self.deltas[slot],
            distance: self.distances[(index1, index2)],
            direction: self.directions[slot],
            outer: self.outers[slot],
        }
    }
}
