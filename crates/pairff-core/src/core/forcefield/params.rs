use crate::core::mask::ExclusionMask;
use nalgebra::{DMatrix, Point3, Vector3};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },
    #[error("Atom index {index} is out of range for a system of {atom_count} atoms")]
    AtomIndexOutOfRange { index: usize, atom_count: usize },
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScaledPair {
    pub pair: [usize; 2],
    pub weight: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct MaskParams {
    #[serde(default)]
    pub exclude: Vec<[usize; 2]>,
    #[serde(default)]
    pub scale: Vec<ScaledPair>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CoulombParams {
    pub charges: Option<Vec<f64>>,
    pub dipoles: Option<Vec<[f64; 3]>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum StrengthParams {
    Uniform { uniform: f64 },
    Matrix { matrix: Vec<Vec<f64>> },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SystemParams {
    pub coordinates: Vec<[f64; 3]>,
    #[serde(default)]
    pub mask: MaskParams,
    pub coulomb: Option<CoulombParams>,
    pub dispersion: Option<StrengthParams>,
    pub pauli: Option<StrengthParams>,
}

impl StrengthParams {
    /// Expands the parameters into a full `n x n` strength matrix.
    ///
    /// A uniform strength fills every element, the diagonal included; self
    /// pairs never contribute because the mask excludes them.
    pub fn to_matrix(&self, atom_count: usize) -> Result<DMatrix<f64>, ParameterError> {
        match self {
            StrengthParams::Uniform { uniform } => {
                Ok(DMatrix::from_element(atom_count, atom_count, *uniform))
            }
            StrengthParams::Matrix { matrix } => rows_to_matrix(matrix, atom_count, "strengths"),
        }
    }
}

impl SystemParams {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn atom_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.coordinates
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect()
    }

    pub fn mask(&self) -> Result<ExclusionMask, ParameterError> {
        let atom_count = self.atom_count();
        let mut mask = ExclusionMask::full(atom_count);
        for &[i, j] in &self.mask.exclude {
            check_index(i, atom_count)?;
            check_index(j, atom_count)?;
            mask.exclude(i, j);
        }
        for scaled in &self.mask.scale {
            let [i, j] = scaled.pair;
            check_index(i, atom_count)?;
            check_index(j, atom_count)?;
            mask.set_weight(i, j, scaled.weight)?;
        }
        Ok(mask)
    }
}

impl CoulombParams {
    pub fn dipole_vectors(&self) -> Option<Vec<Vector3<f64>>> {
        self.dipoles
            .as_ref()
            .map(|d| d.iter().map(|&[x, y, z]| Vector3::new(x, y, z)).collect())
    }
}

fn check_index(index: usize, atom_count: usize) -> Result<(), ParameterError> {
    if index < atom_count {
        Ok(())
    } else {
        Err(ParameterError::AtomIndexOutOfRange { index, atom_count })
    }
}

pub(crate) fn rows_to_matrix(
    rows: &[Vec<f64>],
    atom_count: usize,
    what: &'static str,
) -> Result<DMatrix<f64>, ParameterError> {
    if rows.len() != atom_count {
        return Err(ParameterError::DimensionMismatch {
            what,
            expected: atom_count,
            found: rows.len(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != atom_count) {
        return Err(ParameterError::DimensionMismatch {
            what,
            expected: atom_count,
            found: row.len(),
        });
    }
    Ok(DMatrix::from_fn(atom_count, atom_count, |i, j| rows[i][j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SYSTEM_TOML: &str = r#"
        coordinates = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]

        [mask]
        exclude = [[0, 1]]
        scale = [{ pair = [0, 2], weight = 0.5 }]

        [coulomb]
        charges = [1.0, -1.0, 0.5]

        [dispersion]
        uniform = -2.0

        [pauli]
        matrix = [[0.0, 1.0, 2.0], [1.0, 0.0, 3.0], [2.0, 3.0, 0.0]]
    "#;

    #[test]
    fn from_toml_str_parses_all_sections() {
        let params = SystemParams::from_toml_str(SYSTEM_TOML).unwrap();
        assert_eq!(params.atom_count(), 3);
        assert_eq!(params.mask.exclude, vec![[0, 1]]);
        assert_eq!(
            params.mask.scale,
            vec![ScaledPair {
                pair: [0, 2],
                weight: 0.5
            }]
        );
        assert_eq!(
            params.coulomb.as_ref().unwrap().charges,
            Some(vec![1.0, -1.0, 0.5])
        );
        assert!(params.coulomb.as_ref().unwrap().dipoles.is_none());
        assert_eq!(
            params.dispersion,
            Some(StrengthParams::Uniform { uniform: -2.0 })
        );
        assert!(matches!(
            params.pauli,
            Some(StrengthParams::Matrix { .. })
        ));
    }

    #[test]
    fn mask_applies_exclusions_and_weights_symmetrically() {
        let params = SystemParams::from_toml_str(SYSTEM_TOML).unwrap();
        let mask = params.mask().unwrap();
        assert_eq!(mask.weight(0, 1), 0.0);
        assert_eq!(mask.weight(1, 0), 0.0);
        assert_eq!(mask.weight(0, 2), 0.5);
        assert_eq!(mask.weight(2, 0), 0.5);
        assert_eq!(mask.weight(1, 2), 1.0);
    }

    #[test]
    fn mask_rejects_out_of_range_exclusion() {
        let mut params = SystemParams::from_toml_str(SYSTEM_TOML).unwrap();
        params.mask.exclude.push([0, 7]);
        assert_eq!(
            params.mask(),
            Err(ParameterError::AtomIndexOutOfRange {
                index: 7,
                atom_count: 3
            })
        );
    }

    #[test]
    fn mask_rejects_non_finite_weight() {
        let params = SystemParams::from_toml_str(
            r#"
            coordinates = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]

            [mask]
            scale = [{ pair = [0, 1], weight = nan }]
        "#,
        )
        .unwrap();
        assert!(matches!(
            params.mask(),
            Err(ParameterError::InvalidValue { what: "mask weight", value }) if value.is_nan()
        ));
    }

    #[test]
    fn uniform_strengths_expand_to_full_matrix() {
        let strengths = StrengthParams::Uniform { uniform: 4.0 }.to_matrix(2).unwrap();
        assert_eq!(strengths, DMatrix::from_element(2, 2, 4.0));
    }

    #[test]
    fn ragged_strength_matrix_is_a_dimension_mismatch() {
        let params = StrengthParams::Matrix {
            matrix: vec![vec![0.0, 1.0], vec![1.0]],
        };
        assert_eq!(
            params.to_matrix(2),
            Err(ParameterError::DimensionMismatch {
                what: "strengths",
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn strength_matrix_with_wrong_row_count_is_a_dimension_mismatch() {
        let params = StrengthParams::Matrix {
            matrix: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        };
        assert!(matches!(
            params.to_matrix(3),
            Err(ParameterError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = SystemParams::from_toml_str(
            r#"
            coordinates = []
            [coulomb]
            charge = [1.0]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_succeeds_with_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("system.toml");
        fs::write(&file_path, SYSTEM_TOML).unwrap();

        let params = SystemParams::load(&file_path).unwrap();
        assert_eq!(params.positions()[2], Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("non_existent.toml");
        let result = SystemParams::load(&file_path);
        assert!(matches!(result, Err(ParamLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("malformed.toml");
        fs::write(&file_path, "this is not toml").unwrap();
        let result = SystemParams::load(&file_path);
        assert!(matches!(result, Err(ParamLoadError::Toml { .. })));
    }
}
