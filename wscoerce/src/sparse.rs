//! Sparse matrices in coordinate (row, column, value) form

use crate::array::NdArray;
use crate::value::{Value, write_float};
use serde::Serialize;
use std::fmt;

/// Coordinate-form sparse matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CooMatrix {
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl CooMatrix {
    /// Build from triplets; every coordinate must lie inside the shape
    pub fn from_triplets(
        shape: (usize, usize),
        rows: Vec<usize>,
        cols: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self, String> {
        if rows.len() != values.len() || cols.len() != values.len() {
            return Err(format!(
                "row, column and data arrays must have equal length ({}, {}, {})",
                rows.len(),
                cols.len(),
                values.len()
            ));
        }
        if let Some((r, c)) = rows
            .iter()
            .zip(&cols)
            .find(|(r, c)| **r >= shape.0 || **c >= shape.1)
        {
            return Err(format!(
                "coordinate ({r}, {c}) outside a {}x{} matrix",
                shape.0, shape.1
            ));
        }
        Ok(Self {
            nrows: shape.0,
            ncols: shape.1,
            rows,
            cols,
            values,
        })
    }

    /// Keep the nonzero entries of a 2-D dense array, in row-major order
    pub fn from_dense(dense: &NdArray<f64>) -> Result<Self, String> {
        let [nrows, ncols] = dense.shape()[..] else {
            return Err(format!(
                "expected dimension <= 2 array or matrix, got {} dimensions",
                dense.ndim()
            ));
        };
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut values = Vec::new();
        for (offset, &x) in dense.data().iter().enumerate() {
            if x != 0.0 {
                rows.push(offset / ncols);
                cols.push(offset % ncols);
                values.push(x);
            }
        }
        Ok(Self {
            nrows,
            ncols,
            rows,
            cols,
            values,
        })
    }

    /// Accepts an existing sparse matrix, the triplet form
    /// `(data, (row, col))`, or anything that forms a dense array of rank <= 2
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if let Value::Sparse(matrix) = value {
            return Ok(matrix.clone());
        }
        if let Some((data, row, col)) = triplet_parts(value) {
            let values = NdArray::<f64>::from_value(data, 1)?.into_vec();
            let rows = indices(row)?;
            let cols = indices(col)?;
            let nrows = rows.iter().max().map_or(0, |r| r + 1);
            let ncols = cols.iter().max().map_or(0, |c| c + 1);
            return Self::from_triplets((nrows, ncols), rows, cols, values);
        }
        let dense = NdArray::<f64>::from_value(value, 2)?;
        Self::from_dense(&dense)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Duplicate coordinates are summed. Fails when the dense form cannot be
    /// allocated.
    pub fn to_dense(&self) -> Result<NdArray<f64>, String> {
        let too_large = || {
            format!(
                "a dense {}x{} matrix is too large to allocate",
                self.nrows, self.ncols
            )
        };
        let len = self.nrows.checked_mul(self.ncols).ok_or_else(too_large)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0.0);
        for (r, c, v) in self.triplets() {
            data[r * self.ncols + c] += v;
        }
        Ok(NdArray::from_parts(vec![self.nrows, self.ncols], data))
    }
}

/// Recognizes `[data, [row, col]]` where all three are flat sequences
fn triplet_parts(value: &Value) -> Option<(&Value, &Value, &Value)> {
    let [data, coords] = value.as_list()? else {
        return None;
    };
    let [row, col] = coords.as_list()? else {
        return None;
    };
    let flat = |v: &Value| v.as_list().is_some_and(|items| items.iter().all(Value::is_scalar));
    (flat(data) && flat(row) && flat(col)).then_some((data, row, col))
}

fn indices(value: &Value) -> Result<Vec<usize>, String> {
    NdArray::<i64>::from_value(value, 1)?
        .into_vec()
        .into_iter()
        .map(|i| usize::try_from(i).map_err(|_| format!("negative coordinate {i}")))
        .collect()
}

impl fmt::Display for CooMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |f: &mut fmt::Formatter<'_>, items: &[usize]| -> fmt::Result {
            let joined: Vec<String> = items.iter().map(usize::to_string).collect();
            write!(f, "[{}]", joined.join(", "))
        };
        write!(f, "([")?;
        for (i, &v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_float(f, v)?;
        }
        write!(f, "], (")?;
        list(f, &self.rows)?;
        write!(f, ", ")?;
        list(f, &self.cols)?;
        write!(f, "))")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(rows: Vec<Vec<f64>>) -> Value {
        Value::List(rows.into_iter().map(Value::from).collect())
    }

    #[test]
    fn test_from_dense_drops_zeros() {
        let matrix = CooMatrix::from_value(&dense(vec![vec![0.0, 2.0], vec![3.0, 0.0]])).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.triplets().collect::<Vec<_>>(), vec![(0, 1, 2.0), (1, 0, 3.0)]);
    }

    #[test]
    fn test_flat_sequence_is_single_row() {
        let matrix = CooMatrix::from_value(&Value::from(vec![1.0f64, 0.0, 5.0])).unwrap();
        assert_eq!(matrix.shape(), (1, 3));
        assert_eq!(matrix.triplets().count(), 2);
    }

    #[test]
    fn test_triplet_form() {
        let value = Value::List(vec![
            Value::from(vec![4.0f64, 5.0]),
            Value::List(vec![Value::from(vec![0i64, 2]), Value::from(vec![1i64, 3])]),
        ]);
        let matrix = CooMatrix::from_value(&value).unwrap();
        assert_eq!(matrix.shape(), (3, 4));
        assert_eq!(matrix.triplets().collect::<Vec<_>>(), vec![(0, 1, 4.0), (2, 3, 5.0)]);
    }

    #[test]
    fn test_triplet_negative_coordinate() {
        let value = Value::List(vec![
            Value::from(vec![1.0f64]),
            Value::List(vec![Value::from(vec![-1i64]), Value::from(vec![0i64])]),
        ]);
        assert!(CooMatrix::from_value(&value).unwrap_err().contains("negative"));
    }

    #[test]
    fn test_two_row_dense_is_not_triplet() {
        let matrix = CooMatrix::from_value(&dense(vec![vec![1.0, 2.0], vec![3.0, 4.0]])).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.triplets().count(), 4);
    }

    #[test]
    fn test_three_dimensions_rejected() {
        let value = Value::List(vec![dense(vec![vec![1.0]])]);
        assert!(CooMatrix::from_value(&value).is_err());
    }

    #[test]
    fn test_from_triplets_checks_bounds() {
        let err = CooMatrix::from_triplets((2, 2), vec![2], vec![0], vec![1.0]).unwrap_err();
        assert!(err.contains("outside"));
        assert!(CooMatrix::from_triplets((2, 2), vec![0], vec![], vec![1.0]).is_err());
    }

    #[test]
    fn test_to_dense_sums_duplicates() {
        let matrix = CooMatrix::from_triplets((1, 2), vec![0, 0], vec![1, 1], vec![1.0, 2.0]).unwrap();
        assert_eq!(matrix.to_dense().unwrap().data(), &[0.0, 3.0]);
    }

    #[test]
    fn test_to_dense_refuses_huge_shape() {
        let huge = CooMatrix::from_triplets(
            (4_000_000_001, 4_000_000_001),
            vec![4_000_000_000],
            vec![4_000_000_000],
            vec![1.0],
        )
        .unwrap();
        assert!(huge.to_dense().unwrap_err().contains("too large"));

        let overflow =
            CooMatrix::from_triplets((usize::MAX, 2), vec![0], vec![0], vec![1.0]).unwrap();
        assert!(overflow.to_dense().is_err());
    }

    #[test]
    fn test_sparse_passes_through() {
        let matrix = CooMatrix::from_triplets((3, 3), vec![1], vec![1], vec![7.0]).unwrap();
        let again = CooMatrix::from_value(&Value::Sparse(matrix.clone())).unwrap();
        assert_eq!(again, matrix);
    }

    #[test]
    fn test_display_is_triplet_literal() {
        let matrix = CooMatrix::from_triplets((2, 2), vec![0, 1], vec![1, 0], vec![2.0, 3.0]).unwrap();
        assert_eq!(matrix.to_string(), "([2.0, 3.0], ([0, 1], [1, 0]))");
    }
}
