use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Dense row-major matrix of `f64`
///
/// This is the only matrix representation used by the solver core. The
/// problems it targets are classroom-sized, so a flat `Vec<f64>` with
/// explicit dimensions beats anything fancier.
///
/// Element `(i, j)` lives at `data[i * cols + j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Number of rows (m)
    pub rows: usize,

    /// Number of columns (n)
    pub cols: usize,

    /// Row-major storage, `rows * cols` elements
    pub data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data
    ///
    /// Returns [`SolverError::Shape`] when `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, SolverError> {
        if data.len() != rows * cols {
            return Err(SolverError::Shape(format!(
                "matrix {}x{} needs {} elements, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// All-zero matrix of the given dimensions
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Element at `(i, j)`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j]
    }

    /// Overwrite element at `(i, j)`
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = value;
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Column `j` copied into a fresh vector
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    /// Append one row at the bottom
    ///
    /// Returns [`SolverError::Shape`] when the row length does not match
    /// `cols`.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), SolverError> {
        if row.len() != self.cols {
            return Err(SolverError::Shape(format!(
                "row of length {} pushed onto matrix with {} columns",
                row.len(),
                self.cols
            )));
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Transposed copy (used to build the dual model)
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }
}
