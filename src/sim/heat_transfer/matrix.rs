//! Sparse matrices: a row-map builder for assembly and a compressed sparse
//! row (CSR) matrix for solving.

use std::collections::BTreeMap;

/// Mutable sparse matrix used during assembly.
///
/// Each row is an ordered column -> value map, so accumulation, row
/// replacement and conversion to CSR are all cheap.
#[derive(Debug, Clone)]
pub struct SparseMatrixBuilder {
    n_cols: usize,
    rows: Vec<BTreeMap<usize, f64>>,
}

impl SparseMatrixBuilder {
    /// Creates an all-zero `n x n` matrix.
    pub fn new(n: usize) -> Self {
        Self {
            n_cols: n,
            rows: vec![BTreeMap::new(); n],
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// `A[row, col] += value`
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(col < self.n_cols);
        *self.rows[row].entry(col).or_insert(0.0) += value;
    }

    /// `A[row, col] = value`
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(col < self.n_cols);
        self.rows[row].insert(col, value);
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row].get(&col).copied().unwrap_or(0.0)
    }

    /// Zeroes a whole row.
    pub fn clear_row(&mut self, row: usize) {
        self.rows[row].clear();
    }

    /// Freezes the matrix. Exact zeros are dropped.
    pub fn build(self) -> CsrMatrix {
        let mut row_ptr = Vec::with_capacity(self.rows.len() + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);
        for row in &self.rows {
            for (&col, &value) in row {
                if value != 0.0 {
                    col_idx.push(col);
                    values.push(value);
                }
            }
            row_ptr.push(col_idx.len());
        }
        CsrMatrix {
            n_rows: self.rows.len(),
            n_cols: self.n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

/// Compressed sparse row matrix with sorted column indices per row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored non-zeros.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values of a row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    #[inline]
    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        match self.col_idx[start..end].binary_search(&col) {
            Ok(local) => self.values[start + local],
            Err(_) => 0.0,
        }
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.n_rows).map(|i| self.get(i, i)).collect()
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// `y = A * x`
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        for (i, yi) in y.iter_mut().enumerate().take(self.n_rows) {
            *yi = self.row(i).map(|(j, a_ij)| a_ij * x[j]).sum();
        }
    }
}
