//! Sparse linear solvers for the assembled heat system.
//!
//! Rows holding only their diagonal entry (fixed-value rows) are solved
//! first and moved to the right-hand side, so their values come out exact.
//! The remaining unknowns are solved either by sparse Gaussian elimination
//! or by Jacobi-preconditioned BiCGStab.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::sim::heat_transfer::matrix::CsrMatrix;

/// Linear solver used for the reduced system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// Sparse LU with diagonal-preferring threshold pivoting.
    #[default]
    Lu,
    /// Jacobi right-preconditioned BiCGStab.
    BiCgStab,
}

/// Configuration for the sparse solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparseSolverConfig {
    pub method: SolverMethod,
    /// Maximum number of BiCGStab iterations.
    pub max_iterations: usize,
    /// Relative residual tolerance.
    pub rel_tolerance: f64,
    /// Absolute residual tolerance.
    pub abs_tolerance: f64,
    /// The diagonal is kept as pivot while `|a_kk| >= pivot_threshold * max_i |a_ik|`.
    pub pivot_threshold: f64,
    /// Pivots below `singular_tolerance * max|A|` mean a singular matrix.
    pub singular_tolerance: f64,
}

impl Default for SparseSolverConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::Lu,
            max_iterations: 2000,
            rel_tolerance: 1e-12,
            abs_tolerance: 1e-14,
            pivot_threshold: 0.1,
            singular_tolerance: 1e-12,
        }
    }
}

/// Solves `A x = b`.
///
/// Fails with [`MeshError::SingularSystem`] for an empty row, a vanishing
/// pivot, BiCGStab breakdown or non-convergence, or a non-finite result.
pub fn solve_sparse(a: &CsrMatrix, b: &[f64], config: &SparseSolverConfig) -> MeshResult<Vec<f64>> {
    let n = a.n_rows();
    if a.n_cols() != n || b.len() != n {
        return Err(MeshError::invalid(
            "system",
            format!(
                "expected a square matrix matching the rhs, got {}x{} and {}",
                n,
                a.n_cols(),
                b.len()
            ),
        ));
    }
    if let Some(row) = (0..n).find(|&i| a.row_nnz(i) == 0) {
        return Err(MeshError::singular(Some(row), "row has no entries"));
    }

    let scale = a.max_abs();
    let mut x = vec![0.0; n];
    let mut fixed = vec![false; n];
    for i in 0..n {
        if a.row_nnz(i) == 1 {
            let a_ii = a.get(i, i);
            if a_ii != 0.0 {
                x[i] = b[i] / a_ii;
                fixed[i] = true;
            }
        }
    }

    // Reduced system over the free unknowns
    let free: Vec<usize> = (0..n).filter(|&i| !fixed[i]).collect();
    let mut local = vec![usize::MAX; n];
    for (k, &i) in free.iter().enumerate() {
        local[i] = k;
    }
    let mut rows: Vec<BTreeMap<usize, f64>> = Vec::with_capacity(free.len());
    let mut rhs: Vec<f64> = Vec::with_capacity(free.len());
    for &i in &free {
        let mut row = BTreeMap::new();
        let mut bi = b[i];
        for (j, a_ij) in a.row(i) {
            if fixed[j] {
                bi -= a_ij * x[j];
            } else {
                row.insert(local[j], a_ij);
            }
        }
        rows.push(row);
        rhs.push(bi);
    }
    debug!(
        "Solving {:?}: {} unknowns, {} fixed",
        config.method,
        free.len(),
        n - free.len()
    );

    let reduced = match config.method {
        SolverMethod::Lu => lu_solve(rows, rhs, scale, config),
        SolverMethod::BiCgStab => bicgstab_solve(&rows, &rhs, config),
    }
    .map_err(|err| match err {
        MeshError::SingularSystem {
            row: Some(k),
            reason,
        } => MeshError::singular(free.get(k).copied(), reason),
        other => other,
    })?;

    for (k, &i) in free.iter().enumerate() {
        x[i] = reduced[k];
    }
    if let Some(i) = x.iter().position(|v| !v.is_finite()) {
        return Err(MeshError::singular(Some(i), "solution is not finite"));
    }
    Ok(x)
}

/// Gaussian elimination with row swaps, followed by back substitution.
fn lu_solve(
    mut rows: Vec<BTreeMap<usize, f64>>,
    mut rhs: Vec<f64>,
    scale: f64,
    config: &SparseSolverConfig,
) -> MeshResult<Vec<f64>> {
    let n = rows.len();
    let tiny = config.singular_tolerance * scale.max(f64::MIN_POSITIVE);

    for k in 0..n {
        // Pivot search in column k
        let mut best = k;
        let mut best_abs = 0.0;
        for (r, row) in rows.iter().enumerate().skip(k) {
            let v = row.get(&k).map_or(0.0, |v| v.abs());
            if v > best_abs {
                best_abs = v;
                best = r;
            }
        }
        if best_abs <= tiny {
            return Err(MeshError::singular(Some(k), "pivot vanishes during elimination"));
        }
        let diag_abs = rows[k].get(&k).map_or(0.0, |v| v.abs());
        if diag_abs < config.pivot_threshold * best_abs {
            rows.swap(k, best);
            rhs.swap(k, best);
        }

        let pivot_row: Vec<(usize, f64)> = rows[k]
            .range(k + 1..)
            .map(|(&j, &v)| (j, v))
            .collect();
        let pivot = rows[k].get(&k).copied().unwrap_or(0.0);
        let pivot_rhs = rhs[k];

        for r in (k + 1)..n {
            let Some(a_rk) = rows[r].remove(&k) else {
                continue;
            };
            let factor = a_rk / pivot;
            for &(j, v) in &pivot_row {
                *rows[r].entry(j).or_insert(0.0) -= factor * v;
            }
            rhs[r] -= factor * pivot_rhs;
        }
    }

    let mut x = vec![0.0; n];
    for k in (0..n).rev() {
        let mut sum = rhs[k];
        for (&j, &u_kj) in rows[k].range(k + 1..) {
            sum -= u_kj * x[j];
        }
        x[k] = sum / rows[k].get(&k).copied().unwrap_or(0.0);
    }
    Ok(x)
}

fn bicgstab_solve(
    rows: &[BTreeMap<usize, f64>],
    b: &[f64],
    config: &SparseSolverConfig,
) -> MeshResult<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut diag = vec![0.0; n];
    for (i, row) in rows.iter().enumerate() {
        diag[i] = row.get(&i).copied().unwrap_or(0.0);
        if diag[i].abs() < 1e-30 {
            return Err(MeshError::singular(
                Some(i),
                "zero diagonal, Jacobi preconditioner undefined",
            ));
        }
    }
    let precondition = |v: &[f64], out: &mut [f64]| {
        for i in 0..n {
            out[i] = v[i] / diag[i];
        }
    };

    let mut x = vec![0.0; n];
    let mut r = b.to_vec();
    let r0 = r.clone();

    let b_norm = l2_norm(b).max(1.0);
    let tol = config.abs_tolerance.max(config.rel_tolerance * b_norm);
    if l2_norm(&r) <= tol {
        return Ok(x);
    }

    let mut p = vec![0.0; n];
    let mut v = vec![0.0; n];
    let mut s = vec![0.0; n];
    let mut t = vec![0.0; n];
    let mut p_hat = vec![0.0; n];
    let mut s_hat = vec![0.0; n];
    let (mut rho_old, mut alpha, mut omega) = (1.0, 1.0, 1.0);

    for iter in 0..config.max_iterations {
        let rho = dot(&r0, &r);
        if rho.abs() < 1e-300 {
            return Err(MeshError::singular(None, "BiCGStab breakdown (rho = 0)"));
        }
        let beta = if iter == 0 {
            0.0
        } else {
            (rho / rho_old) * (alpha / omega)
        };
        rho_old = rho;
        for i in 0..n {
            p[i] = r[i] + beta * (p[i] - omega * v[i]);
        }

        precondition(&p, &mut p_hat);
        apply_matrix(rows, &p_hat, &mut v);
        let r0v = dot(&r0, &v);
        if r0v.abs() < 1e-300 {
            return Err(MeshError::singular(None, "BiCGStab breakdown (r0 . v = 0)"));
        }
        alpha = rho / r0v;
        for i in 0..n {
            s[i] = r[i] - alpha * v[i];
        }
        if l2_norm(&s) <= tol {
            for i in 0..n {
                x[i] += alpha * p_hat[i];
            }
            trace!("BiCGStab converged after {} iterations", iter + 1);
            return Ok(x);
        }

        precondition(&s, &mut s_hat);
        apply_matrix(rows, &s_hat, &mut t);
        let tt = dot(&t, &t);
        if tt.abs() < 1e-300 {
            return Err(MeshError::singular(None, "BiCGStab breakdown (t = 0)"));
        }
        omega = dot(&t, &s) / tt;
        for i in 0..n {
            x[i] += alpha * p_hat[i] + omega * s_hat[i];
            r[i] = s[i] - omega * t[i];
        }

        let res = l2_norm(&r);
        trace!("BiCGStab iter {}: residual = {:.6e}", iter + 1, res);
        if res <= tol {
            return Ok(x);
        }
        if omega.abs() < 1e-300 {
            return Err(MeshError::singular(None, "BiCGStab stagnated (omega = 0)"));
        }
    }

    Err(MeshError::singular(
        None,
        format!(
            "BiCGStab did not converge in {} iterations",
            config.max_iterations
        ),
    ))
}

fn apply_matrix(rows: &[BTreeMap<usize, f64>], x: &[f64], y: &mut [f64]) {
    for (i, row) in rows.iter().enumerate() {
        y[i] = row.iter().map(|(&j, a_ij)| a_ij * x[j]).sum();
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}
