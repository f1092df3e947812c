//! Least-squares solver with coefficient covariance.
//!
//! Every model in a family analysis reduces to a small linear regression
//! problem (a handful of columns, typical sample sizes), so we solve each
//! one directly:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - The same SVD factors give us rank detection and the unscaled
//!   coefficient covariance `(XᵀX)⁻¹` needed for standard errors, so we
//!   never form the normal equations explicitly.

use nalgebra::{DMatrix, DVector};

/// Relative singular-value cutoff for rank detection.
const RANK_TOL: f64 = 1e-10;

/// Solution of a least-squares problem plus inference inputs.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// Unscaled coefficient covariance `(XᵀX)⁻¹`.
    ///
    /// Multiply by the residual variance estimate to get the coefficient
    /// covariance matrix.
    pub cov_unscaled: DMatrix<f64>,
    pub rank: usize,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is rank deficient or too ill-conditioned to
/// solve robustly. Collinear family entries (e.g. an auxiliary column that
/// duplicates the primary) land here and become per-entry skips upstream.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<LeastSquares> {
    let p = x.ncols();
    let svd = x.clone().svd(true, true);

    let s = &svd.singular_values;
    if s.len() == 0 {
        return None;
    }
    let s_max = s.max();
    if !(s_max.is_finite() && s_max > 0.0) {
        return None;
    }
    let cutoff = RANK_TOL * s_max;
    let rank = s.iter().filter(|&&sv| sv > cutoff).count();
    if rank < p {
        return None;
    }

    // Try progressively looser tolerances if the strict solve fails.
    let mut beta = None;
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(b) = svd.solve(y, tol) {
            if b.iter().all(|v| v.is_finite()) {
                beta = Some(b);
                break;
            }
        }
    }
    let beta = beta?;

    // (XᵀX)⁻¹ = V Σ⁻² Vᵀ from the thin SVD factors.
    let v_t = svd.v_t.as_ref()?;
    let mut cov = DMatrix::<f64>::zeros(p, p);
    for i in 0..p {
        for j in 0..p {
            let mut sum = 0.0;
            for k in 0..s.len() {
                if s[k] > cutoff {
                    sum += v_t[(k, i)] * v_t[(k, j)] / (s[k] * s[k]);
                }
            }
            cov[(i, j)] = sum;
        }
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(LeastSquares {
        beta,
        cov_unscaled: cov,
        rank,
    })
}
