//! Single-model fitting with inference.
//!
//! Given a response vector and resolved design columns (primary first, then
//! auxiliary), we:
//!
//! - build the design matrix `X = [1 | primary | auxiliary]`
//! - solve by OLS (gaussian) or logistic IRLS (binomial)
//! - compute standard errors and two-sided p-values per coefficient
//! - derive the fit line projected onto the primary axis
//!
//! All failures here are plain `AppError`s; whether a failure is fatal or a
//! per-entry skip is decided by the orchestration layer.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CoefEstimate, FitFamily, FitLine, FitSummary};
use crate::error::AppError;
use crate::fit::design::DesignColumn;
use crate::math::{fit_logistic, pvalue_t, pvalue_z, solve_least_squares};

/// Minimum residual degrees of freedom required for inference.
const MIN_DF: usize = 1;

/// Fit one model and summarize its coefficients.
pub fn fit_linear_model(
    y: &[f64],
    primary: &[DesignColumn],
    auxiliary: &[DesignColumn],
    family: FitFamily,
) -> Result<FitSummary, AppError> {
    let n = y.len();
    let p = 1 + primary.len() + auxiliary.len();

    if n == 0 {
        return Err(AppError::data("No observations to fit."));
    }
    if primary.is_empty() {
        return Err(AppError::input("Model has no primary term."));
    }
    if n < p + MIN_DF {
        return Err(AppError::data(format!(
            "Underdetermined model: n={n} < p+{MIN_DF}={}.",
            p + MIN_DF
        )));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::data("Non-finite value in response."));
    }
    for col in primary.iter().chain(auxiliary.iter()) {
        if col.values.len() != n {
            return Err(AppError::data(format!(
                "Column `{}` has {} rows; response has {n}.",
                col.label,
                col.values.len()
            )));
        }
        if col.values.iter().any(|v| !v.is_finite()) {
            return Err(AppError::data(format!(
                "Non-finite value in column `{}`.",
                col.label
            )));
        }
    }

    // X = [1 | primary | auxiliary], column-major over the resolved columns.
    let columns: Vec<&DesignColumn> = primary.iter().chain(auxiliary.iter()).collect();
    let x = DMatrix::from_fn(n, p, |i, j| {
        if j == 0 {
            1.0
        } else {
            columns[j - 1].values[i]
        }
    });
    let y_vec = DVector::from_column_slice(y);

    let (beta, std_errors, p_values, df_residual) = match family {
        FitFamily::Gaussian => fit_gaussian(&x, &y_vec)?,
        FitFamily::Binomial => fit_binomial(&x, &y_vec)?,
    };

    let estimate = |idx: usize, term: &str| CoefEstimate {
        term: term.to_string(),
        estimate: beta[idx],
        std_error: std_errors[idx],
        p_value: p_values[idx],
    };

    let intercept = estimate(0, "(intercept)");
    let primary_coefs: Vec<CoefEstimate> = primary
        .iter()
        .enumerate()
        .map(|(k, col)| estimate(1 + k, &col.label))
        .collect();
    let auxiliary_coefs: Vec<CoefEstimate> = auxiliary
        .iter()
        .enumerate()
        .map(|(k, col)| estimate(1 + primary.len() + k, &col.label))
        .collect();

    // Fit line on the first primary column, holding every other column at
    // its mean contribution.
    let mut line_intercept = beta[0];
    for (j, col) in columns.iter().enumerate().skip(1) {
        let mean = col.values.iter().sum::<f64>() / n as f64;
        line_intercept += beta[j + 1] * mean;
    }
    let line = FitLine {
        intercept: line_intercept,
        slope: beta[1],
    };

    Ok(FitSummary {
        intercept,
        primary: primary_coefs,
        auxiliary: auxiliary_coefs,
        df_residual,
        n_obs: n,
        line,
    })
}

type FitParts = (DVector<f64>, Vec<f64>, Vec<f64>, f64);

fn fit_gaussian(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<FitParts, AppError> {
    let n = x.nrows();
    let p = x.ncols();

    let ls = solve_least_squares(x, y).ok_or_else(|| {
        AppError::numeric("Design matrix is rank deficient or ill-conditioned.")
    })?;

    let fitted = x * &ls.beta;
    let mut sse = 0.0;
    for i in 0..n {
        let r = y[i] - fitted[i];
        sse += r * r;
    }
    let df = (n - p) as f64;
    let sigma2 = sse / df;

    let mut std_errors = Vec::with_capacity(p);
    let mut p_values = Vec::with_capacity(p);
    for j in 0..p {
        let se = (sigma2 * ls.cov_unscaled[(j, j)]).max(0.0).sqrt();
        let t = ls.beta[j] / se;
        std_errors.push(se);
        p_values.push(pvalue_t(t, df));
    }

    Ok((ls.beta, std_errors, p_values, df))
}

fn fit_binomial(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<FitParts, AppError> {
    let n = x.nrows();
    let p = x.ncols();

    let fit = fit_logistic(x, y)?;

    let mut std_errors = Vec::with_capacity(p);
    let mut p_values = Vec::with_capacity(p);
    for j in 0..p {
        let se = fit.cov[(j, j)].max(0.0).sqrt();
        let z = fit.beta[j] / se;
        std_errors.push(se);
        p_values.push(pvalue_z(z));
    }

    Ok((fit.beta, std_errors, p_values, (n - p) as f64))
}
