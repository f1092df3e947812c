//! Two-sided p-values and display helpers.
//!
//! The fitting service reports a coefficient and its standard error; the
//! p-values here turn that pair into the significance numbers the summary
//! and p-value plot consume. Gaussian fits use the Student t distribution
//! with the residual degrees of freedom; binomial fits use the normal
//! (Wald) approximation.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Cap for `-log10(p)` so that underflowed p-values stay plottable.
pub const NEG_LOG10_CAP: f64 = 16.0;

/// Two-tailed p-value from a z-statistic.
pub fn pvalue_z(z: f64) -> f64 {
    if !z.is_finite() {
        return f64::NAN;
    }
    let normal = match Normal::new(0.0, 1.0) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };
    2.0 * (1.0 - normal.cdf(z.abs()))
}

/// Two-tailed p-value from a t-statistic with `df` degrees of freedom.
pub fn pvalue_t(t: f64, df: f64) -> f64 {
    if !t.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    // For very large df the t distribution is numerically normal.
    if df > 1000.0 {
        return pvalue_z(t);
    }
    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };
    2.0 * (1.0 - t_dist.cdf(t.abs()))
}

/// `-log10(p)`, clamped to `[0, NEG_LOG10_CAP]`.
///
/// NaN p-values map to 0 so a degenerate coefficient cannot poison plot
/// axis ranges.
pub fn neg_log10_p(p: f64) -> f64 {
    if !p.is_finite() || p <= 0.0 {
        return if p.is_nan() { 0.0 } else { NEG_LOG10_CAP };
    }
    (-p.log10()).clamp(0.0, NEG_LOG10_CAP)
}

/// Significance stars for a p-value (summary-table convention).
pub fn significance_stars(p: f64) -> &'static str {
    if p < 0.001 {
        "***"
    } else if p < 0.01 {
        "**"
    } else if p < 0.05 {
        "*"
    } else if p < 0.1 {
        "."
    } else {
        ""
    }
}
