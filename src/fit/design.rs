//! Term resolution: turning term specifications into design columns.
//!
//! Resolution happens once per fit, immediately before solving, so each
//! failure (unknown column, wrong-length derived output, single-level
//! factor) surfaces as an explicit error tied to the term that caused it.
//!
//! Factor columns use treatment contrasts: the first-appearing level is the
//! reference and each remaining level gets a 0/1 dummy column labelled
//! `name[level]`.

use crate::domain::{Column, Dataset, FitFamily, NamedTerm, PrimarySpec, TermSpec};
use crate::error::AppError;

/// A fully resolved regression column.
#[derive(Debug, Clone)]
pub struct DesignColumn {
    pub label: String,
    pub values: Vec<f64>,
}

/// Resolve one named term into one or more design columns.
pub fn resolve_term(data: &Dataset, term: &NamedTerm) -> Result<Vec<DesignColumn>, AppError> {
    match &term.spec {
        TermSpec::Column(column_name) => {
            let column = data.column(column_name).ok_or_else(|| {
                AppError::input(format!("Unknown column `{column_name}`."))
            })?;
            resolve_column(&term.name, column)
        }
        TermSpec::Derived(derived) => {
            let values = derived.evaluate(data)?;
            if values.len() != data.n_rows() {
                return Err(AppError::data(format!(
                    "Derived term `{}` returned {} values; dataset has {} rows.",
                    term.name,
                    values.len(),
                    data.n_rows()
                )));
            }
            Ok(vec![DesignColumn {
                label: term.name.clone(),
                values,
            }])
        }
    }
}

/// Resolve a list of named terms, concatenating their design columns.
pub fn resolve_terms(data: &Dataset, terms: &[NamedTerm]) -> Result<Vec<DesignColumn>, AppError> {
    let mut out = Vec::with_capacity(terms.len());
    for term in terms {
        out.extend(resolve_term(data, term)?);
    }
    Ok(out)
}

/// Resolve the primary predictor specification.
pub fn resolve_primary(
    data: &Dataset,
    primary: &PrimarySpec,
) -> Result<Vec<DesignColumn>, AppError> {
    let columns = match primary {
        PrimarySpec::Column(name) => resolve_term(data, &NamedTerm::column(name))?,
        PrimarySpec::Term(term) => resolve_term(data, term)?,
        PrimarySpec::Group(terms) => resolve_terms(data, terms)?,
    };
    if columns.is_empty() {
        return Err(AppError::input("Primary predictor resolved to no columns."));
    }
    Ok(columns)
}

/// Resolve the response column into a numeric vector.
///
/// Gaussian fits require a numeric column. Binomial fits accept a numeric
/// 0/1 column or a two-level factor (codes become 0/1).
pub fn resolve_response(
    data: &Dataset,
    name: &str,
    family: FitFamily,
) -> Result<Vec<f64>, AppError> {
    let column = data
        .column(name)
        .ok_or_else(|| AppError::input(format!("Unknown response column `{name}`.")))?;

    match (family, column) {
        (_, Column::Numeric(values)) => Ok(values.clone()),
        (FitFamily::Binomial, Column::Factor(f)) => {
            if f.levels.len() != 2 {
                return Err(AppError::input(format!(
                    "Binomial response `{name}` must have exactly 2 levels (has {}).",
                    f.levels.len()
                )));
            }
            Ok(f.codes.iter().map(|&c| c as f64).collect())
        }
        (FitFamily::Gaussian, Column::Factor(_)) => Err(AppError::input(format!(
            "Response `{name}` is a factor; the gaussian family needs a numeric response."
        ))),
    }
}

fn resolve_column(term_name: &str, column: &Column) -> Result<Vec<DesignColumn>, AppError> {
    match column {
        Column::Numeric(values) => Ok(vec![DesignColumn {
            label: term_name.to_string(),
            values: values.clone(),
        }]),
        Column::Factor(f) => {
            if f.levels.len() < 2 {
                return Err(AppError::data(format!(
                    "Factor `{term_name}` has a single level; no contrast possible."
                )));
            }
            // One dummy column per non-reference level.
            let mut out = Vec::with_capacity(f.levels.len() - 1);
            for (li, level) in f.levels.iter().enumerate().skip(1) {
                let values = f
                    .codes
                    .iter()
                    .map(|&c| if c == li { 1.0 } else { 0.0 })
                    .collect();
                out.push(DesignColumn {
                    label: format!("{term_name}[{level}]"),
                    values,
                });
            }
            Ok(out)
        }
    }
}
