//! Shared domain types.
//!
//! These types are intentionally kept lightweight and (where possible)
//! serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON
//! - reloaded later for plotting or comparisons

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A table of named, row-aligned columns.
///
/// Columns are stored in insertion order; the default model family derives
/// its entries from that order. Row-count equality is enforced at insertion
/// so downstream code can assume aligned columns.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<(String, Column)>,
}

/// A single dataset column.
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Vec<f64>),
    Factor(FactorColumn),
}

/// A categorical column stored as level codes.
///
/// Levels are kept in first-appearance order; level 0 is the reference level
/// for dummy coding.
#[derive(Debug, Clone)]
pub struct FactorColumn {
    pub levels: Vec<String>,
    pub codes: Vec<usize>,
}

impl FactorColumn {
    /// Build a factor column from raw labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut levels: Vec<String> = Vec::new();
        let mut codes = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let code = match levels.iter().position(|l| l == label) {
                Some(i) => i,
                None => {
                    levels.push(label.to_string());
                    levels.len() - 1
                }
            };
            codes.push(code);
        }
        Self { levels, codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Factor(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (0 for an empty dataset).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append a numeric column.
    pub fn push_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<(), AppError> {
        self.push_column(name, Column::Numeric(values))
    }

    /// Append a factor column built from raw labels.
    pub fn push_factor<I, S>(&mut self, name: &str, labels: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.push_column(name, Column::Factor(FactorColumn::from_labels(labels)))
    }

    fn push_column(&mut self, name: &str, column: Column) -> Result<(), AppError> {
        if self.columns.iter().any(|(n, _)| n == name) {
            return Err(AppError::input(format!("Duplicate column name `{name}`.")));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(AppError::input(format!(
                "Column `{name}` has {} rows; dataset has {}.",
                column.len(),
                self.n_rows()
            )));
        }
        self.columns.push((name.to_string(), column));
        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Iterate `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }
}

/// Signature of a derived-term function.
///
/// The function receives the full dataset and must return one value per row.
pub type DerivedFn = dyn Fn(&Dataset) -> Result<Vec<f64>, AppError> + Send + Sync;

/// A term computed from the dataset at fit time.
#[derive(Clone)]
pub struct DerivedTerm {
    func: Arc<DerivedFn>,
}

impl DerivedTerm {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Dataset) -> Result<Vec<f64>, AppError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Evaluate the term against a dataset.
    pub fn evaluate(&self, data: &Dataset) -> Result<Vec<f64>, AppError> {
        (self.func)(data)
    }
}

impl fmt::Debug for DerivedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedTerm(..)")
    }
}

/// The abstract reference to data used in a regression term.
///
/// Resolution to concrete numeric columns happens in the fitter, so failure
/// points (missing column, wrong-length derived output) are explicit per
/// family entry rather than hidden in formula synthesis.
#[derive(Debug, Clone)]
pub enum TermSpec {
    /// Direct reference to a dataset column, resolved by name at fit time.
    Column(String),
    /// A function of the full dataset, evaluated at fit time.
    Derived(DerivedTerm),
}

/// A term specification with a display name.
#[derive(Debug, Clone)]
pub struct NamedTerm {
    pub name: String,
    pub spec: TermSpec,
}

impl NamedTerm {
    /// A column reference named after the column itself.
    pub fn column(name: &str) -> Self {
        Self {
            name: name.to_string(),
            spec: TermSpec::Column(name.to_string()),
        }
    }

    /// A derived term with an explicit display name.
    pub fn derived<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Dataset) -> Result<Vec<f64>, AppError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            spec: TermSpec::Derived(DerivedTerm::new(func)),
        }
    }
}

/// One member of a model family.
///
/// An entry usually holds a single term, but may group several named terms
/// so that one family slot contributes multiple regression terms at once.
#[derive(Debug, Clone)]
pub struct FamilyEntry {
    pub name: String,
    pub terms: Vec<NamedTerm>,
}

impl FamilyEntry {
    /// A single-column entry named after the column.
    pub fn column(name: &str) -> Self {
        Self {
            name: name.to_string(),
            terms: vec![NamedTerm::column(name)],
        }
    }

    /// A single derived-term entry.
    pub fn derived<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Dataset) -> Result<Vec<f64>, AppError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            terms: vec![NamedTerm::derived(name, func)],
        }
    }

    /// An entry contributing several terms under one name.
    pub fn group(name: &str, terms: Vec<NamedTerm>) -> Self {
        Self {
            name: name.to_string(),
            terms,
        }
    }
}

/// An insertion-ordered mapping from entry name to term specification(s).
///
/// Names are unique within a family. `insert` overrides an existing entry in
/// place (preserving its position) and appends otherwise, so callers can
/// freely add, override, or remove entries after default construction.
#[derive(Debug, Clone, Default)]
pub struct ModelFamily {
    entries: Vec<FamilyEntry>,
}

impl ModelFamily {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override an entry. Overriding keeps the original position.
    pub fn insert(&mut self, entry: FamilyEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove an entry by name, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<FamilyEntry> {
        let idx = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&FamilyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FamilyEntry> {
        self.entries.iter()
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The primary predictor of an analysis.
///
/// A plain column name covers the common case; a term or named-term group
/// enables "focus" analyses on derived quantities.
#[derive(Debug, Clone)]
pub enum PrimarySpec {
    Column(String),
    Term(NamedTerm),
    Group(Vec<NamedTerm>),
}

impl PrimarySpec {
    pub fn column(name: &str) -> Self {
        PrimarySpec::Column(name.to_string())
    }

    /// Display label for reports and plots.
    pub fn label(&self) -> String {
        match self {
            PrimarySpec::Column(name) => name.clone(),
            PrimarySpec::Term(term) => term.name.clone(),
            PrimarySpec::Group(terms) => terms
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join("+"),
        }
    }

    /// Dataset columns referenced directly by this spec.
    ///
    /// Used to exclude the primary's own columns from the default family.
    pub fn referenced_columns(&self) -> Vec<&str> {
        fn term_column(t: &NamedTerm) -> Option<&str> {
            match &t.spec {
                TermSpec::Column(name) => Some(name.as_str()),
                TermSpec::Derived(_) => None,
            }
        }
        match self {
            PrimarySpec::Column(name) => vec![name.as_str()],
            PrimarySpec::Term(term) => term_column(term).into_iter().collect(),
            PrimarySpec::Group(terms) => terms.iter().filter_map(term_column).collect(),
        }
    }
}

impl From<&str> for PrimarySpec {
    fn from(name: &str) -> Self {
        PrimarySpec::column(name)
    }
}

/// The fitting family used for every model in an analysis.
///
/// This is a dataset-wide setting chosen by the caller, never inferred per
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitFamily {
    /// Ordinary least squares; t-based p-values with df = n - p.
    Gaussian,
    /// Logistic regression via IRLS; Wald z-based p-values.
    Binomial,
}

impl FitFamily {
    pub fn display_name(self) -> &'static str {
        match self {
            FitFamily::Gaussian => "gaussian",
            FitFamily::Binomial => "binomial",
        }
    }
}

/// Options controlling a family analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub fit_family: FitFamily,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            fit_family: FitFamily::Gaussian,
        }
    }
}

/// Point estimate, standard error, and two-sided p-value for one term.
///
/// Factor terms produce one estimate per non-reference level, labelled
/// `name[level]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefEstimate {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub p_value: f64,
}

/// The fit projected onto the primary-predictor axis.
///
/// Auxiliary terms (and any extra primary terms) are held at their fitted
/// mean contribution, so the line is directly comparable with the base fit
/// in scatter plots. Under the binomial family this is the linear-predictor
/// scale, not the response scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitLine {
    pub intercept: f64,
    pub slope: f64,
}

impl FitLine {
    pub fn y_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Per-fit inference summary for one regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub intercept: CoefEstimate,
    /// Primary-predictor coefficient(s), in design order.
    pub primary: Vec<CoefEstimate>,
    /// Auxiliary coefficient(s); empty for the base fit.
    pub auxiliary: Vec<CoefEstimate>,
    pub df_residual: f64,
    pub n_obs: usize,
    pub line: FitLine,
}

impl FitSummary {
    /// Significance of the primary predictor within this fit.
    ///
    /// For a multi-column primary this is the first coefficient's p-value.
    pub fn primary_p_value(&self) -> f64 {
        self.primary.first().map(|c| c.p_value).unwrap_or(f64::NAN)
    }
}

/// One successfully fitted family entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentedFit {
    pub name: String,
    pub fit: FitSummary,
}

/// A family entry that could not be fitted, with the reason it was dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

/// The immutable output of one family analysis.
///
/// Holds the base fit, the augmented fits in family insertion order, the
/// diagnostics for dropped entries, and the raw response/primary values on
/// the original scale for plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyResult {
    pub base: FitSummary,
    pub augmented: Vec<AugmentedFit>,
    pub skipped: Vec<SkippedEntry>,
    pub fit_family: FitFamily,
    pub response_name: String,
    pub predictor_name: String,
    pub response: Vec<f64>,
    pub predictor: Vec<f64>,
}
