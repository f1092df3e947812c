//! Summary rendering: projecting a `FamilyResult` into a table.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)
//!
//! No re-fitting happens here; rows are pure projections of the fit
//! summaries already stored in the result.

use serde::{Deserialize, Serialize};

use crate::domain::{CoefEstimate, FamilyResult};
use crate::math::significance_stars;

/// Sentinel model name for the base (unaugmented) fit.
pub const BASE_MODEL_NAME: &str = "(none)";

/// One display row of the family summary.
///
/// The base fit contributes one row with no secondary entry. Each augmented
/// fit contributes one row per auxiliary coefficient, so a k-level factor
/// entry yields k-1 rows sharing the same model name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub model: String,
    pub primary: CoefEstimate,
    pub secondary: Option<CoefEstimate>,
}

/// Project a result into ordered summary rows.
pub fn summary_rows(result: &FamilyResult) -> Vec<SummaryRow> {
    let primary_of = |fit: &crate::domain::FitSummary| {
        fit.primary
            .first()
            .cloned()
            .unwrap_or_else(|| CoefEstimate {
                term: result.predictor_name.clone(),
                estimate: f64::NAN,
                std_error: f64::NAN,
                p_value: f64::NAN,
            })
    };

    let mut rows = vec![SummaryRow {
        model: BASE_MODEL_NAME.to_string(),
        primary: primary_of(&result.base),
        secondary: None,
    }];

    for aug in &result.augmented {
        for coef in &aug.fit.auxiliary {
            rows.push(SummaryRow {
                model: aug.name.clone(),
                primary: primary_of(&aug.fit),
                secondary: Some(coef.clone()),
            });
        }
    }

    rows
}

/// Format the full analysis summary (header + table + skipped entries).
pub fn format_summary(result: &FamilyResult) -> String {
    let mut out = String::new();

    out.push_str("=== famr - model family summary ===\n");
    out.push_str(&format!(
        "Response: {} | Primary: {} | Family: {}\n",
        result.response_name,
        result.predictor_name,
        result.fit_family.display_name()
    ));
    out.push_str(&format!(
        "n={} | augmented fits: {} | skipped: {}\n\n",
        result.base.n_obs,
        result.augmented.len(),
        result.skipped.len()
    ));

    out.push_str(&format!(
        "{:<12} {:<14} {:>10} {:>10} {:>10} {:<3} {:>10} {:>10} {:>10} {:<3}\n",
        "model", "term", "est(1)", "se(1)", "p(1)", "", "est(2)", "se(2)", "p(2)", ""
    ));
    out.push_str(&format!(
        "{:-<12} {:-<14} {:-<10} {:-<10} {:-<10} {:-<3} {:-<10} {:-<10} {:-<10} {:-<3}\n",
        "", "", "", "", "", "", "", "", "", ""
    ));

    for row in summary_rows(result) {
        let (term, est2, se2, p2, stars2) = match &row.secondary {
            Some(coef) => (
                truncate(&coef.term, 14),
                fmt_est(coef.estimate),
                fmt_est(coef.std_error),
                fmt_p(coef.p_value),
                significance_stars(coef.p_value),
            ),
            None => (
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "",
            ),
        };

        out.push_str(&format!(
            "{:<12} {:<14} {:>10} {:>10} {:>10} {:<3} {:>10} {:>10} {:>10} {:<3}\n",
            truncate(&row.model, 12),
            term,
            fmt_est(row.primary.estimate),
            fmt_est(row.primary.std_error),
            fmt_p(row.primary.p_value),
            significance_stars(row.primary.p_value),
            est2,
            se2,
            p2,
            stars2,
        ));
    }

    for s in &result.skipped {
        out.push_str(&format!("  (skipped {}) {}\n", s.name, s.reason));
    }

    out
}

fn fmt_est(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.4}")
    } else {
        "NA".to_string()
    }
}

fn fmt_p(p: f64) -> String {
    if !p.is_finite() {
        "NA".to_string()
    } else if p < 1e-4 {
        format!("{p:.1e}")
    } else {
        format!("{p:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{SampleConfig, generate_dataset};
    use crate::domain::{AnalyzeOptions, PrimarySpec};
    use crate::fit::analyze;

    fn run_default() -> FamilyResult {
        let data = generate_dataset(&SampleConfig::default()).unwrap();
        analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn base_row_comes_first_with_sentinel_name() {
        let rows = summary_rows(&run_default());
        assert_eq!(rows[0].model, BASE_MODEL_NAME);
        assert!(rows[0].secondary.is_none());
        assert_eq!(rows.len(), 7); // base + w1..w6
    }

    #[test]
    fn factor_entry_yields_one_row_per_non_reference_level() {
        let data = generate_dataset(&SampleConfig {
            with_factor: true,
            ..SampleConfig::default()
        })
        .unwrap();
        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap();

        let rows = summary_rows(&result);
        let group_rows: Vec<&SummaryRow> =
            rows.iter().filter(|r| r.model == "group").collect();
        // 3 levels -> 2 contrast rows sharing the entry name, one per
        // non-reference level in level order (level 0 is the reference).
        let levels = match data.column("group") {
            Some(crate::domain::Column::Factor(f)) => f.levels.clone(),
            _ => panic!("group column missing"),
        };
        assert_eq!(group_rows.len(), levels.len() - 1);
        for (row, level) in group_rows.iter().zip(levels.iter().skip(1)) {
            assert_eq!(
                row.secondary.as_ref().unwrap().term,
                format!("group[{level}]")
            );
        }
    }

    #[test]
    fn degenerate_result_renders_base_row_only() {
        let data = generate_dataset(&SampleConfig::default()).unwrap();
        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(crate::domain::ModelFamily::new()),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        let rows = summary_rows(&result);
        assert_eq!(rows.len(), 1);

        let text = format_summary(&result);
        assert!(text.contains(BASE_MODEL_NAME));
        assert!(text.contains("augmented fits: 0"));
    }

    #[test]
    fn formatted_table_lists_every_model_and_skips() {
        let data = generate_dataset(&SampleConfig::default()).unwrap();
        let mut family = crate::family::build_family(&data, &["y", "x"]);
        family.insert(crate::domain::FamilyEntry::derived("broken", |_| {
            Ok(vec![0.0])
        }));

        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(family),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        let text = format_summary(&result);
        for name in ["(none)", "w1", "w6"] {
            assert!(text.contains(name), "missing {name} in summary");
        }
        assert!(text.contains("(skipped broken)"));
    }

    #[test]
    fn p_value_formatting() {
        assert_eq!(fmt_p(0.0234), "0.0234");
        assert_eq!(fmt_p(3.2e-7), "3.2e-7");
        assert_eq!(fmt_p(f64::NAN), "NA");
    }
}
