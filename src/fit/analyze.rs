//! Family analysis orchestration.
//!
//! `analyze` is the crate's main entry point:
//!
//! 1. resolve the response and primary predictor (failures here are fatal)
//! 2. fit the base model `response ~ primary`
//! 3. fit one augmented model per family entry, in insertion order
//!
//! A family entry that fails to resolve or fit is dropped into the result's
//! `skipped` list with its reason; sibling entries are unaffected. This
//! keeps one bad derived function or collinear column from aborting a
//! whole screen.

use crate::domain::{
    AnalyzeOptions, AugmentedFit, Dataset, FamilyResult, ModelFamily, PrimarySpec, SkippedEntry,
};
use crate::error::AppError;
use crate::family::build_family;
use crate::fit::design::{resolve_primary, resolve_response, resolve_terms};
use crate::fit::fitter::fit_linear_model;

/// Run a full family analysis.
///
/// When `family` is `None`, the default family is built from the dataset,
/// excluding the response column and any columns the primary references
/// directly.
pub fn analyze(
    data: &Dataset,
    response: &str,
    primary: PrimarySpec,
    family: Option<ModelFamily>,
    options: &AnalyzeOptions,
) -> Result<FamilyResult, AppError> {
    if data.is_empty() || data.n_rows() == 0 {
        return Err(AppError::input("Dataset is empty."));
    }

    let y = resolve_response(data, response, options.fit_family)?;
    let primary_cols = resolve_primary(data, &primary)?;

    let family = match family {
        Some(f) => f,
        None => {
            let mut exclude = vec![response];
            exclude.extend(primary.referenced_columns());
            build_family(data, &exclude)
        }
    };

    // Base fit: response ~ primary. Failure here is fatal.
    let base = fit_linear_model(&y, &primary_cols, &[], options.fit_family)?;

    let mut augmented = Vec::with_capacity(family.len());
    let mut skipped = Vec::new();

    for entry in family.iter() {
        let aux_cols = match resolve_terms(data, &entry.terms) {
            Ok(cols) => cols,
            Err(e) => {
                skipped.push(SkippedEntry {
                    name: entry.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match fit_linear_model(&y, &primary_cols, &aux_cols, options.fit_family) {
            Ok(fit) => augmented.push(AugmentedFit {
                name: entry.name.clone(),
                fit,
            }),
            Err(e) => skipped.push(SkippedEntry {
                name: entry.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    Ok(FamilyResult {
        base,
        augmented,
        skipped,
        fit_family: options.fit_family,
        response_name: response.to_string(),
        predictor_name: primary.label(),
        predictor: primary_cols[0].values.clone(),
        response: y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{SampleConfig, generate_dataset};
    use crate::domain::{FamilyEntry, NamedTerm};

    fn screen_dataset() -> Dataset {
        // x, y, w1..w6 per the canonical screen shape; seeded and
        // deterministic.
        generate_dataset(&SampleConfig::default()).unwrap()
    }

    #[test]
    fn default_family_yields_one_fit_per_covariate() {
        let data = screen_dataset();
        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap();

        let names: Vec<&str> = result.augmented.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["w1", "w2", "w3", "w4", "w5", "w6"]);
        assert!(result.skipped.is_empty());
        for fit in &result.augmented {
            assert_eq!(fit.fit.primary.len(), 1);
            assert_eq!(fit.fit.auxiliary.len(), 1);
        }
    }

    #[test]
    fn empty_family_matches_direct_base_fit() {
        let data = screen_dataset();
        let with_family = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(ModelFamily::new()),
            &AnalyzeOptions::default(),
        )
        .unwrap();
        assert!(with_family.augmented.is_empty());

        let full = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap();

        // Base fit is independent of the family contents.
        assert_eq!(
            with_family.base.primary[0].estimate,
            full.base.primary[0].estimate
        );
        assert_eq!(
            with_family.base.primary[0].p_value,
            full.base.primary[0].p_value
        );
    }

    #[test]
    fn removing_one_entry_leaves_siblings_unchanged() {
        let data = screen_dataset();
        let options = AnalyzeOptions::default();

        let full = analyze(&data, "y", PrimarySpec::column("x"), None, &options).unwrap();

        let mut family = build_family(&data, &["y", "x"]);
        family.remove("w3");
        let reduced =
            analyze(&data, "y", PrimarySpec::column("x"), Some(family), &options).unwrap();

        assert_eq!(reduced.augmented.len(), full.augmented.len() - 1);
        for fit in &reduced.augmented {
            let counterpart = full
                .augmented
                .iter()
                .find(|a| a.name == fit.name)
                .expect("sibling present in full run");
            assert_eq!(
                fit.fit.auxiliary[0].estimate,
                counterpart.fit.auxiliary[0].estimate
            );
            assert_eq!(
                fit.fit.auxiliary[0].p_value,
                counterpart.fit.auxiliary[0].p_value
            );
        }
    }

    #[test]
    fn bad_derived_entry_is_skipped_not_fatal() {
        let data = screen_dataset();
        let mut family = build_family(&data, &["y", "x"]);
        family.insert(FamilyEntry::derived("broken", |_| Ok(vec![1.0, 2.0])));
        family.insert(FamilyEntry::derived("exploding", |_| {
            Err(AppError::numeric("derived function failed"))
        }));

        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(family),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert_eq!(result.augmented.len(), 6);
        assert_eq!(result.skipped.len(), 2);
        let skipped: Vec<&str> = result.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["broken", "exploding"]);
    }

    #[test]
    fn collinear_entry_is_skipped() {
        let data = screen_dataset();
        let mut family = ModelFamily::new();
        // Duplicates the primary exactly: rank deficient with x in the model.
        family.insert(FamilyEntry::column("x"));
        family.insert(FamilyEntry::column("w1"));

        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(family),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert_eq!(result.augmented.len(), 1);
        assert_eq!(result.augmented[0].name, "w1");
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "x");
    }

    #[test]
    fn group_entry_contributes_multiple_auxiliary_terms() {
        let data = screen_dataset();
        let mut family = ModelFamily::new();
        family.insert(FamilyEntry::group(
            "w4w5",
            vec![NamedTerm::column("w4"), NamedTerm::column("w5")],
        ));

        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(family),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert_eq!(result.augmented.len(), 1);
        assert_eq!(result.augmented[0].name, "w4w5");
        assert_eq!(result.augmented[0].fit.auxiliary.len(), 2);
        assert_eq!(result.augmented[0].fit.auxiliary[0].term, "w4");
        assert_eq!(result.augmented[0].fit.auxiliary[1].term, "w5");
    }

    #[test]
    fn derived_primary_supports_focus_analyses() {
        let data = screen_dataset();
        let primary = PrimarySpec::Term(NamedTerm::derived("x2", |d| {
            let Some(crate::domain::Column::Numeric(x)) = d.column("x") else {
                return Err(AppError::input("missing x"));
            };
            Ok(x.iter().map(|v| v * v).collect())
        }));

        let result = analyze(&data, "y", primary, None, &AnalyzeOptions::default()).unwrap();
        assert_eq!(result.predictor_name, "x2");
        // Default family excludes only the response (derived primary
        // references no column directly), so `x` appears as an entry.
        assert!(result.augmented.iter().any(|a| a.name == "x"));
    }

    #[test]
    fn unknown_response_or_primary_is_fatal() {
        let data = screen_dataset();
        let options = AnalyzeOptions::default();

        let err = analyze(&data, "nope", PrimarySpec::column("x"), None, &options).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = analyze(&data, "y", PrimarySpec::column("nope"), None, &options).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = analyze(
            &Dataset::new(),
            "y",
            PrimarySpec::column("x"),
            None,
            &options,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn repeated_runs_are_numerically_identical() {
        let data = screen_dataset();
        let options = AnalyzeOptions::default();

        let a = analyze(&data, "y", PrimarySpec::column("x"), None, &options).unwrap();
        let b = analyze(&data, "y", PrimarySpec::column("x"), None, &options).unwrap();

        assert_eq!(a.base.primary[0].estimate, b.base.primary[0].estimate);
        assert_eq!(a.base.primary[0].p_value, b.base.primary[0].p_value);
        for (fa, fb) in a.augmented.iter().zip(b.augmented.iter()) {
            assert_eq!(fa.fit.auxiliary[0].estimate, fb.fit.auxiliary[0].estimate);
            assert_eq!(fa.fit.auxiliary[0].p_value, fb.fit.auxiliary[0].p_value);
        }
    }

    #[test]
    fn base_primary_p_value_matches_direct_two_term_fit() {
        let data = screen_dataset();
        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap();

        let y = resolve_response(&data, "y", crate::domain::FitFamily::Gaussian).unwrap();
        let x = resolve_primary(&data, &PrimarySpec::column("x")).unwrap();
        let direct = fit_linear_model(&y, &x, &[], crate::domain::FitFamily::Gaussian).unwrap();

        assert_eq!(result.base.primary[0].p_value, direct.primary[0].p_value);
        assert_eq!(result.base.primary[0].estimate, direct.primary[0].estimate);
    }

    #[test]
    fn binomial_family_fits_binary_response() {
        let data = generate_dataset(&SampleConfig {
            binary_response: true,
            ..SampleConfig::default()
        })
        .unwrap();

        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions {
                fit_family: crate::domain::FitFamily::Binomial,
            },
        )
        .unwrap();

        // Positive true effect; the sign must survive the logistic fit.
        assert!(result.base.primary[0].estimate > 0.0);
        assert_eq!(result.augmented.len(), 6);
    }
}
