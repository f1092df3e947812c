//! Default model-family construction.
//!
//! The default family holds one column-reference entry per dataset column,
//! in dataset column order, minus the caller's exclusions (the response and
//! primary columns, typically). The returned family is an ordinary
//! `ModelFamily`: callers are free to add derived entries, group entries,
//! or remove/override members before analysis; no further validation
//! happens here.

use crate::domain::{Dataset, FamilyEntry, ModelFamily};

/// Build the default family for `data`, skipping any column named in
/// `exclude`. Exclusion names that match no column are ignored.
pub fn build_family(data: &Dataset, exclude: &[&str]) -> ModelFamily {
    let mut family = ModelFamily::new();
    for (name, _) in data.iter() {
        if exclude.contains(&name) {
            continue;
        }
        family.insert(FamilyEntry::column(name));
    }
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset() -> Dataset {
        let mut data = Dataset::new();
        data.push_numeric("x", vec![1.0, 2.0, 3.0]).unwrap();
        data.push_numeric("y", vec![1.0, 2.0, 3.0]).unwrap();
        data.push_numeric("w1", vec![0.0, 1.0, 0.0]).unwrap();
        data.push_factor("sector", ["a", "b", "a"]).unwrap();
        data.push_numeric("w2", vec![2.0, 1.0, 0.0]).unwrap();
        data
    }

    #[test]
    fn default_family_follows_column_order() {
        let data = toy_dataset();
        let family = build_family(&data, &["y", "x"]);
        let names: Vec<&str> = family.names().collect();
        assert_eq!(names, vec!["w1", "sector", "w2"]);
    }

    #[test]
    fn unknown_exclusions_are_ignored() {
        let data = toy_dataset();
        let family = build_family(&data, &["y", "x", "no_such_column"]);
        assert_eq!(family.len(), 3);
    }

    #[test]
    fn empty_dataset_yields_empty_family() {
        let family = build_family(&Dataset::new(), &[]);
        assert!(family.is_empty());
    }
}
