//! Label-based selection over a [`BenchmarkCollection`].
//!
//! Selection is expressed through [`LabelPredicate`]. Regular expressions
//! ([`Pattern`]) are the usual predicate, but exact labels and plain closures
//! work the same way.

use crate::errors::{BenchError, BenchResult};
use crate::measurement::{BenchmarkCollection, MeasurementTable};
use regex::Regex;
use std::fmt;

/// Decides whether a benchmark label belongs to a selection
pub trait LabelPredicate {
    fn matches(&self, label: &str) -> bool;
}

impl<F> LabelPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, label: &str) -> bool {
        self(label)
    }
}

/// A regular expression matched from the start of the label.
///
/// The match does not have to consume the whole label: `^Linux` matches
/// `"Linux (gcc) GPU ..."`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> BenchResult<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            BenchError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl LabelPredicate for Pattern {
    fn matches(&self, label: &str) -> bool {
        self.regex.is_match(label)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Matches one label exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactLabel(pub String);

impl ExactLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl LabelPredicate for ExactLabel {
    fn matches(&self, label: &str) -> bool {
        self.0 == label
    }
}

/// Compile a list of patterns, failing on the first invalid one
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> BenchResult<Vec<Pattern>> {
    patterns.iter().map(|p| Pattern::new(p.as_ref())).collect()
}

/// Records whose label satisfies at least one predicate.
///
/// Each record is taken at most once, in the order of `results`.
pub fn filter_or<P: LabelPredicate>(
    results: &BenchmarkCollection,
    predicates: &[P],
) -> BenchmarkCollection {
    results
        .iter()
        .filter(|(label, _)| predicates.iter().any(|p| p.matches(label)))
        .map(|(label, table)| (label.to_string(), table.clone()))
        .collect()
}

/// Records whose label satisfies every predicate.
///
/// An empty predicate list keeps the whole collection.
pub fn filter_and<P: LabelPredicate>(
    results: &BenchmarkCollection,
    predicates: &[P],
) -> BenchmarkCollection {
    results
        .iter()
        .filter(|(label, _)| predicates.iter().all(|p| p.matches(label)))
        .map(|(label, table)| (label.to_string(), table.clone()))
        .collect()
}

/// Table of the first record (in collection order) matching `predicate`
pub fn find_first<'a, P: LabelPredicate + ?Sized>(
    results: &'a BenchmarkCollection,
    predicate: &P,
) -> Option<&'a MeasurementTable> {
    results
        .iter()
        .find(|(label, _)| predicate.matches(label))
        .map(|(_, table)| table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn table(v: f64) -> MeasurementTable {
        MeasurementTable::new(vec![1], vec![("calc_avg", vec![v])]).unwrap()
    }

    fn collection() -> BenchmarkCollection {
        [
            ("Linux (gcc) GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl", 1.0),
            ("Linux (gcc) CPU (AMD Ryzen 9 5900X 12-Core Processor) Release Mode - with SIMD", 2.0),
            ("Windows GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl", 3.0),
        ]
        .iter()
        .map(|(l, v)| (l.to_string(), table(*v)))
        .collect()
    }

    #[test_case("^Linux.*", "Linux (gcc) GPU", true ; "explicit anchor")]
    #[test_case("Linux", "Linux (gcc) GPU", true ; "prefix without anchor")]
    #[test_case("GPU", "Linux (gcc) GPU", false ; "no search past the start")]
    #[test_case(".*GPU", "Linux (gcc) GPU", true ; "leading wildcard")]
    #[test_case(".*- with SIMD$", "CPU - with SIMD - with OpenMP", false ; "end anchor")]
    #[test_case("a|Linux", "Linux", true ; "alternation stays anchored")]
    fn test_pattern_matches_from_start(pattern: &str, label: &str, expected: bool) {
        assert_eq!(Pattern::new(pattern).unwrap().matches(label), expected);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("Intel(R").unwrap_err();
        assert!(matches!(err, BenchError::InvalidPattern { ref pattern, .. } if pattern == "Intel(R"));
    }

    #[test]
    fn test_filter_or_deduplicates() {
        let c = collection();
        let patterns = compile_patterns(&["^Linux.*", ".*GPU.*", ".*nbody.cl$"]).unwrap();
        let selected = filter_or(&c, &patterns);

        assert_eq!(selected.len(), 3);
        assert_eq!(
            selected.labels().collect::<Vec<_>>(),
            c.labels().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_filter_and() {
        let c = collection();
        let patterns = compile_patterns(&["^Linux.*", ".*Kernel: nbody.cl$"]).unwrap();
        let selected = filter_and(&c, &patterns);
        assert_eq!(selected.len(), 1);
        assert_eq!(
            selected.get("Linux (gcc) GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl")
                .unwrap()
                .metric("calc_avg")
                .unwrap(),
            vec![1.0]
        );
    }

    #[test]
    fn test_filter_and_empty_list_keeps_everything() {
        let c = collection();
        let none: Vec<Pattern> = Vec::new();
        let selected = filter_and(&c, &none);
        assert_eq!(
            selected.labels().collect::<Vec<_>>(),
            c.labels().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_filter_and_unmatched_pattern_is_empty() {
        let c = collection();
        let patterns = compile_patterns(&["^Mac.*"]).unwrap();
        assert!(filter_and(&c, &patterns).is_empty());
    }

    #[test]
    fn test_nested_filter_or_is_subset_of_union() {
        let c = collection();
        let a = ["^Linux.*"];
        let b = [".*Kernel.*"];
        let nested = filter_or(
            &filter_or(&c, &compile_patterns(&a).unwrap()),
            &compile_patterns(&b).unwrap(),
        );
        let union = filter_or(&c, &compile_patterns(&["^Linux.*", ".*Kernel.*"]).unwrap());

        for (label, table) in nested.iter() {
            assert!(union.contains(label));
            assert_eq!(
                table.metric("calc_avg").unwrap(),
                c.get(label).unwrap().metric("calc_avg").unwrap()
            );
        }
    }

    #[test]
    fn test_find_first() {
        let c: BenchmarkCollection = vec![
            ("Linux GPU A".to_string(), table(1.0)),
            ("Windows GPU B".to_string(), table(2.0)),
        ]
        .into_iter()
        .collect();

        let found = find_first(&c, &Pattern::new("^Linux.*").unwrap()).unwrap();
        assert_eq!(found.metric("calc_avg").unwrap(), vec![1.0]);
        assert!(find_first(&c, &Pattern::new("^Mac.*").unwrap()).is_none());
    }

    #[test]
    fn test_substitute_predicates() {
        let c = collection();
        let exact = [ExactLabel::new(
            "Windows GPU (NVIDIA GeForce RTX 2080) Kernel: nbody.cl",
        )];
        assert_eq!(filter_or(&c, &exact).len(), 1);

        let windows_or_cpu = |label: &str| label.starts_with("Windows") || label.contains("CPU");
        assert_eq!(filter_or(&c, &[windows_or_cpu]).len(), 2);
        assert!(find_first(&c, &|label: &str| label.is_empty()).is_none());
    }
}
