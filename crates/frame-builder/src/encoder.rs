//! Per-Batch Label Encoding
//!
//! Maps the distinct values of one categorical column onto `{0..k-1}`,
//! ordered by descending frequency with ties broken by first observation.
//! The mapping is scoped to a single batch: the same label may receive a
//! different code in the next batch. That instability is a documented
//! property of the pipeline, not something this module tries to repair.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Frequency-ordered integer encoding of one categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoding {
    /// Label for each code; index equals code
    labels: Vec<String>,
    /// Reverse lookup from label to code
    codes: HashMap<String, usize>,
}

impl LabelEncoding {
    /// Fit an encoding over the values observed in one batch
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        // (count, first-seen index) per distinct value
        let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, value) in values.into_iter().enumerate() {
            let entry = stats.entry(value).or_insert((0, position));
            entry.0 += 1;
        }

        let mut ordered: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .map(|(value, (count, first_seen))| (value, count, first_seen))
            .collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let labels: Vec<String> = ordered.iter().map(|(value, _, _)| value.to_string()).collect();
        let codes = labels
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();

        Self { labels, codes }
    }

    /// Fit an encoding and encode the same values in one pass
    pub fn fit_transform(values: &[&str]) -> (Self, Vec<usize>) {
        let encoding = Self::fit(values.iter().copied());
        let codes = values
            .iter()
            .map(|value| encoding.codes[*value])
            .collect();
        (encoding, codes)
    }

    /// Code for a label, if it was observed in the fitted batch
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    /// Label for a code
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no labels were observed
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in code order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_gets_zero() {
        let values = ["THEFT", "ASSAULT", "THEFT", "THEFT", "ASSAULT", "VANDALISM"];
        let encoding = LabelEncoding::fit(values);
        assert_eq!(encoding.encode("THEFT"), Some(0));
        assert_eq!(encoding.encode("ASSAULT"), Some(1));
        assert_eq!(encoding.encode("VANDALISM"), Some(2));
    }

    #[test]
    fn test_ties_broken_by_first_observation() {
        let values = ["SOUTHERN", "NORTHERN", "SOUTHERN", "NORTHERN"];
        let encoding = LabelEncoding::fit(values);
        assert_eq!(encoding.encode("SOUTHERN"), Some(0));
        assert_eq!(encoding.encode("NORTHERN"), Some(1));
    }

    #[test]
    fn test_bijection_onto_contiguous_range() {
        let values = ["a", "b", "c", "b", "c", "c"];
        let encoding = LabelEncoding::fit(values);
        assert_eq!(encoding.len(), 3);
        let mut seen: Vec<usize> = ["a", "b", "c"]
            .iter()
            .map(|v| encoding.encode(v).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let values = ["x", "y", "y"];
        let encoding = LabelEncoding::fit(values);
        for label in ["x", "y"] {
            let code = encoding.encode(label).unwrap();
            assert_eq!(encoding.decode(code), Some(label));
        }
    }

    #[test]
    fn test_unseen_label() {
        let encoding = LabelEncoding::fit(["a"]);
        assert_eq!(encoding.encode("b"), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_codes_are_contiguous_from_zero(values in proptest::collection::vec("[a-e]", 1..40)) {
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            let (encoding, codes) = LabelEncoding::fit_transform(&refs);
            let distinct: std::collections::BTreeSet<usize> = codes.iter().copied().collect();
            proptest::prop_assert_eq!(distinct.len(), encoding.len());
            proptest::prop_assert_eq!(
                distinct,
                (0..encoding.len()).collect::<std::collections::BTreeSet<_>>()
            );
        }
    }
}
