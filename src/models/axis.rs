//! Axis model for the FAT and SNF dimensions of the rate chart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sampled value on an axis together with its grid coordinate.
///
/// `original_index` addresses the grid; the axis ordering never reorders
/// the grid itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisEntry {
    /// The numeric axis value.
    pub value: Decimal,
    /// The position of this value's row or column in the grid.
    pub original_index: usize,
}

/// A single dimension (FAT or SNF) of the rate chart.
///
/// Holds two views of the same values: the entries sorted ascending by
/// value for the resolver, and the labels exactly as they appeared in the
/// source, in source order, for form population.
///
/// # Example
///
/// ```
/// use milk_rate_engine::models::Axis;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let axis = Axis::from_labels(vec![
///     ("4.5".to_string(), Decimal::from_str("4.5").unwrap()),
///     ("4.0".to_string(), Decimal::from_str("4.0").unwrap()),
/// ]);
///
/// assert_eq!(axis.labels(), &["4.5".to_string(), "4.0".to_string()]);
/// assert_eq!(axis.entries()[0].original_index, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Axis {
    entries: Vec<AxisEntry>,
    labels: Vec<String>,
}

impl Axis {
    /// Builds an axis from `(label, value)` pairs given in grid order.
    ///
    /// The pair at position `i` becomes the entry with `original_index == i`.
    /// Entries are sorted with a stable sort, so equal values keep their
    /// relative order.
    pub fn from_labels(labels: Vec<(String, Decimal)>) -> Self {
        let mut entries: Vec<AxisEntry> = labels
            .iter()
            .enumerate()
            .map(|(original_index, (_, value))| AxisEntry {
                value: *value,
                original_index,
            })
            .collect();
        entries.sort_by(|a, b| a.value.cmp(&b.value));

        Self {
            entries,
            labels: labels.into_iter().map(|(label, _)| label).collect(),
        }
    }

    /// Returns the entries sorted ascending by value.
    pub fn entries(&self) -> &[AxisEntry] {
        &self.entries
    }

    /// Returns the source labels in grid order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the number of values on this axis.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the axis has no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn label(s: &str) -> (String, Decimal) {
        (s.to_string(), Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_entries_are_sorted_ascending() {
        let axis = Axis::from_labels(vec![label("9.0"), label("8.5"), label("8.7")]);

        let values: Vec<String> = axis.entries().iter().map(|e| e.value.to_string()).collect();
        assert_eq!(values, vec!["8.5", "8.7", "9.0"]);

        let indices: Vec<usize> = axis.entries().iter().map(|e| e.original_index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_labels_keep_source_order_and_formatting() {
        let axis = Axis::from_labels(vec![label("4.50"), label("3.9")]);
        assert_eq!(axis.labels(), &["4.50".to_string(), "3.9".to_string()]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_values() {
        let axis = Axis::from_labels(vec![label("4.0"), label("3.0"), label("4.00")]);

        let indices: Vec<usize> = axis.entries().iter().map(|e| e.original_index).collect();
        assert_eq!(indices, vec![1, 0, 2]);
    }

    #[test]
    fn test_empty_axis() {
        let axis = Axis::default();
        assert!(axis.is_empty());
        assert_eq!(axis.len(), 0);
    }
}
