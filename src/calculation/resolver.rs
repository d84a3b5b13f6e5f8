//! Rate resolution against a [`RateTable`].
//!
//! Each axis is resolved independently: an exact numeric match wins,
//! otherwise the closest sampled value is substituted.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Axis, AxisEntry, AxisMatch, MatchKind, RateResolution, RateTable};
use crate::numeric;

/// Parses a caller-supplied measurement.
///
/// # Errors
///
/// Returns `InvalidInput` naming `field` if `raw` is not a non-negative
/// decimal number.
///
/// # Example
///
/// ```
/// use milk_rate_engine::calculation::parse_measurement;
///
/// assert!(parse_measurement("fat", "4.2").is_ok());
/// assert!(parse_measurement("fat", "high").is_err());
/// ```
pub fn parse_measurement(field: &str, raw: &str) -> EngineResult<Decimal> {
    let trimmed = raw.trim();
    let value = numeric::parse_decimal(trimmed).ok_or_else(|| EngineError::InvalidInput {
        field: field.to_string(),
        value: raw.to_string(),
        message: "not a number".to_string(),
    })?;

    validate_measurement(field, value)?;
    Ok(value)
}

fn validate_measurement(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(())
}

/// Selects the axis entry for a requested value.
///
/// Scans the sorted axis for an entry numerically equal to `requested`
/// (so `4.0` matches a label of `4.00`); the first one found wins. Failing
/// that, the entry with the smallest `|value - requested|` is chosen.
///
/// Tie-break: between equally close entries the one with the lower
/// `original_index` wins. For a source listed in ascending order this is
/// also the first one met during the scan.
///
/// Returns `None` only for an empty axis.
pub fn select_axis_entry(axis: &Axis, requested: Decimal) -> Option<AxisMatch> {
    let to_match = |entry: &AxisEntry, kind| AxisMatch {
        requested,
        matched: entry.value,
        original_index: entry.original_index,
        kind,
    };

    if let Some(entry) = axis.entries().iter().find(|e| e.value == requested) {
        return Some(to_match(entry, MatchKind::Exact));
    }

    axis.entries()
        .iter()
        .fold(None::<(Decimal, &AxisEntry)>, |best, entry| {
            let distance = (entry.value - requested).abs();
            match best {
                Some((best_distance, best_entry))
                    if best_distance < distance
                        || (best_distance == distance
                            && best_entry.original_index <= entry.original_index) =>
                {
                    best
                }
                _ => Some((distance, entry)),
            }
        })
        .map(|(_, entry)| to_match(entry, MatchKind::Nearest))
}

/// Resolves a rate and reports how each axis was matched.
///
/// # Errors
///
/// - `InvalidInput` if either measurement is negative (checked before any scan)
/// - `RateUnavailable` if the table has no rows or no columns
///
/// # Example
///
/// ```
/// use milk_rate_engine::calculation::resolve_detailed;
/// use milk_rate_engine::grid::{CellGridSource, load};
/// use milk_rate_engine::models::MatchKind;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let table = load(&CellGridSource::new(
///     "inline",
///     vec![vec!["FAT", "8.5"], vec!["4.0", "45.0"], vec!["4.5", "47.0"]],
/// ))
/// .unwrap();
///
/// let resolution = resolve_detailed(
///     &table,
///     Decimal::from_str("4.2").unwrap(),
///     Decimal::from_str("8.5").unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(resolution.rate, Decimal::from_str("45.0").unwrap());
/// assert_eq!(resolution.fat.kind, MatchKind::Nearest);
/// assert_eq!(resolution.snf.kind, MatchKind::Exact);
/// ```
pub fn resolve_detailed(table: &RateTable, fat: Decimal, snf: Decimal) -> EngineResult<RateResolution> {
    validate_measurement("fat", fat)?;
    validate_measurement("snf", snf)?;

    let unavailable = || EngineError::RateUnavailable {
        rows: table.row_count(),
        columns: table.column_count(),
    };
    if table.is_empty() {
        return Err(unavailable());
    }

    let fat_match = select_axis_entry(table.fat_axis(), fat).ok_or_else(unavailable)?;
    let snf_match = select_axis_entry(table.snf_axis(), snf).ok_or_else(unavailable)?;
    let rate = table
        .rate_at(fat_match.original_index, snf_match.original_index)
        .ok_or_else(unavailable)?;

    if fat_match.kind == MatchKind::Nearest || snf_match.kind == MatchKind::Nearest {
        debug!(
            fat = %fat,
            snf = %snf,
            matched_fat = %fat_match.matched,
            matched_snf = %snf_match.matched,
            "Resolved rate using nearest axis values"
        );
    }

    Ok(RateResolution {
        fat: fat_match,
        snf: snf_match,
        rate,
        table_version: table.version(),
    })
}

/// Resolves the rate for a FAT/SNF pair.
///
/// See [`resolve_detailed`] for the matching rules and errors.
pub fn resolve(table: &RateTable, fat: Decimal, snf: Decimal) -> EngineResult<Decimal> {
    resolve_detailed(table, fat, snf).map(|resolution| resolution.rate)
}

/// Parses raw FAT/SNF strings and resolves the rate.
///
/// Non-numeric input fails with `InvalidInput` before the table is looked at.
pub fn resolve_raw(table: &RateTable, fat: &str, snf: &str) -> EngineResult<RateResolution> {
    let fat = parse_measurement("fat", fat)?;
    let snf = parse_measurement("snf", snf)?;
    resolve_detailed(table, fat, snf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellGridSource, load};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_table() -> RateTable {
        load(&CellGridSource::new(
            "test",
            vec![
                vec!["FAT", "8.5", "9.0"],
                vec!["4.0", "45.0", "46.5"],
                vec!["4.5", "47.0", "48.2"],
            ],
        ))
        .unwrap()
    }

    fn axis(labels: &[&str]) -> Axis {
        Axis::from_labels(labels.iter().map(|s| (s.to_string(), dec(s))).collect())
    }

    #[test]
    fn test_exact_match_on_both_axes() {
        let table = create_test_table();
        assert_eq!(resolve(&table, dec("4.0"), dec("9.0")).unwrap(), dec("46.5"));
    }

    #[test]
    fn test_nearest_fat_value_is_used() {
        let table = create_test_table();
        // |4.2 - 4.0| = 0.2 < |4.2 - 4.5| = 0.3
        assert_eq!(resolve(&table, dec("4.2"), dec("8.5")).unwrap(), dec("45.0"));
    }

    #[test]
    fn test_equidistant_fat_prefers_lower_original_index() {
        let table = create_test_table();
        assert_eq!(resolve(&table, dec("4.25"), dec("8.5")).unwrap(), dec("45.0"));
    }

    #[test]
    fn test_equidistant_tie_uses_original_index_not_value() {
        // 4.5 comes first in the source, so it wins a tie against 4.0.
        let axis = axis(&["4.5", "4.0"]);
        let selected = select_axis_entry(&axis, dec("4.25")).unwrap();

        assert_eq!(selected.matched, dec("4.5"));
        assert_eq!(selected.original_index, 0);
        assert_eq!(selected.kind, MatchKind::Nearest);
    }

    #[test]
    fn test_exact_match_compares_numerically() {
        let axis = axis(&["8.50", "9.0"]);
        let selected = select_axis_entry(&axis, dec("8.5")).unwrap();

        assert_eq!(selected.kind, MatchKind::Exact);
        assert_eq!(selected.original_index, 0);
    }

    #[test]
    fn test_values_outside_axis_clamp_to_ends() {
        let table = create_test_table();
        assert_eq!(resolve(&table, dec("2.0"), dec("7.0")).unwrap(), dec("45.0"));
        assert_eq!(resolve(&table, dec("9.9"), dec("12.0")).unwrap(), dec("48.2"));
    }

    #[test]
    fn test_empty_table_is_rate_unavailable() {
        let result = resolve(&RateTable::empty(), dec("4.0"), dec("8.5"));

        match result {
            Err(EngineError::RateUnavailable { rows, columns }) => {
                assert_eq!(rows, 0);
                assert_eq!(columns, 0);
            }
            other => panic!("Expected RateUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_table_is_rate_unavailable() {
        let table = load(&CellGridSource::new("test", vec![vec!["FAT", "8.5"]])).unwrap();
        assert!(matches!(
            resolve(&table, dec("4.0"), dec("8.5")),
            Err(EngineError::RateUnavailable { rows: 0, columns: 1 })
        ));
    }

    #[test]
    fn test_zero_rate_is_returned_not_treated_as_missing() {
        let table = load(&CellGridSource::new(
            "test",
            vec![vec!["FAT", "8.5"], vec!["4.0", "0"]],
        ))
        .unwrap();
        assert_eq!(resolve(&table, dec("4.0"), dec("8.5")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_non_numeric_input_is_invalid() {
        let table = create_test_table();

        match resolve_raw(&table, "abc", "8.5") {
            Err(EngineError::InvalidInput { field, value, .. }) => {
                assert_eq!(field, "fat");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(matches!(
            resolve_raw(&table, "4.0", ""),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_digit_separator_input_is_invalid() {
        let table = create_test_table();

        match resolve_raw(&table, "4_0", "8.5") {
            Err(EngineError::InvalidInput { field, value, .. }) => {
                assert_eq!(field, "fat");
                assert_eq!(value, "4_0");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(matches!(
            parse_measurement("snf", "8_5"),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_input_is_checked_before_table_state() {
        assert!(matches!(
            resolve_raw(&RateTable::empty(), "x", "8.5"),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_measurement_is_invalid() {
        let table = create_test_table();
        assert!(matches!(
            resolve(&table, dec("-4.0"), dec("8.5")),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resolution_reports_table_version_and_matches() {
        let table = create_test_table().with_version(3);
        let resolution = resolve_raw(&table, "4.0", "8.7").unwrap();

        assert_eq!(resolution.table_version, 3);
        assert_eq!(resolution.fat.kind, MatchKind::Exact);
        assert_eq!(resolution.snf.kind, MatchKind::Nearest);
        assert_eq!(resolution.snf.matched, dec("8.5"));
        assert!(!resolution.is_exact());
    }

    fn axis_strategy() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::hash_set(0u32..2000, 1..30).prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_exact_labels_return_their_cell(values in axis_strategy(), pick in any::<prop::sample::Index>()) {
            let labels: Vec<(String, Decimal)> = values
                .iter()
                .map(|v| {
                    let value = Decimal::new(i64::from(*v), 2);
                    (value.to_string(), value)
                })
                .collect();
            let axis = Axis::from_labels(labels.clone());
            let i = pick.index(labels.len());

            let selected = select_axis_entry(&axis, labels[i].1).unwrap();
            prop_assert_eq!(selected.kind, MatchKind::Exact);
            prop_assert_eq!(selected.original_index, i);
        }

        #[test]
        fn prop_nearest_minimises_distance(values in axis_strategy(), requested in 0u32..2500) {
            let labels: Vec<(String, Decimal)> = values
                .iter()
                .map(|v| {
                    let value = Decimal::new(i64::from(*v), 2);
                    (value.to_string(), value)
                })
                .collect();
            let axis = Axis::from_labels(labels.clone());
            let requested = Decimal::new(i64::from(requested), 2);

            let selected = select_axis_entry(&axis, requested).unwrap();
            let best = labels.iter().map(|(_, v)| (*v - requested).abs()).min().unwrap();
            prop_assert_eq!((selected.matched - requested).abs(), best);

            let first_best = labels
                .iter()
                .position(|(_, v)| (*v - requested).abs() == best)
                .unwrap();
            prop_assert_eq!(selected.original_index, first_best);
        }
    }
}
