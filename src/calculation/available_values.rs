//! Axis label listing for form population.

use crate::models::{AxisValues, RateTable};

/// Lists the FAT and SNF labels of a table.
///
/// Labels come back exactly as written in the source and in source order.
/// Consumers match user selections against these strings by equality, so
/// they are never sorted or reformatted (`"4.5"` stays `"4.5"`).
///
/// # Example
///
/// ```
/// use milk_rate_engine::calculation::list_axis_values;
/// use milk_rate_engine::grid::{CellGridSource, load};
///
/// let table = load(&CellGridSource::new(
///     "inline",
///     vec![vec!["FAT", "9.0", "8.5"], vec!["4.5", "48.2", "47.0"]],
/// ))
/// .unwrap();
///
/// let values = list_axis_values(&table);
/// assert_eq!(values.fat, vec!["4.5"]);
/// assert_eq!(values.snf, vec!["9.0", "8.5"]);
/// ```
pub fn list_axis_values(table: &RateTable) -> AxisValues {
    AxisValues {
        fat: table.fat_axis().labels().to_vec(),
        snf: table.snf_axis().labels().to_vec(),
    }
}
