//! Result models produced by rate lookups, reloads and collection pricing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an axis value was selected for a requested measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The axis contains the requested value.
    Exact,
    /// The closest axis value was substituted.
    Nearest,
}

/// The axis entry chosen for one requested measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMatch {
    /// The measurement that was requested.
    pub requested: Decimal,
    /// The axis value that was selected.
    pub matched: Decimal,
    /// The grid coordinate of the selected value.
    pub original_index: usize,
    /// Whether the selection was exact or nearest-neighbour.
    pub kind: MatchKind,
}

/// A resolved rate with the per-axis selections that produced it.
///
/// # Example
///
/// ```
/// use milk_rate_engine::models::{AxisMatch, MatchKind, RateResolution};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let resolution = RateResolution {
///     fat: AxisMatch {
///         requested: Decimal::from_str("4.2").unwrap(),
///         matched: Decimal::from_str("4.0").unwrap(),
///         original_index: 0,
///         kind: MatchKind::Nearest,
///     },
///     snf: AxisMatch {
///         requested: Decimal::from_str("8.5").unwrap(),
///         matched: Decimal::from_str("8.5").unwrap(),
///         original_index: 0,
///         kind: MatchKind::Exact,
///     },
///     rate: Decimal::from_str("45.0").unwrap(),
///     table_version: 1,
/// };
/// assert!(!resolution.is_exact());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// Selection on the FAT axis.
    pub fat: AxisMatch,
    /// Selection on the SNF axis.
    pub snf: AxisMatch,
    /// The rate at the selected coordinates.
    pub rate: Decimal,
    /// Version of the table the rate was read from.
    pub table_version: u64,
}

impl RateResolution {
    /// Returns true if both axes matched exactly.
    pub fn is_exact(&self) -> bool {
        self.fat.kind == MatchKind::Exact && self.snf.kind == MatchKind::Exact
    }
}

/// Axis labels as they appear in the source, for form population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisValues {
    /// FAT labels in source order.
    pub fat: Vec<String>,
    /// SNF labels in source order.
    pub snf: Vec<String>,
}

/// Outcome of a successful reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadSummary {
    /// Always true; failed reloads are reported as errors.
    pub success: bool,
    /// Number of FAT rows in the new table.
    pub row_count: usize,
    /// Number of SNF columns in the new table.
    pub column_count: usize,
    /// Publish version of the new table.
    pub version: u64,
    /// When the new table was built.
    pub loaded_at: DateTime<Utc>,
}

/// A priced collection: the resolved rate applied to a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPricing {
    /// The requested FAT measurement.
    pub fat: Decimal,
    /// The requested SNF measurement.
    pub snf: Decimal,
    /// The resolved rate per unit volume.
    pub rate: Decimal,
    /// The collected quantity.
    pub quantity: Decimal,
    /// `quantity * rate`, rounded to two decimal places.
    pub total: Decimal,
}
