//! The immutable rate table snapshot.
//!
//! A [`RateTable`] is built once per successful load and never mutated
//! afterwards. Reloading builds a new table and swaps the published
//! reference; readers holding the old table keep it alive until they drop it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Axis;

/// Source description used for the table published before any load.
pub const EMPTY_TABLE_SOURCE: &str = "<none>";

/// Rate chart snapshot: two sorted axes and a grid in original coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    fat_axis: Axis,
    snf_axis: Axis,
    grid: Vec<Vec<Decimal>>,
    version: u64,
    loaded_at: DateTime<Utc>,
    source: String,
}

impl RateTable {
    /// Assembles a table from axes and a grid the loader has validated.
    ///
    /// `grid[i][j]` is the rate for the FAT entry with original index `i`
    /// and the SNF entry with original index `j`.
    pub(crate) fn new(
        fat_axis: Axis,
        snf_axis: Axis,
        grid: Vec<Vec<Decimal>>,
        source: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(grid.len(), fat_axis.len());
        debug_assert!(grid.iter().all(|row| row.len() == snf_axis.len()));

        Self {
            fat_axis,
            snf_axis,
            grid,
            version: 0,
            loaded_at: Utc::now(),
            source: source.into(),
        }
    }

    /// Returns the table served before any chart has loaded successfully.
    ///
    /// Every lookup against it fails with `RateUnavailable`.
    pub fn empty() -> Self {
        Self::new(
            Axis::default(),
            Axis::default(),
            Vec::new(),
            EMPTY_TABLE_SOURCE,
        )
    }

    /// Stamps the publish version onto a table that has not been shared yet.
    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns the FAT axis.
    pub fn fat_axis(&self) -> &Axis {
        &self.fat_axis
    }

    /// Returns the SNF axis.
    pub fn snf_axis(&self) -> &Axis {
        &self.snf_axis
    }

    /// Returns the rate at the given original coordinates.
    pub fn rate_at(&self, fat_index: usize, snf_index: usize) -> Option<Decimal> {
        self.grid.get(fat_index)?.get(snf_index).copied()
    }

    /// Returns the number of FAT rows.
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    /// Returns the number of SNF columns.
    pub fn column_count(&self) -> usize {
        self.snf_axis.len()
    }

    /// Returns true if the table cannot answer any lookup.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Returns the publish version (0 until published).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when this table was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Returns a description of the source this table was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns a serializable summary of this table.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            version: self.version,
            row_count: self.row_count(),
            column_count: self.column_count(),
            loaded_at: self.loaded_at,
            source: self.source.clone(),
        }
    }
}

/// Metadata describing a published table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Publish version of the table.
    pub version: u64,
    /// Number of FAT rows.
    pub row_count: usize,
    /// Number of SNF columns.
    pub column_count: usize,
    /// When the table was built.
    pub loaded_at: DateTime<Utc>,
    /// Where the table was loaded from.
    pub source: String,
}
