//! Core data models for the Rate Resolution Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod axis;
mod rate_quote;
mod rate_table;

pub use axis::{Axis, AxisEntry};
pub use rate_quote::{
    AxisMatch, AxisValues, CollectionPricing, MatchKind, RateResolution, ReloadSummary,
};
pub use rate_table::{EMPTY_TABLE_SOURCE, RateTable, TableSummary};
