//! Rate calculation for the Rate Resolution Engine.
//!
//! This module contains the lookup of a rate for a FAT/SNF pair against a
//! published table, the listing of the axis labels a table offers, and the
//! pricing of a collection at a resolved rate.

mod available_values;
mod collection_total;
mod resolver;

pub use available_values::list_axis_values;
pub use collection_total::{TOTAL_DECIMAL_PLACES, calculate_collection_total, price_collection};
pub use resolver::{
    parse_measurement, resolve, resolve_detailed, resolve_raw, select_axis_entry,
};
