//! Rate chart sources and loading.
//!
//! This module turns an external tabular resource into a [`RateTable`]:
//! a [`GridSource`] supplies the raw cells and [`load`] validates and
//! parses them.
//!
//! # Example
//!
//! ```no_run
//! use milk_rate_engine::grid::{CsvGridSource, load};
//!
//! let table = load(&CsvGridSource::new("./data/rate_chart.csv")).unwrap();
//! println!("Loaded {} x {} rate chart", table.row_count(), table.column_count());
//! ```
//!
//! [`RateTable`]: crate::models::RateTable

mod loader;
mod source;

pub use loader::{load, load_cells};
pub use source::{CellGridSource, CsvGridSource, GridSource};
