//! Rate Resolution Engine for milk collection pricing.
//!
//! This crate converts a measured FAT/SNF quality pair into a rate per unit
//! volume by looking it up in a reloadable two-dimensional rate chart.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod numeric;
pub mod reload;
