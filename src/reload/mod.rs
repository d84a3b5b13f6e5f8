//! Publication of the rate table in service.
//!
//! The [`ReloadController`] is the single owner of the published table:
//! it is the only place a table is ever replaced, and every reader goes
//! through it to obtain an immutable snapshot.

mod controller;

pub use controller::ReloadController;
