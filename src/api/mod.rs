//! HTTP API module for the Rate Resolution Engine.
//!
//! This module exposes the engine's query surface: rate lookup, axis value
//! listing, collection pricing, administrative reload and health.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CollectionTotalRequest, RateQuery, RawNumber};
pub use response::{ApiError, HealthResponse, RateResponse};
pub use state::AppState;
