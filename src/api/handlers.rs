//! HTTP request handlers for the rate engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{list_axis_values, price_collection, resolve_raw};
use crate::error::EngineError;

use super::request::{CollectionTotalRequest, RateQuery};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, RateResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rate", get(rate_handler))
        .route("/available-values", get(available_values_handler))
        .route("/collection-total", post(collection_total_handler))
        .route("/reload", post(reload_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

/// Handler for GET /rate?fat=..&snf=..
///
/// Resolves the rate for a FAT/SNF pair against the table in service.
async fn rate_handler(
    State(state): State<AppState>,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rate query rejected"
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    let start_time = Instant::now();
    let table = state.controller().current_table();
    match resolve_raw(&table, &query.fat, &query.snf) {
        Ok(resolution) => {
            info!(
                correlation_id = %correlation_id,
                fat = %resolution.fat.requested,
                snf = %resolution.snf.requested,
                rate = %resolution.rate,
                table_version = resolution.table_version,
                duration_us = start_time.elapsed().as_micros(),
                "Rate resolved"
            );
            json_response(StatusCode::OK, RateResponse::from(resolution))
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /available-values.
///
/// Returns the axis labels of the table in service, as written in the source.
async fn available_values_handler(State(state): State<AppState>) -> Response {
    let table = state.controller().current_table();
    json_response(StatusCode::OK, list_axis_values(&table))
}

/// Handler for POST /collection-total.
///
/// Prices a collection; a failed rate lookup fails the request rather than
/// producing a zero total.
async fn collection_total_handler(
    State(state): State<AppState>,
    payload: Result<Json<CollectionTotalRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing collection total request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let table = state.controller().current_table();
    let result = request
        .measurements()
        .and_then(|(fat, snf, quantity)| price_collection(&table, fat, snf, quantity));

    match result {
        Ok(pricing) => {
            info!(
                correlation_id = %correlation_id,
                rate = %pricing.rate,
                quantity = %pricing.quantity,
                total = %pricing.total,
                "Collection priced"
            );
            json_response(StatusCode::OK, pricing)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /reload.
///
/// Re-reads the configured source; on failure the previous table stays in
/// service and the load error is returned.
async fn reload_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let source = state.source();
    info!(
        correlation_id = %correlation_id,
        source = %source.describe(),
        "Reloading rate chart"
    );

    let start_time = Instant::now();
    match state.controller().reload_async(source).await {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                version = summary.version,
                duration_us = start_time.elapsed().as_micros(),
                "Rate chart reloaded"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    let table = state.controller().current_table();
    let status = if table.is_empty() { "degraded" } else { "ok" };

    json_response(
        StatusCode::OK,
        HealthResponse {
            status: status.to_string(),
            table: table.summary(),
        },
    )
}
