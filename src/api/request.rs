//! Request types for the rate engine API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_measurement;
use crate::error::EngineResult;

/// Query string of `GET /rate`.
///
/// Kept as text so that a non-numeric value is reported as invalid input
/// rather than as a malformed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuery {
    /// The measured FAT percentage.
    pub fat: String,
    /// The measured SNF percentage.
    pub snf: String,
}

/// A numeric field that may arrive as a JSON number or a string.
///
/// JSON numbers keep their literal text (serde_json's `arbitrary_precision`),
/// so a value is never rounded through `f64` before it becomes a `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// A JSON number, e.g. `4.5`.
    Number(serde_json::Number),
    /// A JSON string, e.g. `"4.5"`.
    Text(String),
}

impl RawNumber {
    /// Parses the value as a non-negative decimal, naming `field` on error.
    pub fn parse(&self, field: &str) -> EngineResult<Decimal> {
        match self {
            RawNumber::Number(number) => parse_measurement(field, &number.to_string()),
            RawNumber::Text(text) => parse_measurement(field, text),
        }
    }
}

/// Request body for `POST /collection-total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionTotalRequest {
    /// The measured FAT percentage.
    pub fat: RawNumber,
    /// The measured SNF percentage.
    pub snf: RawNumber,
    /// The collected quantity.
    pub quantity: RawNumber,
}

impl CollectionTotalRequest {
    /// Parses `(fat, snf, quantity)`, failing on the first invalid field.
    pub fn measurements(&self) -> EngineResult<(Decimal, Decimal, Decimal)> {
        Ok((
            self.fat.parse("fat")?,
            self.snf.parse("snf")?,
            self.quantity.parse("quantity")?,
        ))
    }
}
