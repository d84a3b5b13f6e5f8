//! Collection pricing: applying a resolved rate to a collected quantity.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{CollectionPricing, RateTable};

use super::resolve;

/// Number of decimal places a collection total is rounded to.
pub const TOTAL_DECIMAL_PLACES: u32 = 2;

/// Calculates the amount due for a collection.
///
/// Returns `quantity * rate` rounded half-up to two decimal places.
///
/// # Errors
///
/// - `InvalidInput` if `quantity` is negative
/// - `CalculationError` if the product overflows
///
/// # Example
///
/// ```
/// use milk_rate_engine::calculation::calculate_collection_total;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let total = calculate_collection_total(
///     Decimal::from_str("10.5").unwrap(),
///     Decimal::from_str("47.0").unwrap(),
/// )
/// .unwrap();
/// assert_eq!(total.to_string(), "493.50");
/// ```
pub fn calculate_collection_total(quantity: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(EngineError::InvalidInput {
            field: "quantity".to_string(),
            value: quantity.to_string(),
            message: "must not be negative".to_string(),
        });
    }

    let mut total = quantity
        .checked_mul(rate)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("collection total overflowed: {} x {}", quantity, rate),
        })?
        .round_dp_with_strategy(TOTAL_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    total.rescale(TOTAL_DECIMAL_PLACES);

    Ok(total)
}

/// Resolves the rate for a collection and prices it.
///
/// A failed lookup is returned as an error; no total is produced for it.
pub fn price_collection(
    table: &RateTable,
    fat: Decimal,
    snf: Decimal,
    quantity: Decimal,
) -> EngineResult<CollectionPricing> {
    let rate = resolve(table, fat, snf)?;
    let total = calculate_collection_total(quantity, rate)?;

    Ok(CollectionPricing {
        fat,
        snf,
        rate,
        quantity,
        total,
    })
}
