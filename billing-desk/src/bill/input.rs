//! Quick-entry input parsing and validation
//!
//! The add-item form is permissive: a blank name gets a fallback label and a
//! blank quantity means 1. Only the price is mandatory.

use shared::BillingError;

/// Maximum allowed price per item (₹10,00,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: u32 = 9999;

/// Validated fields for a new line item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub name: String,
    pub qty: u32,
    pub price: f64,
}

/// Trim the name, falling back to `fallback` when nothing is left
pub fn normalize_name(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse the quantity field
///
/// Blank means 1. Fractional input is floored; the floored value must be a
/// whole number in `1..=MAX_QUANTITY`.
pub fn parse_qty(raw: &str) -> Result<u32, BillingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(1);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| BillingError::invalid_quantity(format!("not a number: {:?}", raw)))?;
    validate_qty_f64(value)
}

fn validate_qty_f64(value: f64) -> Result<u32, BillingError> {
    if !value.is_finite() {
        return Err(BillingError::invalid_quantity(format!(
            "quantity must be a finite number, got {}",
            value
        )));
    }
    let floored = value.floor();
    if floored < 1.0 {
        return Err(BillingError::invalid_quantity(format!(
            "quantity must be at least 1, got {}",
            value
        )));
    }
    if floored > MAX_QUANTITY as f64 {
        return Err(BillingError::invalid_quantity(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, value
        )));
    }
    Ok(floored as u32)
}

/// Validate an already-typed quantity
pub fn validate_qty(qty: u32) -> Result<u32, BillingError> {
    validate_qty_f64(qty as f64)
}

/// Parse the (required) price field
pub fn parse_price(raw: &str) -> Result<f64, BillingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BillingError::invalid_price("price is required"));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| BillingError::invalid_price(format!("not a number: {:?}", raw)))?;
    validate_price(value)
}

/// Price must be finite, non-negative and within bounds
pub fn validate_price(value: f64) -> Result<f64, BillingError> {
    if !value.is_finite() {
        return Err(BillingError::invalid_price(format!(
            "price must be a finite number, got {}",
            value
        )));
    }
    if value < 0.0 {
        return Err(BillingError::invalid_price(format!(
            "price must be non-negative, got {}",
            value
        )));
    }
    if value > MAX_PRICE {
        return Err(BillingError::invalid_price(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, value
        )));
    }
    // -0.0 passes the checks above
    Ok(value + 0.0)
}

/// Parse all three quick-entry fields
pub fn parse_fields(
    name: &str,
    qty: &str,
    price: &str,
    fallback_name: &str,
) -> Result<ItemFields, BillingError> {
    let qty = parse_qty(qty)?;
    let price = parse_price(price)?;
    Ok(ItemFields {
        name: normalize_name(name, fallback_name),
        qty,
        price,
    })
}
