//! Persisted history codec
//!
//! # Layout
//!
//! ```text
//! {"version": 1, "entries": [PaymentEntry, ...]}   current
//! [PaymentEntry, ...]                                legacy (version 0, no envelope)
//! ```
//!
//! Decoding is strict per entry: an entry either deserializes and passes
//! [`validate_entry`] or it is dropped. A payload whose top-level shape is
//! wrong (null, malformed JSON, scalar, unknown version) is rejected as a
//! whole with [`BillingError::PersistenceDecodeFailure`].

use crate::bill::{MAX_PRICE, MAX_QUANTITY};
use serde::Serialize;
use serde_json::Value;
use shared::{BillingError, PaymentEntry};

/// Schema version written by [`encode`]
pub const SCHEMA_VERSION: u64 = 1;

/// Version assigned to a bare array with no envelope
pub const LEGACY_VERSION: u64 = 0;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u64,
    entries: &'a [PaymentEntry],
}

/// Result of decoding a stored payload
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Schema version found in storage
    pub version: u64,
    /// Entries that passed validation, in stored order
    pub entries: Vec<PaymentEntry>,
    /// How many stored entries were dropped
    pub dropped: usize,
}

/// Serialize the full log with the current envelope
pub fn encode(entries: &[PaymentEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        entries,
    })
}

/// Parse a stored payload
pub fn decode(raw: &str) -> Result<Decoded, BillingError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| BillingError::PersistenceDecodeFailure(format!("malformed JSON: {}", e)))?;

    let (version, items) = match value {
        Value::Array(items) => (LEGACY_VERSION, items),
        Value::Object(mut map) => {
            let version = map.get("version").and_then(Value::as_u64).ok_or_else(|| {
                BillingError::PersistenceDecodeFailure("envelope without numeric version".into())
            })?;
            if version != SCHEMA_VERSION {
                return Err(BillingError::PersistenceDecodeFailure(format!(
                    "unsupported schema version {}",
                    version
                )));
            }
            match map.remove("entries") {
                Some(Value::Array(items)) => (version, items),
                _ => {
                    return Err(BillingError::PersistenceDecodeFailure(
                        "envelope without entries array".into(),
                    ));
                }
            }
        }
        other => {
            return Err(BillingError::PersistenceDecodeFailure(format!(
                "expected array or envelope, got {}",
                json_kind(&other)
            )));
        }
    };

    let total = items.len();
    let entries: Vec<PaymentEntry> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match decode_entry(item) {
            Ok(entry) => Some(entry),
            Err(reason) => {
                tracing::warn!(index, reason = %reason, "Dropping malformed history entry");
                None
            }
        })
        .collect();

    Ok(Decoded {
        version,
        dropped: total - entries.len(),
        entries,
    })
}

/// Decode a payload that may be absent, degrading to an empty log
pub fn decode_or_empty(raw: Option<&str>) -> Vec<PaymentEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match decode(raw) {
        Ok(decoded) => decoded.entries,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable payment history");
            Vec::new()
        }
    }
}

fn decode_entry(value: Value) -> Result<PaymentEntry, String> {
    let entry: PaymentEntry = serde_json::from_value(value).map_err(|e| e.to_string())?;
    validate_entry(&entry)?;
    Ok(entry)
}

/// Check the rules every stored entry must satisfy
pub fn validate_entry(entry: &PaymentEntry) -> Result<(), String> {
    if entry.id.trim().is_empty() {
        return Err("empty id".into());
    }
    if !entry.amount.is_finite() || entry.amount <= 0.0 {
        return Err(format!("amount must be positive, got {}", entry.amount));
    }
    if entry.items.is_empty() {
        return Err("no items".into());
    }
    for item in &entry.items {
        if item.qty < 1 || item.qty > MAX_QUANTITY {
            return Err(format!("item {:?} has qty {} out of range", item.name, item.qty));
        }
        if !item.price.is_finite() || item.price < 0.0 || item.price > MAX_PRICE {
            return Err(format!("item {:?} has invalid price {}", item.name, item.price));
        }
    }
    match entry.recomputed_amount() {
        None => return Err("item sum overflows".into()),
        Some(sum) if !entry.is_consistent() => {
            return Err(format!("amount {} does not match item sum {}", entry.amount, sum));
        }
        Some(_) => {}
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PaidItem, PaymentStatus};

    fn entry(id: &str, items: Vec<(&str, u32, f64)>) -> PaymentEntry {
        let items: Vec<PaidItem> = items
            .into_iter()
            .map(|(name, qty, price)| PaidItem { name: name.to_string(), qty, price })
            .collect();
        let amount = shared::money::to_f64(
            shared::money::sum_lines(items.iter().map(|it| (it.qty, it.price))).unwrap(),
        );
        PaymentEntry {
            id: id.to_string(),
            created_at: "2025-01-05T09:30:00Z".parse().unwrap(),
            amount,
            payee_vpa: "merchant@bank".to_string(),
            payee_name: Some("Shop Name".to_string()),
            status: PaymentStatus::Completed,
            payment_method: Some("UPI".to_string()),
            items,
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let log = vec![
            entry("b", vec![("Shirt", 2, 499.5), ("Garments", 1, 100.0)]),
            entry("a", vec![("Saree", 1, 1250.75)]),
        ];
        let raw = encode(&log).unwrap();
        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded.version, SCHEMA_VERSION);
        assert_eq!(decoded.dropped, 0);
        assert_eq!(decoded.entries, log);
    }

    #[test]
    fn test_encode_writes_envelope() {
        let raw = encode(&[]).unwrap();
        assert_eq!(raw, r#"{"version":1,"entries":[]}"#);
    }

    #[test]
    fn test_bad_payloads_decode_to_empty() {
        assert!(decode_or_empty(None).is_empty());
        for raw in ["null", "{not json", "42", "\"text\"", "{}", r#"{"version":9,"entries":[]}"#] {
            assert!(decode(raw).is_err(), "expected failure for {}", raw);
            assert!(decode_or_empty(Some(raw)).is_empty());
        }
    }

    #[test]
    fn test_decode_failure_variant() {
        let err = decode("[1,").unwrap_err();
        assert!(matches!(err, BillingError::PersistenceDecodeFailure(_)));
    }

    #[test]
    fn test_legacy_array_is_migrated() {
        // written by the old web till: bare array, extra fields, no status
        let raw = r#"[{
            "id": "id_171_abc",
            "createdAt": "2024-06-01T12:00:00.000Z",
            "amount": 1099,
            "vpa": "9583252256-3@axl",
            "payeeName": "KHERWAL BAZAAR",
            "items": [
                {"name": "Garments", "qty": 1, "price": 100},
                {"name": "Shirt", "qty": 2, "price": 499.5}
            ]
        }]"#;
        let decoded = decode(raw).unwrap();
        assert_eq!(decoded.version, LEGACY_VERSION);
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].payee_name.as_deref(), Some("KHERWAL BAZAAR"));
        assert_eq!(decoded.entries[0].status, PaymentStatus::Completed);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let good = serde_json::to_value(entry("ok", vec![("Shirt", 1, 10.0)])).unwrap();
        let mut wrong_sum = good.clone();
        wrong_sum["id"] = "wrong-sum".into();
        wrong_sum["amount"] = 99.0.into();
        let mut zero_qty = good.clone();
        zero_qty["items"][0]["qty"] = 0.into();
        let mut no_items = good.clone();
        no_items["items"] = serde_json::json!([]);

        let raw = serde_json::json!({
            "version": 1,
            "entries": [good, wrong_sum, zero_qty, no_items, "junk", {"id": 5}]
        })
        .to_string();

        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].id, "ok");
        assert_eq!(decoded.dropped, 5);
    }

    #[test]
    fn test_out_of_range_items_are_dropped_without_panicking() {
        let good = serde_json::to_value(entry("ok", vec![("Shirt", 1, 10.0)])).unwrap();
        let raw = serde_json::json!({
            "version": 1,
            "entries": [
                {
                    "id": "huge",
                    "createdAt": "2025-01-05T09:30:00Z",
                    "amount": 1.0,
                    "vpa": "merchant@bank",
                    "items": [{"name": "Big", "qty": 4294967295u32, "price": 1e20}]
                },
                {
                    "id": "pricey",
                    "createdAt": "2025-01-05T09:30:00Z",
                    "amount": 2000000.0,
                    "vpa": "merchant@bank",
                    "items": [{"name": "Gold", "qty": 1, "price": 2000000.0}]
                },
                good
            ]
        })
        .to_string();

        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded.dropped, 2);
        assert_eq!(decoded.entries.len(), 1);
        assert_eq!(decoded.entries[0].id, "ok");
    }
}
