//! UPI deep-link builder
//!
//! ```text
//! upi://pay?pa=<vpa>&pn=<payee name>&am=<amount, 2dp>&cu=<currency>
//! ```
//!
//! Every value is percent-encoded as a query component. The builder only
//! formats: it has no opinion on the sign of the amount, callers refuse
//! empty or zero bills before getting here.

use shared::money::format_fixed2;

pub const UPI_SCHEME_PREFIX: &str = "upi://pay?";
pub const DEFAULT_CURRENCY: &str = "INR";

/// Build a payment link in the default currency (INR)
pub fn build_payment_url(vpa: &str, payee_name: &str, amount: f64) -> String {
    build_payment_url_with_currency(vpa, payee_name, amount, DEFAULT_CURRENCY)
}

pub fn build_payment_url_with_currency(
    vpa: &str,
    payee_name: &str,
    amount: f64,
    currency: &str,
) -> String {
    format!(
        "{}pa={}&pn={}&am={}&cu={}",
        UPI_SCHEME_PREFIX,
        urlencoding::encode(vpa),
        urlencoding::encode(payee_name),
        urlencoding::encode(&format_fixed2(amount)),
        urlencoding::encode(currency),
    )
}

/// Decoded parameters of a UPI payment link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpiIntent {
    pub vpa: String,
    pub payee_name: String,
    /// Amount exactly as carried in the link ("123.40")
    pub amount: String,
    pub currency: String,
}

/// Parse a `upi://pay?...` link
///
/// Accepts both `%20` and `+` for spaces so links produced by browser
/// `URLSearchParams` decode too. Unknown parameters are ignored.
pub fn parse_payment_url(url: &str) -> Option<UpiIntent> {
    let query = url.strip_prefix(UPI_SCHEME_PREFIX)?;
    let mut intent = UpiIntent::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode_component(value)?;
        match key {
            "pa" => intent.vpa = value,
            "pn" => intent.payee_name = value,
            "am" => intent.amount = value,
            "cu" => intent.currency = value,
            _ => {}
        }
    }
    if intent.vpa.is_empty() {
        return None;
    }
    Some(intent)
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
