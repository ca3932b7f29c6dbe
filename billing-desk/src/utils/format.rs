//! Display formatting (en-IN conventions)

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::PaidItem;
use shared::money::format_fixed2;

/// Rupee amount with Indian digit grouping: `₹1,23,456.50`
pub fn format_inr(amount: f64) -> String {
    let fixed = format_fixed2(amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}₹{}.{}", sign, group_indian(int_part), frac_part)
}

/// 最后三位一组，其余两位一组
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// `19/10/2026, 3:04:05 pm` in the business time zone
pub fn format_date_time(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%d/%m/%Y, %-I:%M:%S %P").to_string()
}

/// `Shirt (2×499.5), Socks (1×100)`
pub fn item_summary(items: &[PaidItem]) -> String {
    items
        .iter()
        .map(|it| format!("{} ({}×{})", it.name, it.qty, it.price))
        .collect::<Vec<_>>()
        .join(", ")
}
