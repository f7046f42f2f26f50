use chrono::{Datelike, NaiveDate};

/// Currency symbol shown in front of every amount
const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount the way the dashboard shows it: rupee sign, Indian digit
/// grouping (1,23,456), at most two decimals with trailing zeros dropped.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = format!("{}{}{}", sign, CURRENCY_SYMBOL, group_indian(whole));
    if fraction != 0 {
        let decimals = format!("{:02}", fraction);
        out.push('.');
        out.push_str(decimals.trim_end_matches('0'));
    }
    out
}

/// Last three digits, then groups of two: 12345678 -> 1,23,45,678
fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
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

/// Format a date as "5th Jan 2025"
pub fn format_day(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} {}", day, suffix, date.format("%b %Y"))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
