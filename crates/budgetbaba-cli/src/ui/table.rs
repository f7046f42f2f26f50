//! Plain-text tables for list output.

use budgetbaba_core::models::{Category, Transaction};
use budgetbaba_core::utils::{format_currency, format_day, truncate_string};

/// Widest a free-text column may grow before it is truncated
const MAX_TEXT_WIDTH: usize = 28;

/// Column gap
const GAP: &str = "  ";

/// Render rows under a header, left-aligning text and right-aligning the
/// columns listed in `right_aligned`.
pub fn render(headers: &[&str], rows: &[Vec<String>], right_aligned: &[usize]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().copied(), &widths, right_aligned));
    out.push(widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join(GAP));
    for row in rows {
        out.push(line(row.iter().map(String::as_str), &widths, right_aligned));
    }
    out.join("\n")
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], right_aligned: &[usize]) -> String {
    let parts: Vec<String> = cells
        .enumerate()
        .map(|(i, cell)| {
            let pad = widths.get(i).copied().unwrap_or(0).saturating_sub(cell.chars().count());
            if right_aligned.contains(&i) {
                format!("{}{}", " ".repeat(pad), cell)
            } else {
                format!("{}{}", cell, " ".repeat(pad))
            }
        })
        .collect();
    parts.join(GAP).trim_end().to_string()
}

pub fn transactions(items: &[Transaction]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                format_day(t.date),
                truncate_string(&t.name, MAX_TEXT_WIDTH),
                truncate_string(t.category_display(), MAX_TEXT_WIDTH),
                format_currency(t.amount),
            ]
        })
        .collect();
    render(&["ID", "DATE", "NAME", "CATEGORY", "AMOUNT"], &rows, &[0, 4])
}

pub fn categories(items: &[Category]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                truncate_string(&c.name, MAX_TEXT_WIDTH),
                c.kind.to_string(),
                c.icon.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render(&["ID", "NAME", "TYPE", "ICON"], &rows, &[0])
}
