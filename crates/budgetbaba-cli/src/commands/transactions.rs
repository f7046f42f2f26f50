use std::collections::HashMap;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use budgetbaba_core::models::{total_amount, Category, NewTransaction, Transaction, TransactionKind};
use budgetbaba_core::utils::format_currency;
use budgetbaba_core::validate::validate_transaction;
use budgetbaba_core::{AppContext, ValidationError};

use super::label;
use crate::ui::{notify, table};

/// List records with their category names and a total.
pub async fn list(ctx: &AppContext, kind: TransactionKind) -> Result<()> {
    let (mut items, categories) = futures::try_join!(
        ctx.api.list_transactions(kind),
        ctx.api.list_categories_by_type(kind),
    )?;

    if items.is_empty() {
        println!("No {} records yet", kind);
        return Ok(());
    }

    fill_category_names(&mut items, &categories);
    println!("{}", table::transactions(&items));
    println!("\nTotal: {}", format_currency(total_amount(&items)));
    Ok(())
}

pub async fn add(
    ctx: &AppContext,
    kind: TransactionKind,
    name: &str,
    amount: f64,
    category: Option<i64>,
    date: Option<NaiveDate>,
    icon: Option<String>,
) -> Result<()> {
    let transaction = NewTransaction {
        name: name.trim().to_string(),
        amount,
        category_id: category,
        icon,
        date: Some(date.unwrap_or_else(|| Local::now().date_naive())),
    };

    if let Err(err) = validate_transaction(&transaction) {
        if err == ValidationError::MissingCategory {
            show_categories(ctx, kind).await;
        }
        return Err(err.into());
    }

    ctx.api.add_transaction(kind, &transaction).await?;
    notify::success(&format!("{} added successfully", label(kind)));
    Ok(())
}

pub async fn delete(ctx: &AppContext, kind: TransactionKind, id: i64) -> Result<()> {
    ctx.api.delete_transaction(kind, id).await?;
    notify::success(&format!("{} deleted successfully", label(kind)));
    Ok(())
}

/// Point the user at the category ids they can pick from.
async fn show_categories(ctx: &AppContext, kind: TransactionKind) {
    match ctx.api.list_categories_by_type(kind).await {
        Ok(categories) if categories.is_empty() => {
            notify::warning(&format!(
                "No {} categories found. Add one with `budgetbaba categories add --type {}`.",
                kind, kind
            ));
        }
        Ok(categories) => eprintln!("{}", table::categories(&categories)),
        Err(err) => tracing::debug!(error = %err, "Could not list categories"),
    }
}

/// Records that only carry a category id get the name from the category list.
fn fill_category_names(items: &mut [Transaction], categories: &[Category]) {
    let names: HashMap<i64, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    for item in items.iter_mut() {
        if item.category.is_some() || item.category_name.is_some() {
            continue;
        }
        if let Some(name) = item.category_id.and_then(|id| names.get(&id)) {
            item.category_name = Some(name.to_string());
        }
    }
}
