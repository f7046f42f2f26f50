use anyhow::Result;

use budgetbaba_core::models::{total_amount, FilterRequest, TransactionKind};
use budgetbaba_core::utils::format_currency;
use budgetbaba_core::AppContext;

use crate::cli::FilterArgs;
use crate::ui::{notify, table};

pub async fn dashboard(ctx: &AppContext) -> Result<()> {
    let summary = ctx.api.dashboard().await?;

    println!("Total Balance  {}", format_currency(summary.total_balance));
    println!("Total Income   {}", format_currency(summary.total_income));
    println!("Total Expense  {}", format_currency(summary.total_expense));
    if let Some(ratio) = summary.spent_ratio() {
        println!("Spent          {:.1}% of income", ratio);
    }

    for (title, items) in [
        ("Recent Incomes", &summary.recent_incomes),
        ("Recent Expenses", &summary.recent_expenses),
        ("Recent Transactions", &summary.recent_transactions),
    ] {
        if items.is_empty() {
            continue;
        }
        println!("\n{}\n{}", title, table::transactions(items));
    }
    Ok(())
}

pub async fn filter(ctx: &AppContext, args: FilterArgs) -> Result<()> {
    let request = FilterRequest {
        kind: args.kind,
        start_date: args.from,
        end_date: args.to,
        sort_field: args.sort,
        sort_order: args.order,
        keyword: args.keyword.trim().to_string(),
    };

    let found = ctx.api.filter_transactions(&request).await?;
    if found.is_empty() {
        println!("No transactions found");
        return Ok(());
    }

    println!("{}", table::transactions(&found));
    println!("\n{} result(s), total {}", found.len(), format_currency(total_amount(&found)));
    Ok(())
}

/// Email a report; refuses when there is nothing to report.
pub async fn report(ctx: &AppContext, kind: TransactionKind) -> Result<()> {
    if ctx.api.list_transactions(kind).await?.is_empty() {
        notify::warning(&format!("No {} data to send", kind));
        return Ok(());
    }

    let response = ctx.send_report(kind).await?;
    notify::success(response.message_or("Email sent successfully"));
    Ok(())
}
