use anyhow::{anyhow, Result};
use tracing::debug;

use budgetbaba_core::models::{CategoryRequest, CategoryType};
use budgetbaba_core::validate::validate_category;
use budgetbaba_core::AppContext;

use crate::ui::{notify, table};

pub async fn list(ctx: &AppContext, kind: Option<CategoryType>) -> Result<()> {
    let categories = match kind {
        Some(kind) => ctx.api.list_categories_by_type(kind).await?,
        None => ctx.api.list_categories().await?,
    };
    if categories.is_empty() {
        println!("No categories found");
    } else {
        println!("{}", table::categories(&categories));
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, name: &str, kind: CategoryType, icon: Option<String>) -> Result<()> {
    let mut request = CategoryRequest::new(name.trim(), kind);
    if let Some(icon) = icon {
        request = request.with_icon(icon);
    }
    validate_category(&request)?;

    let created = ctx.api.create_category(&request).await?;
    debug!(id = created.id, "Category created");
    notify::success("Category added successfully");
    Ok(())
}

/// Update a category, keeping current values for fields not given.
pub async fn update(
    ctx: &AppContext,
    id: i64,
    name: Option<String>,
    kind: Option<CategoryType>,
    icon: Option<String>,
) -> Result<()> {
    let existing = ctx
        .api
        .list_categories()
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow!("No category with id {}", id))?;

    let mut request = CategoryRequest::from_category(&existing);
    if let Some(name) = name {
        request.name = name.trim().to_string();
    }
    if let Some(kind) = kind {
        request.kind = kind;
    }
    if let Some(icon) = icon {
        request.icon = icon;
    }
    validate_category(&request)?;

    ctx.api.update_category(id, &request).await?;
    notify::success("Category updated successfully");
    Ok(())
}
