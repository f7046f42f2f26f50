use serde::{Deserialize, Serialize};

/// Whether a category (or transaction) is money in or money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryType {
    #[serde(rename = "income", alias = "incomes")]
    Income,
    #[serde(rename = "expense", alias = "expenses")]
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "incomes" => Ok(CategoryType::Income),
            "expense" | "expenses" => Ok(CategoryType::Expense),
            other => Err(format!("unknown category type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub icon: String,
}

impl CategoryRequest {
    pub fn new(name: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            name: name.into(),
            kind,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Prefill an update form from an existing category.
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            kind: category.kind,
            icon: category.icon.clone().unwrap_or_default(),
        }
    }
}

/// Keep only categories of the given type.
pub fn filter_by_type(categories: Vec<Category>, kind: CategoryType) -> Vec<Category> {
    categories.into_iter().filter(|c| c.kind == kind).collect()
}
