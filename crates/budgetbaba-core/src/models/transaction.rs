//! Income and expense records.
//!
//! Incomes and expenses share one shape on the wire; `TransactionKind`
//! picks which set of endpoints a record belongs to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::CategoryType;

/// Incomes and expenses are distinguished the same way categories are.
pub type TransactionKind = CategoryType;

/// Category details embedded in a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<CategorySummary>,
    #[serde(rename = "categoryId", alias = "catergoryId", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "categoryName", default)]
    pub category_name: Option<String>,
}

impl Transaction {
    /// Own icon, or the category's icon when the transaction has none.
    pub fn display_icon(&self) -> Option<&str> {
        self.icon
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.category.as_ref().and_then(|c| c.icon.as_deref()))
    }

    pub fn category_display(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .or(self.category_name.as_deref())
            .unwrap_or("N/A")
    }
}

/// Body for adding an income or expense.
///
/// The add endpoints read the category from `catergoryId` (sic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub name: String,
    pub amount: f64,
    #[serde(rename = "catergoryId")]
    pub category_id: Option<i64>,
    pub icon: Option<String>,
    #[serde(with = "flexible_date::option")]
    pub date: Option<NaiveDate>,
}

impl NewTransaction {
    pub fn new(name: impl Into<String>, amount: f64, category_id: i64, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            category_id: Some(category_id),
            icon: None,
            date: Some(date),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Sum of the amounts in a list of transactions
pub fn total_amount(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Dates arrive either as `YYYY-MM-DD` or as a full timestamp; only the day is kept.
mod flexible_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_with_timestamp_date() {
        let json = r#"{
            "id": 12,
            "name": "Salary",
            "amount": 52000.5,
            "icon": null,
            "date": "2025-03-01T00:00:00",
            "category": {"id": 3, "name": "Job", "icon": "https://cdn/job.png"},
            "categoryId": 3
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(t.display_icon(), Some("https://cdn/job.png"));
        assert_eq!(t.category_display(), "Job");
    }

    #[test]
    fn test_category_display_fallbacks() {
        let json = r#"{"id":1,"name":"Gift","amount":10,"date":"2025-01-02","categoryName":"Other"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.category_display(), "Other");
        assert_eq!(t.display_icon(), None);

        let json = r#"{"id":2,"name":"Gift","amount":10,"date":"2025-01-02"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.category_display(), "N/A");
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let json = r#"{"id":1,"name":"x","amount":1,"date":"yesterday"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_new_transaction_wire_format() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let t = NewTransaction::new("Dinner", 850.0, 9, date).with_icon("https://cdn/food.png");
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["catergoryId"], 9);
        assert!(value.get("categoryId").is_none());
        assert_eq!(value["date"], "2025-02-14");
        assert_eq!(value["icon"], "https://cdn/food.png");
    }

    #[test]
    fn test_total_amount() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let make = |id, amount| Transaction {
            id,
            name: "x".to_string(),
            amount,
            icon: None,
            date,
            category: None,
            category_id: None,
            category_name: None,
        };
        assert_eq!(total_amount(&[make(1, 100.0), make(2, 250.5)]), 350.5);
        assert_eq!(total_amount(&[]), 0.0);
    }
}
