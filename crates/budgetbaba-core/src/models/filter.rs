use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "name" => Ok(SortField::Name),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Body of `/filter`. Empty dates and keyword mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(rename = "startDate", serialize_with = "serialize_day")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", serialize_with = "serialize_day")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "sortField")]
    pub sort_field: SortField,
    #[serde(rename = "sortOrder")]
    pub sort_order: SortOrder,
    pub keyword: String,
}

impl FilterRequest {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            start_date: None,
            end_date: None,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            keyword: String::new(),
        }
    }
}

fn serialize_day<S: serde::Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_str(""),
    }
}
