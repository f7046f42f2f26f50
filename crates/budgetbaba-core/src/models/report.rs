use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Asks the server to email a report of one transaction kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub email: String,
    #[serde(rename = "profileId")]
    pub profile_id: i64,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_wire_format() {
        let req = ReportRequest {
            kind: TransactionKind::Expense,
            email: "a@b.com".to_string(),
            profile_id: 42,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "expense");
        assert_eq!(value["profileId"], 42);
    }

    #[test]
    fn test_message_fallback() {
        let resp: MessageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.message_or("Email sent successfully"), "Email sent successfully");
    }
}
