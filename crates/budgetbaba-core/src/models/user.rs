use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the logged-in user as returned by the API.
///
/// Only `id` and `email` are required. Unknown fields are kept in `extra`
/// so the record round-trips through storage without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "profileImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: i64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: None,
            profile_image_url: None,
            extra: Map::new(),
        }
    }

    /// Name to greet the user with: full name when known, else the email.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "profileImageUrl")]
    pub profile_image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_keeps_unknown_fields() {
        let json = r#"{"id":7,"email":"a@b.com","fullName":"Asha Rao","createdAt":"2025-01-01T10:00:00"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.display_name(), "Asha Rao");
        assert_eq!(
            user.extra.get("createdAt").and_then(|v| v.as_str()),
            Some("2025-01-01T10:00:00")
        );

        let back: Value = serde_json::to_value(&user).unwrap();
        assert_eq!(back["createdAt"], "2025-01-01T10:00:00");
        assert_eq!(back["fullName"], "Asha Rao");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = UserProfile::new(1, "a@b.com");
        assert_eq!(user.display_name(), "a@b.com");
        user.full_name = Some("   ".to_string());
        assert_eq!(user.display_name(), "a@b.com");
    }

    #[test]
    fn test_register_request_wire_names() {
        let req = RegisterRequest {
            full_name: "Asha".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            profile_image_url: String::new(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["fullName"], "Asha");
        assert_eq!(value["profileImageUrl"], "");
    }
}
