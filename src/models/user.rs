//! User records with per-account analysis counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Full user record as stored in the KV store (includes password_hash —
/// never serialize to API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub organization: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub total_analyses: u32,
    pub total_threats_detected: u32,
}

impl User {
    /// KV key for the user record.
    pub fn key(id: Uuid) -> String {
        format!("users:{id}")
    }

    /// KV key for the email → id unique index.
    pub fn email_key(email: &str) -> String {
        format!("users:email:{email}")
    }

    /// KV key for the user's analysis-id index list, newest first.
    pub fn analyses_key(id: Uuid) -> String {
        format!("users:{id}:analyses")
    }
}

/// User response DTO — excludes password_hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub organization: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub total_analyses: u32,
    pub total_threats_detected: u32,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            organization: u.organization,
            role: u.role,
            created_at: u.created_at,
            total_analyses: u.total_analyses,
            total_threats_detected: u.total_threats_detected,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            email: "analyst@nexus.test".to_string(),
            password_hash: "secret_hash".to_string(),
            full_name: "Security Analyst".to_string(),
            organization: "Nexus Labs".to_string(),
            role: "Security Analyst".to_string(),
            created_at: Utc::now(),
            total_analyses: 3,
            total_threats_detected: 1,
        }
    }

    #[test]
    fn user_response_excludes_password() {
        let json = serde_json::to_string(&UserResponse::from(sample_user())).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn user_to_response_keeps_counters() {
        let response: UserResponse = sample_user().into();
        assert_eq!(response.total_analyses, 3);
        assert_eq!(response.total_threats_detected, 1);
    }

    #[test]
    fn kv_keys() {
        let id = Uuid::nil();
        assert_eq!(
            User::key(id),
            "users:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            User::analyses_key(id),
            "users:00000000-0000-0000-0000-000000000000:analyses"
        );
        assert_eq!(
            User::email_key("a@b.test"),
            "users:email:a@b.test"
        );
    }

    #[test]
    fn signup_request_validation() {
        use validator::Validate;

        let ok = SignupRequest {
            email: "analyst@nexus.test".to_string(),
            password: "longenough".to_string(),
            full_name: "Analyst".to_string(),
            organization: String::new(),
            role: String::new(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = SignupRequest {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupRequest {
            password: "short".to_string(),
            ..ok
        };
        assert!(short_password.validate().is_err());
    }
}
