//! User entity representing an account of the admin application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity keyed by normalized email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Lowercased email address, unique
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Avatar URL
    pub avatar: Option<String>,

    /// Whether ownership of the email has been proven (OTP or Google)
    pub is_email_verified: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new, unverified user
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: None,
            avatar: None,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Marks the email as verified
    pub fn verify_email(&mut self) {
        self.is_email_verified = true;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Fills profile fields from an identity provider without overwriting
    /// values the user already has
    pub fn fill_profile(&mut self, name: Option<&str>, avatar: Option<&str>) {
        if is_blank(self.name.as_deref()) {
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                self.name = Some(name.to_string());
            }
        }
        if is_blank(self.avatar.as_deref()) {
            if let Some(avatar) = avatar.filter(|a| !a.trim().is_empty()) {
                self.avatar = Some(avatar.to_string());
            }
        }
        self.updated_at = Utc::now();
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_creation() {
        let user = User::new("jane@example.com");
        assert_eq!(user.email, "jane@example.com");
        assert!(!user.is_email_verified);
        assert!(user.last_login_at.is_none());
        assert!(user.name.is_none());
    }

    #[test]
    fn test_verify_and_login() {
        let mut user = User::new("jane@example.com");
        user.verify_email();
        user.record_login();
        assert!(user.is_email_verified);
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_fill_profile_only_fills_empty_fields() {
        let mut user = User::new("jane@example.com");
        user.name = Some("Jane".to_string());
        user.avatar = Some(String::new());

        user.fill_profile(Some("Jane Google"), Some("https://img.example.com/j.png"));

        assert_eq!(user.name.as_deref(), Some("Jane"));
        assert_eq!(user.avatar.as_deref(), Some("https://img.example.com/j.png"));
    }

    #[test]
    fn test_fill_profile_ignores_blank_values() {
        let mut user = User::new("jane@example.com");
        user.fill_profile(Some("  "), None);
        assert!(user.name.is_none());
        assert!(user.avatar.is_none());
    }
}
