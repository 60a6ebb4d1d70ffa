//! User profile and credential models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use customer_ops_core::{CustomerId, UserId, UserRole};

/// A user profile stored at `users/{uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID (shared with the credential record).
    pub id: UserId,
    /// Normalized role; missing or unknown values read as `customer`.
    #[serde(default)]
    pub role: UserRole,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Customer account for customer users.
    pub customer_id: Option<CustomerId>,
    /// Sign-in email.
    pub email: Option<String>,
}

impl UserProfile {
    /// The placeholder profile written for a user who has none yet.
    #[must_use]
    pub fn placeholder(id: UserId, email: &str) -> Self {
        Self {
            id,
            role: UserRole::Customer,
            name: email.to_owned(),
            customer_id: None,
            email: Some(email.to_owned()),
        }
    }

    /// Whether this user has staff privileges.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Name to show in audit entries and comments.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.email.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

/// Password credential stored at `credentials/{uid}`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: UserId,
    /// Normalized (lowercase) email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_is_normalized_on_read() {
        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({"id": "u1", "role": "Staff", "name": "Sam"}))
                .unwrap();
        assert_eq!(profile.role, UserRole::Staff);

        let profile: UserProfile =
            serde_json::from_value(serde_json::json!({"id": "u2"})).unwrap();
        assert_eq!(profile.role, UserRole::Customer);
    }

    #[test]
    fn test_placeholder_uses_email_as_name() {
        let profile = UserProfile::placeholder(UserId::new("u1"), "ana@example.com");
        assert_eq!(profile.role, UserRole::Customer);
        assert_eq!(profile.display_name(), "ana@example.com");
        assert!(profile.customer_id.is_none());
    }

    #[test]
    fn test_credential_debug_redacts_hash() {
        let credential = Credential {
            id: UserId::new("u1"),
            email: "a@b.c".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: None,
        };
        assert!(!format!("{credential:?}").contains("argon2id"));
    }
}
