//! Session-related types for portal authentication.

use serde::{Deserialize, Serialize};

use customer_ops_core::{CustomerId, UserId, UserRole};

use super::UserProfile;

/// Session-stored identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User ID.
    pub uid: UserId,
    /// Sign-in email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Normalized role.
    pub role: UserRole,
    /// Customer account for customer users.
    pub customer_id: Option<CustomerId>,
}

impl CurrentUser {
    /// Build the session identity from a loaded profile.
    #[must_use]
    pub fn from_profile(profile: UserProfile, email: &str) -> Self {
        let name = profile.display_name().to_owned();
        Self {
            uid: profile.id,
            email: profile.email.unwrap_or_else(|| email.to_owned()),
            name: if name.is_empty() { email.to_owned() } else { name },
            role: profile.role,
            customer_id: profile.customer_id,
        }
    }

    /// Whether the user has staff privileges.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_placeholder_profile() {
        let profile = UserProfile::placeholder(UserId::new("u1"), "ana@example.com");
        let user = CurrentUser::from_profile(profile, "ana@example.com");
        assert_eq!(user.name, "ana@example.com");
        assert_eq!(user.role, UserRole::Customer);
        assert!(!user.is_staff());
    }
}
