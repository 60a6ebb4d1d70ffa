//! User roles.
//!
//! Roles are stored as free text on user profiles and compared
//! case-insensitively. A missing or unrecognised role means `Customer`.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Portal role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full staff access, including user management from the CLI.
    Admin,
    /// Can manage orders, customers, products and production.
    Staff,
    /// Can see and create orders for their own customer account.
    #[default]
    Customer,
}

impl UserRole {
    /// Normalize a stored role value.
    ///
    /// Comparison is case-insensitive and surrounding whitespace is ignored.
    /// `None`, empty, and unknown values all become [`UserRole::Customer`].
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("admin") => Self::Admin,
            Some("staff") => Self::Staff,
            _ => Self::Customer,
        }
    }

    /// Whether this role is one of the two privileged roles.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// The stored lowercase form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::normalize(raw.as_deref()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(UserRole::normalize(Some("ADMIN")), UserRole::Admin);
        assert_eq!(UserRole::normalize(Some(" Staff ")), UserRole::Staff);
        assert_eq!(UserRole::normalize(Some("customer")), UserRole::Customer);
    }

    #[test]
    fn test_normalize_defaults_to_customer() {
        assert_eq!(UserRole::normalize(None), UserRole::Customer);
        assert_eq!(UserRole::normalize(Some("")), UserRole::Customer);
        assert_eq!(UserRole::normalize(Some("owner")), UserRole::Customer);
    }

    #[test]
    fn test_is_staff() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Customer.is_staff());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let role: UserRole = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);

        let role: UserRole = serde_json::from_str("null").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("owner".parse::<UserRole>().is_err());
    }
}
