use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Privilege tier. Ordering matters: `user < creator < admin`, so
/// "at least creator" checks are plain comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Role {
    User,
    Creator,
    Admin,
}

impl Role {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "creator" => Some(Role::Creator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Creator => write!(f, "creator"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Database row for the users table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: Option<bool>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordering_reflects_privilege() {
        assert!(Role::User < Role::Creator);
        assert!(Role::Creator < Role::Admin);
        assert!(Role::Admin >= Role::Creator);
    }

    #[test]
    fn role_parses_known_strings_only() {
        assert_eq!(Role::from_api_str("creator"), Some(Role::Creator));
        assert_eq!(Role::from_api_str("superadmin"), None);
        assert_eq!(Role::from_api_str("Admin"), None);
    }
}
