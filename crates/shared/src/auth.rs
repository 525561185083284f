//! Authentication types for the JWT role gate.
//!
//! User management and credential verification live outside this system;
//! the API only consumes externally issued tokens carrying a role claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles recognized by the role gate.
///
/// Most financial endpoints accept `Admin` or `Pimpinan`; chart-of-accounts
/// and cost-category edits are narrower (`Admin` only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// System administrator.
    Admin,
    /// Utility director (pimpinan) - approves and posts financial events.
    Pimpinan,
    /// Field/back-office clerk - read-only access.
    Petugas,
}

impl UserRole {
    /// Parses a role from its claim string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "PIMPINAN" => Some(Self::Pimpinan),
            "PETUGAS" => Some(Self::Petugas),
            _ => None,
        }
    }

    /// Returns the claim string for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Pimpinan => "PIMPINAN",
            Self::Petugas => "PETUGAS",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: UserRole, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the parsed role, if recognized.
    #[must_use]
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [UserRole::Admin, UserRole::Pimpinan, UserRole::Petugas] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("pimpinan"), Some(UserRole::Pimpinan));
        assert_eq!(UserRole::parse("superuser"), None);
    }

    #[test]
    fn test_claims_role() {
        let claims = Claims::new(
            Uuid::new_v4(),
            UserRole::Admin,
            Utc::now() + chrono::Duration::minutes(15),
        );
        assert_eq!(claims.user_role(), Some(UserRole::Admin));
    }
}
