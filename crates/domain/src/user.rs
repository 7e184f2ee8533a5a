//! User record and signup validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailhead_auth::Role;
use trailhead_core::{DomainError, DomainResult, UserId};

pub const PASSWORD_MIN_LEN: usize = 8;

/// A persisted user account.
///
/// The password hash is never serialized; responses and stored-document
/// projections only ever see the public fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub role: Role,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Signup input. Fields are optional so presence failures surface as the
/// schema's own messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl NewUser {
    /// Validate signup input, returning `(name, email, password)` with the
    /// email lowercased. The caller hashes the password before construction.
    pub fn validate(self) -> DomainResult<(String, String, Option<String>, String)> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DomainError::validation("Please tell us your name"))?
            .trim()
            .to_string();

        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| DomainError::validation("Please provide your email"))?
            .trim()
            .to_lowercase();
        if !looks_like_email(&email) {
            return Err(DomainError::validation("Please provide a valid email"));
        }

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation("Please provide a password"))?;
        if password.len() < PASSWORD_MIN_LEN {
            return Err(DomainError::validation(
                "A password must have at least 8 characters",
            ));
        }

        let confirm = self
            .password_confirm
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation("Please confirm your password"))?;
        if confirm != password {
            return Err(DomainError::validation("Passwords do not match"));
        }

        Ok((name, email, self.photo, password))
    }
}

impl User {
    pub fn new(
        id: UserId,
        name: String,
        email: String,
        photo: Option<String>,
        password_hash: String,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            photo,
            role,
            password_hash,
            created_at: now,
        }
    }
}

/// Minimal shape check; real address verification is out of scope.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
