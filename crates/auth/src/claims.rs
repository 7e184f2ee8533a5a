//! JWT claims model (transport-agnostic).

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use trailhead_core::UserId;

use crate::Role;

/// The minimal set of claims a trailhead token carries.
///
/// `iat`/`exp` are Unix-second timestamps so that the JWT layer can validate
/// expiry natively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Role granted to the user at issuance time.
    pub role: Role,

    /// Issued-at (Unix seconds).
    pub iat: i64,

    /// Expiration (Unix seconds).
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: UserId, role: Role, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub,
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_issued_at_plus_ttl() {
        let now = Utc::now();
        let claims = Claims::new(UserId::new(), Role::User, now, Duration::minutes(90));
        assert_eq!(claims.exp - claims.iat, 90 * 60);
    }
}
