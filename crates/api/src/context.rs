use trailhead_auth::Role;
use trailhead_core::UserId;
use trailhead_domain::User;

/// Authenticated identity for a request.
///
/// Produced by the `protect` extractor in `middleware.rs`; handlers that take
/// this as an argument are authenticated routes.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}
