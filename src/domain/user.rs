use serde::{Deserialize, Serialize};

/// Account record as persisted in `users.json`. Passwords are stored in
/// clear text; this tool is local and single-user by design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// The authenticated identity for one run of the interactive loop.
/// Passed explicitly into every todo-service call instead of living in
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self { username: user.username.clone() }
    }
}
