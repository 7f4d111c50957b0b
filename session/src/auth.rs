use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::*;

/// A user the authentication collaborator vouched for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
}

/// Authentication collaborator: turns a username into a validated identity.
pub trait Authenticator: Send + Sync {
    fn resolve(&self, username: &str) -> Result<Identity>;

    /// Looks up the owner of a saved game.
    fn identity(&self, user_id: UserId) -> Result<Identity>;
}

/// Fixed user table. Usernames match case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct StaticAuthenticator {
    users: HashMap<String, Identity>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, full_name: &str) -> Self {
        let user_id = UserId(self.users.len() as u64 + 1);
        self.users.insert(
            username.to_lowercase(),
            Identity {
                user_id,
                username: username.into(),
                full_name: full_name.into(),
            },
        );
        self
    }
}

impl Authenticator for StaticAuthenticator {
    fn resolve(&self, username: &str) -> Result<Identity> {
        self.users
            .get(&username.to_lowercase())
            .cloned()
            .ok_or_else(|| SessionError::UnknownUser(username.into()))
    }

    fn identity(&self, user_id: UserId) -> Result<Identity> {
        self.users
            .values()
            .find(|identity| identity.user_id == user_id)
            .cloned()
            .ok_or(SessionError::UnknownOwner(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_users_only() {
        let auth = StaticAuthenticator::new()
            .with_user("ada", "Ada Lovelace")
            .with_user("alan", "Alan Turing");

        let alan = auth.resolve("Alan").unwrap();
        assert_eq!(alan.user_id, UserId(2));
        assert_eq!(alan.full_name, "Alan Turing");
        assert_eq!(
            auth.resolve("grace"),
            Err(SessionError::UnknownUser("grace".into()))
        );
    }

    #[test]
    fn identity_by_id() {
        let auth = StaticAuthenticator::new().with_user("ada", "Ada Lovelace");
        assert_eq!(auth.identity(UserId(1)).unwrap().username, "ada");
        assert_eq!(
            auth.identity(UserId(2)),
            Err(SessionError::UnknownOwner(UserId(2)))
        );
    }
}
