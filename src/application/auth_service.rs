use async_trait::async_trait;

use crate::domain::error::AuthError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;

#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    async fn sign_up(&self, username: &str, password: &str) -> Result<User, AuthError>;
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;
}

#[derive(Clone)]
pub struct AuthServiceImpl<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AuthServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: UserRepository> AuthService for AuthServiceImpl<R> {
    async fn sign_up(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("username cannot be empty".into()));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password cannot be empty".into()));
        }
        // Case-sensitive exact match on the username.
        if self.repo.find(username).await?.is_some() {
            return Err(AuthError::DuplicateUser(username.to_string()));
        }
        let user = self
            .repo
            .insert(User { username: username.to_string(), password: password.to_string() })
            .await?;
        tracing::info!(username, "signed up");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        match self.repo.find(username).await? {
            Some(user) if user.password == password => {
                tracing::info!(username, "logged in");
                Ok(user)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
