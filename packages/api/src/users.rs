//! # Credential store — registration, login and profiles
//!
//! Passwords are hashed with Argon2id before they reach storage. Uniqueness of
//! usernames is decided by the store's unique constraint at insert time, not by
//! a prior lookup, so two concurrent registrations cannot both succeed.
//!
//! Authentication failures are deliberately indistinguishable: an unknown
//! username and a wrong password both surface as [`Error::InvalidCredentials`].

use std::sync::Arc;

use store::{Store, User, UserId, UserProfile};

use crate::auth::{hash_password, verify_password, TokenService};
use crate::error::{Error, Result};

/// Width of the `users.username` column.
pub const MAX_USERNAME_LEN: usize = 100;

pub struct UserService<S> {
    store: Arc<S>,
    tokens: TokenService,
}

impl<S: Store> UserService<S> {
    pub fn new(store: Arc<S>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user. Fails with [`Error::Conflict`] if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }
        if username.contains('\0') {
            return Err(Error::validation("username must not contain NUL"));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(Error::validation(format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "failed to hash password");
            Error::Internal
        })?;

        let user = self.store.insert_user(username, &password_hash).await?;
        tracing::info!(user_id = user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Check a username/password pair and return the user's id.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserId> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidCredentials);
        }

        let Some(user) = self.store.user_by_username(username).await? else {
            tracing::warn!(%username, "login for unknown user");
            return Err(Error::InvalidCredentials);
        };

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "stored password hash is malformed");
            Error::Internal
        })?;
        if !valid {
            tracing::warn!(user_id = user.id, "login with wrong password");
            return Err(Error::InvalidCredentials);
        }

        Ok(user.id)
    }

    /// Authenticate and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user_id = self.authenticate(username, password).await?;
        self.tokens.issue(user_id)
    }

    pub async fn profile(&self, user_id: UserId) -> Result<UserProfile> {
        self.store
            .user_by_id(user_id)
            .await?
            .map(|user| user.to_profile())
            .ok_or(Error::NotFound("user"))
    }
}
