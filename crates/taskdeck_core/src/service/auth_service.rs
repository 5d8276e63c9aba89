//! Registration, login, token refresh and current-user lookup.
//!
//! # Invariants
//! - Unknown email and wrong password collapse to the same
//!   `Unauthenticated`; login failures leak nothing.
//! - Refresh of a valid token whose subject was deleted surfaces as
//!   `NotFound("user")` (404), matching the identity resolver.

use super::{ServiceError, ServiceResult};
use crate::auth::credentials::{hash_password, verify_password};
use crate::auth::identity::IdentityResolver;
use crate::auth::token::TokenService;
use crate::config::CoreConfig;
use crate::model::user::{NewUser, User};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use log::info;
use rusqlite::Connection;
use serde::Serialize;

/// Access/refresh token pair returned by login and registration.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Registration response: profile fields plus a fresh token pair.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

const TOKEN_TYPE_BEARER: &str = "bearer";

/// Authentication use cases over one connection.
pub struct AuthService<'conn> {
    conn: &'conn Connection,
    tokens: TokenService,
    identity: IdentityResolver,
}

impl<'conn> AuthService<'conn> {
    pub fn new(conn: &'conn Connection, config: &CoreConfig) -> Self {
        Self {
            conn,
            tokens: TokenService::new(config),
            identity: IdentityResolver::new(config),
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// Email validation is deliberately shallow (non-blank, contains `@`);
    /// deliverability is the caller's problem, and the unique index catches
    /// duplicates regardless of shape.
    ///
    /// # Errors
    /// - `Invalid` for blank fields or an email without `@`.
    /// - `Conflict` when the email is already registered.
    pub fn register(&self, name: &str, email: &str, password: &str) -> ServiceResult<RegisteredUser> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("name must not be empty".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::Invalid("email is not valid".into()));
        }
        if password.is_empty() {
            return Err(ServiceError::Invalid("password must not be empty".into()));
        }

        let password_hash =
            hash_password(password).map_err(|err| ServiceError::Internal(err.to_string()))?;
        let user = SqliteUserRepository::new(self.conn).create_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        })?;

        let pair = self.issue_pair(user.id)?;
        info!(
            "event=user_register module=auth status=ok user={}",
            user.id
        );
        Ok(RegisteredUser {
            id: user.id,
            email: user.email,
            username: user.name,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: TOKEN_TYPE_BEARER,
        })
    }

    /// Verifies credentials and issues a token pair.
    pub fn login(&self, email: &str, password: &str) -> ServiceResult<TokenPair> {
        let user = SqliteUserRepository::new(self.conn).get_user_by_email(email.trim())?;
        let authenticated = user
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(ServiceError::Unauthenticated)?;

        info!(
            "event=user_login module=auth status=ok user={}",
            authenticated.id
        );
        self.issue_pair(authenticated.id)
    }

    /// Resolves the caller from a raw `Authorization` header value.
    pub fn current_user(&self, header: Option<&str>) -> ServiceResult<User> {
        Ok(self.identity.resolve(self.conn, header)?)
    }

    /// Exchanges a refresh token for a new access token.
    pub fn refresh(&self, refresh_token: &str) -> ServiceResult<String> {
        let subject_id = self
            .tokens
            .validate(refresh_token)
            .map_err(|_| ServiceError::Unauthenticated)?;

        let user = SqliteUserRepository::new(self.conn)
            .get_user(subject_id)?
            .ok_or(ServiceError::NotFound("user"))?;

        self.tokens
            .issue_access(user.id)
            .map_err(|err| ServiceError::Internal(err.to_string()))
    }

    fn issue_pair(&self, subject_id: i64) -> ServiceResult<TokenPair> {
        let access_token = self
            .tokens
            .issue_access(subject_id)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        let refresh_token = self
            .tokens
            .issue_refresh(subject_id)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER,
        })
    }
}
