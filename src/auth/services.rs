use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, info, warn};

use crate::auth::{
    dto::{LoginRequest, UserView},
    password::{hash_password_blocking, verify_password_blocking},
    repo::{DuplicateEmail, UserStore},
    repo_types::NewUser,
};
use crate::state::AppState;

const MISSING_CREDENTIALS: &str = "Email and password are required";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Invalid credentials")]
    UnknownEmail,
    #[error("Email already registered")]
    EmailTaken,
    /// Store or hashing failure; the cause is logged, never shown to clients.
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

/// Result of the combined login-or-register operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(UserView),
    Created(UserView),
}

impl LoginOutcome {
    pub fn user(&self) -> &UserView {
        match self {
            LoginOutcome::Authenticated(u) | LoginOutcome::Created(u) => u,
        }
    }

    pub fn into_user(self) -> UserView {
        match self {
            LoginOutcome::Authenticated(u) | LoginOutcome::Created(u) => u,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, LoginOutcome::Created(_))
    }
}

/// Validated credentials borrowed from a request.
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Missing or blank email/password is rejected here, before any store access.
/// Both values are otherwise used exactly as sent.
fn credentials(req: &LoginRequest) -> Result<Credentials<'_>, IdentityError> {
    let email = req.email.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();
    if email.trim().is_empty() || password.is_empty() {
        return Err(IdentityError::BadRequest(MISSING_CREDENTIALS));
    }
    Ok(Credentials { email, password })
}

#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn UserStore>,
}

impl FromRef<AppState> for IdentityService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl IdentityService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Log in an existing account, or create it when the email is unknown.
    pub async fn authenticate_or_register(
        &self,
        req: LoginRequest,
    ) -> Result<LoginOutcome, IdentityError> {
        let creds = credentials(&req)?;

        match self.store.find_by_email(creds.email).await.map_err(IdentityError::Storage)? {
            Some(user) => {
                if !verify_password_blocking(creds.password.to_owned(), user.password_hash.clone())
                    .await
                    .map_err(IdentityError::Storage)?
                {
                    warn!(email = %user.email, user_id = %user.id, "login invalid password");
                    return Err(IdentityError::InvalidPassword);
                }
                info!(email = %user.email, user_id = %user.id, "user logged in");
                Ok(LoginOutcome::Authenticated(user.into()))
            }
            None => {
                debug!(email = %creds.email, "unknown email, registering");
                // a concurrent registration that won the race is a storage failure here
                let view = self.create(&creds, &req).await.map_err(|e| match e {
                    IdentityError::EmailTaken => IdentityError::Storage(anyhow::Error::new(
                        DuplicateEmail(creds.email.to_owned()),
                    )),
                    other => other,
                })?;
                Ok(LoginOutcome::Created(view))
            }
        }
    }

    /// Log in only; an unknown email is an authentication failure.
    pub async fn authenticate(&self, req: LoginRequest) -> Result<UserView, IdentityError> {
        let creds = credentials(&req)?;

        let Some(user) = self
            .store
            .find_by_email(creds.email)
            .await
            .map_err(IdentityError::Storage)?
        else {
            warn!(email = %creds.email, "login unknown email");
            return Err(IdentityError::UnknownEmail);
        };

        if !verify_password_blocking(creds.password.to_owned(), user.password_hash.clone())
            .await
            .map_err(IdentityError::Storage)?
        {
            warn!(email = %user.email, user_id = %user.id, "login invalid password");
            return Err(IdentityError::InvalidPassword);
        }

        info!(email = %user.email, user_id = %user.id, "user logged in");
        Ok(user.into())
    }

    /// Register only; an email already on record is a conflict.
    pub async fn register(&self, req: LoginRequest) -> Result<UserView, IdentityError> {
        let creds = credentials(&req)?;

        if self
            .store
            .find_by_email(creds.email)
            .await
            .map_err(IdentityError::Storage)?
            .is_some()
        {
            warn!(email = %creds.email, "email already registered");
            return Err(IdentityError::EmailTaken);
        }

        self.create(&creds, &req).await
    }

    /// Hash and insert; a unique violation from the store becomes `EmailTaken`.
    async fn create(
        &self,
        creds: &Credentials<'_>,
        req: &LoginRequest,
    ) -> Result<UserView, IdentityError> {
        let password_hash = hash_password_blocking(creds.password.to_owned())
            .await
            .map_err(IdentityError::Storage)?;

        let user = self
            .store
            .insert(NewUser {
                email: creds.email.to_owned(),
                password_hash,
                name: req.name.clone(),
                language: req.language.clone(),
                field: req.field.clone(),
            })
            .await
            .map_err(|e| {
                if e.is::<DuplicateEmail>() {
                    warn!(email = %creds.email, "email registered concurrently");
                    IdentityError::EmailTaken
                } else {
                    IdentityError::Storage(e)
                }
            })?;

        info!(email = %user.email, user_id = %user.id, "user registered");
        Ok(user.into())
    }
}
