//! Login, registration and token verification against the user store.

use serde::Serialize;

use mediateca_core::error::CoreError;
use mediateca_core::roles::Role;
use mediateca_core::types::DbId;
use mediateca_db::models::user::{CreateUser, User};
use mediateca_db::repositories::UserRepo;
use mediateca_db::DbPool;

use crate::auth::jwt::{generate_token, validate_token, Claims, JwtConfig, TokenRejection};
use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;

/// Constraint backing email uniqueness in `users`.
const EMAIL_CONSTRAINT: &str = "uq_users_email";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    InactiveAccount,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::InactiveAccount
            | AuthError::TokenExpired
            | AuthError::InvalidToken => AppError::Core(CoreError::Unauthorized(err.to_string())),
            AuthError::DuplicateEmail => AppError::Core(CoreError::Conflict(err.to_string())),
            AuthError::Database(e) => AppError::Database(e),
            AuthError::Internal(msg) => AppError::InternalError(msg),
        }
    }
}

/// Public user info returned alongside a token.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// A successful login.
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserSummary,
}

/// An identity whose token verified and whose account is still active.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: DbId,
    pub email: String,
    /// Role as currently stored, not as embedded in the token.
    pub role: Role,
}

/// Check credentials and issue a token.
///
/// The password is verified before the active flag so that an unknown
/// email, a wrong password and a wrong password on a deactivated account
/// all produce the same error.
pub async fn authenticate(
    pool: &DbPool,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AuthError> {
    let user = UserRepo::find_by_email(pool, email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::debug!(user_id = user.id, "Rejected login: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
        tracing::info!(user_id = user.id, "Rejected login: account deactivated");
        return Err(AuthError::InactiveAccount);
    }

    UserRepo::record_login(pool, user.id).await?;

    let token = generate_token(user.id, &user.email, &user.role, jwt)
        .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(LoginOutcome {
        token,
        user: UserSummary::from(&user),
    })
}

/// Create an active user and return its id.
pub async fn register(
    pool: &DbPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<DbId, AuthError> {
    if UserRepo::find_by_email(pool, email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_password(password)
        .map_err(|e| AuthError::Internal(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
        role: role.as_str().to_string(),
    };

    match UserRepo::create(pool, &input).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, role = %role, "User registered");
            Ok(user.id)
        }
        // Lost a race with a concurrent registration of the same email.
        Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
            Err(AuthError::DuplicateEmail)
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate a bearer token and confirm the account still exists and is
/// active.
pub async fn verify(
    pool: &DbPool,
    jwt: &JwtConfig,
    token: &str,
) -> Result<VerifiedIdentity, AuthError> {
    let claims: Claims = validate_token(token, jwt).map_err(|rejection| match rejection {
        TokenRejection::Expired => AuthError::TokenExpired,
        TokenRejection::Invalid => AuthError::InvalidToken,
    })?;

    let user = UserRepo::find_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::InvalidToken)?;
    if !user.is_active {
        return Err(AuthError::InactiveAccount);
    }

    let role = user
        .role
        .parse::<Role>()
        .map_err(|e| AuthError::Internal(format!("Stored role is invalid: {e}")))?;

    Ok(VerifiedIdentity {
        user_id: user.id,
        email: user.email,
        role,
    })
}
