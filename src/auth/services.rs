use tracing::{error, info, warn};

use super::dto::{
    LoginRequest, RegisterRequest, RegisterResponse, TokenResponse, MAX_EMAIL_LENGTH,
    MIN_PASSWORD_LENGTH,
};
use super::jwt::TokenCodec;
use super::password::{hash_password, verify_password};
use crate::{
    error::AppError,
    users::{NewUser, StoreError, UserStore},
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn db_error(e: StoreError) -> AppError {
    error!(error = %e, "user store failed");
    AppError::internal("db error")
}

fn validate(req: &mut RegisterRequest) -> Result<(), AppError> {
    req.email = req.email.trim().to_string();
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("email & password required"));
    }
    if req.email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(AppError::validation("email too long"));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation("password too short"));
    }
    Ok(())
}

/// Argon2 is CPU bound; keep it off the async workers.
async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "hash task failed");
            AppError::internal("hash error")
        })?
}

async fn verify_blocking(hash: String, password: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| {
            error!(error = %e, "verify task failed");
            AppError::internal("hash error")
        })
}

pub async fn register(
    store: &dyn UserStore,
    mut req: RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    validate(&mut req)?;

    // Fast-path rejection; the store's uniqueness check is authoritative.
    if store.count_by_email(&req.email).await.map_err(db_error)? > 0 {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::conflict("email exists"));
    }

    let password_hash = hash_blocking(req.password).await?;

    let user = match store
        .create(NewUser {
            email: req.email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!("email registered concurrently");
            return Err(AppError::conflict("email exists"));
        }
        Err(e) => return Err(db_error(e)),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(RegisterResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at,
    })
}

pub async fn login(
    store: &dyn UserStore,
    codec: &TokenCodec,
    req: LoginRequest,
) -> Result<TokenResponse, AppError> {
    let email = req.email.trim();

    let user = match store.find_by_email(email).await.map_err(db_error)? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    if !verify_blocking(user.password_hash.clone(), req.password).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = codec.issue(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::internal("token error")
    })?;

    info!(user_id = user.id, "user logged in");
    Ok(TokenResponse { token })
}
