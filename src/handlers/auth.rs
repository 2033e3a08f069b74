// handlers/auth.rs - account signup, login and token introspection

use axum::extract::State;
use serde::Serialize;
use tokio::task;

use crate::auth::{self, Claims};
use crate::database::models::User;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::state::AppState;
use crate::validation::schemas::{LoginInput, SignupInput};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    pub user_id: i32,
    pub email: String,
}

/// POST /auth/signup - create an account
///
/// Input: `{"email": "...", "password": "at least 6 chars"}`
/// Output: 201 `{"id", "email", "createdAt"}`; 409 if the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupInput>,
) -> ApiResult<User> {
    let SignupInput { email, password } = input;

    let password_hash = task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))??;

    let user = UserRepository::new(&state.pool)
        .create(&email, &password_hash)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::conflict("Email already registered")
            } else {
                e.into()
            }
        })?;

    tracing::info!(user_id = user.id, "user signed up");
    Ok(ApiResponse::created(user))
}

/// POST /auth/login - exchange credentials for a bearer token
///
/// Unknown email and wrong password get the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginInput>,
) -> ApiResult<LoginResponse> {
    let credentials = UserRepository::new(&state.pool)
        .find_credentials(&input.email)
        .await?;

    // Unknown emails still pay for one verification
    let password = input.password;
    let stored_hash = credentials
        .as_ref()
        .map_or_else(|| auth::DUMMY_PASSWORD_HASH.to_string(), |c| c.password_hash.clone());
    let verified = task::spawn_blocking(move || auth::verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {e}")))?;

    let credentials = match credentials {
        Some(credentials) if verified => credentials,
        Some(credentials) => {
            tracing::debug!(user_id = credentials.id, "login rejected: wrong password");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        None => {
            tracing::debug!("login rejected: unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let security = &state.config.security;
    let claims = Claims::new(credentials.id, credentials.email, security.jwt_expiry_secs);
    let token = auth::generate_jwt(&claims, &security.jwt_secret)?;

    tracing::info!(user_id = credentials.id, "user logged in");
    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: security.jwt_expiry_secs,
    }))
}

/// GET /auth/me - identity carried by the presented token
pub async fn me(user: AuthUser) -> ApiResult<WhoAmI> {
    Ok(ApiResponse::success(WhoAmI {
        user_id: user.user_id,
        email: user.email,
    }))
}
