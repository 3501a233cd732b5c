//! Token route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::AuthService;
use crate::state::AppState;

/// Credentials supplied to obtain a token.
#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    pub email: String,
    pub password: String,
}

/// A freshly minted access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue an access token for valid credentials. Bad credentials → 400.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTokenRequest>,
) -> Result<Json<TokenResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    let token = state
        .tokens()
        .mint(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(TokenResponse { token }))
}
