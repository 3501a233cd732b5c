//! User route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bramble_core::{Email, UserId};

use crate::db::{ProductRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Product, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Detailed view: the user plus the products they own.
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub products: Vec<Product>,
}

/// Fields for signup.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Fields for a profile update; omitted fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// List all users.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Sign up a new user.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Show a user's own profile, including the products they own.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserDetailResponse>> {
    authorize_self(&user, id)?;

    let products = ProductRepository::new(state.pool())
        .list_by_owner(user.id)
        .await?;

    Ok(Json(UserDetailResponse {
        user: UserResponse::from(&user),
        products,
    }))
}

/// Update a user's own email and/or password.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateUserRequest>,
) -> Result<StatusCode> {
    authorize_self(&user, id)?;

    AuthService::new(state.pool())
        .update_profile(&user, body.email.as_deref(), body.password.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user's own account.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    authorize_self(&user, id)?;

    UserRepository::new(state.pool()).delete(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Users may only operate on their own record.
fn authorize_self(user: &User, path_id: i32) -> Result<()> {
    if user.id.as_i32() != path_id {
        return Err(AppError::Forbidden(
            "you may only access your own account".to_string(),
        ));
    }
    Ok(())
}
