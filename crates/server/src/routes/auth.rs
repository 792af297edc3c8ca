use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;

use crate::{
    db::{
        models::{int_or_string, NewUser, User},
        UserRepo,
    },
    error::{require, AppError, Result},
    routes::ApiJson,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/SignUp", post(sign_up))
        .route("/Login", post(login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub phone: Option<i64>,
    pub user_type: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

async fn sign_up(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignUpRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let name = require(body.name.as_deref(), "Name is required")?;
    let email = require(body.email.as_deref(), "Email is required")?;
    let password = require(body.password.as_deref(), "Password is required")?;
    let phone = body
        .phone
        .ok_or_else(|| AppError::Validation("Phone is required".to_string()))?;
    let user_type = require(body.user_type.as_deref(), "UserType is required")?;

    let user = UserRepo::create(
        &state.db.pool,
        &NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone,
            user_type: user_type.to_string(),
            district: body.district.filter(|d| !d.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, user_type = %user.user_type, "Registered user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Plaintext comparison against the stored password.
async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<User>> {
    let email = require(body.email.as_deref(), "Email is required")?;
    let password = require(body.password.as_deref(), "Password is required")?;

    let user = UserRepo::find_by_email(&state.db.pool, email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User doesn't exist".to_string()))?;

    if user.password != password {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    Ok(Json(user))
}
