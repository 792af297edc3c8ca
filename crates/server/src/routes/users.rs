use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{
        models::{int_or_string, User, UserProfileUpdate, AGENT_TYPE, ORDINARY_TYPES},
        UserRepo,
    },
    error::{AppError, Result},
    routes::ApiJson,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        // GET takes a district, DELETE a user id.
        .route(
            "/OrdinaryUsers/:key",
            get(list_ordinary_users).delete(delete_user),
        )
        .route("/AgentUsers", get(list_agents))
        .route("/AgentUsers/:agent_id", get(get_agent))
        .route("/user/:id", put(update_user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub phone: Option<i64>,
}

async fn list_ordinary_users(
    State(state): State<AppState>,
    Path(district): Path<String>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepo::list_by_type(&state.db.pool, &ORDINARY_TYPES, Some(&district)).await?;

    if users.is_empty() {
        return Err(AppError::NotFound(
            "No users found for this district".to_string(),
        ));
    }

    Ok(Json(users))
}

/// Deleting a user never touches their complaints.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let deleted = UserRepo::delete(&state.db.pool, &id).await?;
    tracing::info!(user_id = %id, deleted, "Delete user");

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

async fn list_agents(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let agents = UserRepo::list_by_type(&state.db.pool, &[AGENT_TYPE], None).await?;
    Ok(Json(agents))
}

async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<User>> {
    UserRepo::find_by_id(&state.db.pool, &agent_id)
        .await?
        .filter(|user| user.user_type == AGENT_TYPE)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    let update = UserProfileUpdate {
        name: body.name.filter(|v| !v.trim().is_empty()),
        email: body.email.filter(|v| !v.trim().is_empty()),
        phone: body.phone,
    };

    UserRepo::update_profile(&state.db.pool, &id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
