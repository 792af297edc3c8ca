use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    db::{
        models::{Message, MessageOrder, NewMessage},
        MessageRepo,
    },
    error::{require, Result},
    routes::ApiJson,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(create_message))
        .route("/messages/:complaint_id", get(list_messages))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub name: Option<String>,
    pub message: Option<String>,
    pub complaint_id: Option<String>,
}

async fn create_message(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let name = require(body.name.as_deref(), "Name is required")?;
    let message = require(body.message.as_deref(), "Message is required")?;

    let saved = MessageRepo::create(
        &state.db.pool,
        &NewMessage {
            name: name.to_string(),
            message: message.to_string(),
            complaint_id: body.complaint_id.filter(|id| !id.trim().is_empty()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Newest message first.
async fn list_messages(
    State(state): State<AppState>,
    Path(complaint_id): Path<String>,
) -> Result<Json<Vec<Message>>> {
    let messages =
        MessageRepo::list_for_complaint(&state.db.pool, &complaint_id, MessageOrder::NewestFirst)
            .await?;
    Ok(Json(messages))
}
