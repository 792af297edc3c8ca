use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    db::{
        models::{AssignedComplaint, NewAssignment},
        AssignmentRepo, ComplaintRepo,
    },
    error::{require, Result},
    routes::ApiJson,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignedComplaints", post(assign_complaint))
        .route("/assignedComplaints/agent/:agent_id", get(list_agent_assignments))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub agent_id: Option<String>,
    pub complaint_id: Option<String>,
    pub status: Option<String>,
    pub agent_name: Option<String>,
}

async fn assign_complaint(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AssignRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    const MISSING: &str = "Missing fields";
    let agent_id = require(body.agent_id.as_deref(), MISSING)?;
    let complaint_id = require(body.complaint_id.as_deref(), MISSING)?;
    let status = require(body.status.as_deref(), MISSING)?;
    let agent_name = require(body.agent_name.as_deref(), MISSING)?;

    let mut tx = state.db.pool.begin().await?;

    let assignment = AssignmentRepo::create(
        &mut *tx,
        &NewAssignment {
            agent_id: agent_id.to_string(),
            complaint_id: complaint_id.to_string(),
            status: status.to_string(),
            agent_name: agent_name.to_string(),
        },
    )
    .await?;
    // An unknown complaint id leaves nothing to update; the assignment stands.
    let updated = ComplaintRepo::update_status(&mut *tx, complaint_id, status).await?;

    tx.commit().await?;

    tracing::info!(
        %complaint_id,
        %agent_id,
        %status,
        complaint_found = updated.is_some(),
        "Complaint assigned"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Complaint assigned successfully",
            "assignment": assignment,
        })),
    ))
}

async fn list_agent_assignments(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<AssignedComplaint>>> {
    Ok(Json(
        AssignmentRepo::list_by_agent(&state.db.pool, &agent_id).await?,
    ))
}
