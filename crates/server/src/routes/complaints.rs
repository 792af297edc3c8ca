use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    db::{
        models::{Complaint, NewComplaint, DEFAULT_STATUS},
        AssignmentRepo, ComplaintRepo, UserRepo,
    },
    error::{require, AppError, Result},
    routes::ApiJson,
    services::storage::MAX_UPLOAD_BYTES,
    AppState,
};

/// Room for the text fields next to a maximum-size attachment.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/Complaint/:id",
            post(submit_complaint).layer(DefaultBodyLimit::max(
                MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES,
            )),
        )
        .route("/status", get(list_complaints))
        .route("/status/:id", get(list_user_complaints))
        .route("/status/district/:district", get(list_district_complaints))
        .route("/complaint/:complaint_id", put(update_status))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

struct Upload {
    file_name: String,
    data: Bytes,
}

async fn submit_complaint(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Complaint>)> {
    if UserRepo::find_by_id(&state.db.pool, &user_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let mut fields: HashMap<String, String> = HashMap::new();
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            if data.len() > MAX_UPLOAD_BYTES {
                tracing::warn!(%user_id, bytes = data.len(), "Rejected oversized upload");
                return Err(AppError::PayloadTooLarge(
                    "File exceeds the 50 MiB upload limit".to_string(),
                ));
            }
            // Browsers send an empty part when no file was picked.
            if !file_name.is_empty() {
                upload = Some(Upload { file_name, data });
            }
        } else {
            let value = field.text().await?;
            fields.insert(name, value);
        }
    }

    let field = |key: &str| fields.get(key).map(String::as_str);
    const MISSING: &str = "All fields are required";
    let name = require(field("name"), MISSING)?;
    let address = require(field("address"), MISSING)?;
    let city = require(field("city"), MISSING)?;
    let district = require(field("district"), MISSING)?;
    let region = require(field("state"), MISSING)?;
    let pincode = require(field("pincode"), MISSING)?;
    let comment = require(field("comment"), MISSING)?;

    let pincode: i64 = pincode
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Pincode must be a number".to_string()))?;

    let status = field("status")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_STATUS);

    let file = match &upload {
        Some(upload) => Some(state.storage.store(&upload.file_name, &upload.data).await?),
        None => None,
    };

    let complaint = ComplaintRepo::create(
        &state.db.pool,
        &NewComplaint {
            user_id,
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            state: region.to_string(),
            pincode,
            comment: comment.to_string(),
            status: status.to_string(),
            file,
        },
    )
    .await?;

    tracing::info!(
        complaint_id = %complaint.id,
        user_id = %complaint.user_id,
        has_file = complaint.file.is_some(),
        "Complaint submitted"
    );
    Ok((StatusCode::CREATED, Json(complaint)))
}

async fn list_complaints(State(state): State<AppState>) -> Result<Json<Vec<Complaint>>> {
    Ok(Json(ComplaintRepo::list_all(&state.db.pool).await?))
}

async fn list_user_complaints(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Complaint>>> {
    Ok(Json(
        ComplaintRepo::list_by_user(&state.db.pool, &user_id).await?,
    ))
}

async fn list_district_complaints(
    State(state): State<AppState>,
    Path(district): Path<String>,
) -> Result<Json<Vec<Complaint>>> {
    Ok(Json(
        ComplaintRepo::list_by_district(&state.db.pool, &district).await?,
    ))
}

/// Writes the status to the complaint and to its assignment, if any, in one
/// transaction.
async fn update_status(
    State(state): State<AppState>,
    Path(complaint_id): Path<String>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Complaint>> {
    let status = require(body.status.as_deref(), "Status is required")?;

    let mut tx = state.db.pool.begin().await?;

    let complaint = ComplaintRepo::update_status(&mut *tx, &complaint_id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;
    let assigned =
        AssignmentRepo::update_status_for_complaint(&mut *tx, &complaint_id, status).await?;

    tx.commit().await?;

    tracing::info!(%complaint_id, %status, assigned, "Complaint status updated");
    Ok(Json(complaint))
}
