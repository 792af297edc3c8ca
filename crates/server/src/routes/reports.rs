use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use futures::StreamExt;
use tokio_util::io::ReaderStream;

use crate::{
    db::{models::MessageOrder, ComplaintRepo, MessageRepo},
    error::{AppError, Result},
    services::report::{ReportError, ReportLayout, TempReport},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/download-report/:complaint_id", get(download_report))
}

/// Renders the report to a temporary file and streams it back. The file is
/// removed once the response body is dropped, whether or not the client read
/// it to the end.
async fn download_report(
    State(state): State<AppState>,
    Path(complaint_id): Path<String>,
) -> Result<Response> {
    let complaint = ComplaintRepo::find_by_id(&state.db.pool, &complaint_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;
    let messages =
        MessageRepo::list_for_complaint(&state.db.pool, &complaint_id, MessageOrder::OldestFirst)
            .await?;

    let download_name = format!("Complaint_Report_{complaint_id}.pdf");
    let temp = TempReport::new(
        state
            .storage
            .temp_path(&format!("Complaint_Report_{complaint_id}"), "pdf"),
    );

    let attachment = match complaint.file.as_deref() {
        Some(file) if state.storage.exists(file).await => Some(state.storage.path(file)),
        _ => None,
    };

    let output = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        ReportLayout::build(&complaint, &messages, attachment.as_deref()).render_to_file(&output)
    })
    .await
    .map_err(|e| ReportError::Task(e.to_string()))??;

    let file = tokio::fs::File::open(temp.path())
        .await
        .map_err(ReportError::from)?;
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _guard = &temp;
        chunk
    });

    tracing::info!(%complaint_id, "Streaming complaint report");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{download_name}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
