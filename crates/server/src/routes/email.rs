use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{require, Result},
    routes::ApiJson,
    services::mailer::OutgoingEmail,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/send-email", post(send_email))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Clients send phone numbers as strings or as numbers.
    pub phone: Option<Value>,
    pub message: Option<String>,
}

async fn send_email(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SendEmailRequest>,
) -> Result<Json<Value>> {
    const MISSING: &str = "All fields required";
    let phone = match body.phone {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let name = require(body.name.as_deref(), MISSING)?;
    let email = require(body.email.as_deref(), MISSING)?;
    let phone = require(phone.as_deref(), MISSING)?;
    let message = require(body.message.as_deref(), MISSING)?;

    state
        .mailer
        .send(OutgoingEmail::admin_message(name, email, phone, message))
        .await?;

    Ok(Json(json!({ "success": true })))
}
