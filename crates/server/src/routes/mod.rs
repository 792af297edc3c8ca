pub mod assignments;
pub mod auth;
pub mod complaints;
pub mod email;
pub mod messages;
pub mod reports;
pub mod users;

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections render as the usual JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
