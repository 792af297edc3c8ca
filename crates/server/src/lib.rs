use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;

use services::{mailer::MailSender, storage::FileStorage};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Database,
    pub storage: FileStorage,
    pub mailer: Arc<dyn MailSender>,
}

/// Every route of the service, with tracing and permissive CORS.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.storage.base_path());

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::complaints::router())
        .merge(routes::assignments::router())
        .merge(routes::messages::router())
        .merge(routes::email::router())
        .merge(routes::reports::router())
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
