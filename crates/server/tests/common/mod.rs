#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use complaintcare_server::{
    app,
    db::Database,
    services::{
        mailer::{EmailError, MailSender, OutgoingEmail},
        storage::FileStorage,
    },
    AppState,
};

pub const BOUNDARY: &str = "----complaintcare-test-boundary";

/// Captures outgoing mail instead of talking to SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Build("relay refused the message".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mailer(RecordingMailer::default()).await
    }

    /// Fresh database and upload directory inside a temp dir.
    pub async fn with_mailer(mailer: RecordingMailer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());

        let db = Database::connect(&url).await.unwrap();
        db.run_migrations().await.unwrap();

        let storage = FileStorage::new(dir.path().join("uploads"));
        storage.init().await.unwrap();

        let mailer = Arc::new(mailer);
        let state = AppState {
            db,
            storage,
            mailer: mailer.clone(),
        };

        Self {
            router: app(state.clone()),
            state,
            mailer,
            _dir: dir,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> Response<Body> {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send_json(Method::POST, uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send_json(Method::PUT, uri, body).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &[u8])>,
    ) -> Response<Body> {
        self.request(
            Request::post(uri)
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(fields, file)))
                .unwrap(),
        )
        .await
    }

    /// Registers a user and returns its id.
    pub async fn sign_up(&self, name: &str, user_type: &str, district: Option<&str>) -> String {
        let response = self
            .post_json(
                "/SignUp",
                json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "password": "secret",
                    "phone": 9876543210_i64,
                    "userType": user_type,
                    "district": district,
                }),
            )
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Files a complaint without attachment and returns its id.
    pub async fn file_complaint(&self, user_id: &str, district: &str) -> String {
        let response = self
            .post_multipart(
                &format!("/Complaint/{user_id}"),
                &complaint_fields(district),
                None,
            )
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["_id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn complaint_fields(district: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("name", "A"),
        ("address", "B"),
        ("city", "C"),
        ("district", district),
        ("state", "E"),
        ("pincode", "560001"),
        ("comment", "F"),
    ]
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
