mod common;

use common::{body_json, RecordingMailer, TestApp};
use complaintcare_server::services::mailer::ADMIN_SUBJECT;
use serde_json::json;

#[tokio::test]
async fn sends_admin_message() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/send-email",
            json!({
                "name": "Asha",
                "email": "asha@example.com",
                "phone": 9876543210_i64,
                "message": "Road is fixed, thanks",
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(body_json(response).await["success"], true);

    let sent = app.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.com");
    assert_eq!(sent[0].subject, ADMIN_SUBJECT);
    assert!(sent[0].html.contains("Asha"));
    assert!(sent[0].html.contains("9876543210"));
    assert!(sent[0].html.contains("Road is fixed, thanks"));
}

#[tokio::test]
async fn missing_field_sends_nothing() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/send-email",
            json!({ "name": "Asha", "email": "asha@example.com", "message": "hi" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await["error"], "All fields required");
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delivery_failure_is_reported() {
    let app = TestApp::with_mailer(RecordingMailer {
        fail: true,
        ..Default::default()
    })
    .await;

    let response = app
        .post_json(
            "/api/send-email",
            json!({
                "name": "Asha",
                "email": "asha@example.com",
                "phone": "9876543210",
                "message": "hello",
            }),
        )
        .await;

    assert_eq!(response.status(), 500);
    assert_eq!(body_json(response).await["error"], "Failed to send email");
}
