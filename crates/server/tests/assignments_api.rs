mod common;

use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn assigning_updates_complaint_status() {
    let app = TestApp::new().await;
    let user = app.sign_up("Asha", "Ordinary", Some("Pune")).await;
    let agent = app.sign_up("Vikram", "Agent", None).await;
    let complaint = app.file_complaint(&user, "Pune").await;

    let response = app
        .post_json(
            "/assignedComplaints",
            json!({
                "agentId": agent,
                "complaintId": complaint,
                "status": "In Progress",
                "agentName": "Vikram",
            }),
        )
        .await;

    assert_eq!(response.status(), 201);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Complaint assigned successfully");
    assert_eq!(body["assignment"]["complaintId"], complaint);
    assert_eq!(body["assignment"]["agentId"], agent);
    assert_eq!(body["assignment"]["status"], "In Progress");

    let complaints = body_json(app.get(&format!("/status/{user}")).await).await;
    assert_eq!(complaints[0]["status"], "In Progress");
}

#[tokio::test]
async fn assigning_with_missing_fields_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/assignedComplaints",
            json!({ "agentId": "a", "complaintId": "c", "status": "In Progress" }),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await["error"], "Missing fields");
}

#[tokio::test]
async fn assignment_to_unknown_complaint_is_still_recorded() {
    let app = TestApp::new().await;
    let agent = app.sign_up("Vikram", "Agent", None).await;

    let response = app
        .post_json(
            "/assignedComplaints",
            json!({
                "agentId": agent,
                "complaintId": "missing",
                "status": "In Progress",
                "agentName": "Vikram",
            }),
        )
        .await;

    assert_eq!(response.status(), 201);
    let work = body_json(app.get(&format!("/assignedComplaints/agent/{agent}")).await).await;
    assert_eq!(work.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn agent_listing_uses_current_agent_name() {
    let app = TestApp::new().await;
    let user = app.sign_up("Asha", "Ordinary", Some("Pune")).await;
    let agent = app.sign_up("Vikram", "Agent", None).await;
    let complaint = app.file_complaint(&user, "Pune").await;

    app.post_json(
        "/assignedComplaints",
        json!({
            "agentId": agent,
            "complaintId": complaint,
            "status": "In Progress",
            "agentName": "Vikram",
        }),
    )
    .await;
    app.put_json(&format!("/user/{agent}"), json!({ "name": "Vikram S" }))
        .await;

    let work = body_json(app.get(&format!("/assignedComplaints/agent/{agent}")).await).await;
    assert_eq!(work[0]["agentName"], "Vikram S");

    let other = body_json(app.get("/assignedComplaints/agent/nobody").await).await;
    assert!(other.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn messages_are_listed_newest_first() {
    let app = TestApp::new().await;

    for text in ["first", "second", "third"] {
        let response = app
            .post_json(
                "/messages",
                json!({ "name": "Vikram", "message": text, "complaintId": "c1" }),
            )
            .await;
        assert_eq!(response.status(), 201);
    }
    app.post_json(
        "/messages",
        json!({ "name": "Asha", "message": "elsewhere", "complaintId": "c2" }),
    )
    .await;

    let thread = body_json(app.get("/messages/c1").await).await;
    let texts: Vec<&str> = thread
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["third", "second", "first"]);

    let empty = body_json(app.get("/messages/unknown").await).await;
    assert!(empty.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn message_requires_text() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/messages", json!({ "name": "Vikram", "complaintId": "c1" }))
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(body_json(response).await["error"], "Message is required");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            axum::http::Request::post("/messages")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert!(body_json(response).await["error"].is_string());
}
