use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use planner::{
    config::AppConfig,
    mocks::RecordingDispatcher,
    routes::create_router,
    services::{clock::FixedClock, store::MemoryTripStore},
    state::AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    dispatcher: Arc<RecordingDispatcher>,
}

fn app() -> TestApp {
    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        api_base_url: "http://api.test".into(),
        web_base_url: "http://web.test".into(),
        mail_from_name: "Trip Planner".into(),
        mail_from_address: "oi@planner.com".into(),
    };
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let state = AppState::new(
        config,
        Arc::new(MemoryTripStore::new()),
        dispatcher.clone(),
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        )),
    );
    TestApp {
        router: create_router(state),
        dispatcher,
    }
}

fn trip_body() -> Value {
    json!({
        "destination": "Salvador",
        "starts_at": "2030-02-01T10:00:00Z",
        "ends_at": "2030-02-08T10:00:00Z",
        "owner_name": "Ana",
        "owner_email": "ana@example.com",
        "emails_to_invite": ["bo@example.com"]
    })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, location, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn trip_lifecycle_over_http() {
    let app = app();

    let (status, _, body) = send(&app.router, post_json("/trips", &trip_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let trip_id = body["tripId"].as_str().unwrap().to_string();

    let (status, location, _) = send(&app.router, get(&format!("/trips/{trip_id}/confirm"))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location.as_deref(),
        Some(format!("http://web.test/trips/{trip_id}").as_str())
    );
    assert_eq!(
        app.dispatcher.recipients(),
        vec!["ana@example.com", "bo@example.com"]
    );

    let (status, _, body) = send(
        &app.router,
        post_json(
            &format!("/trips/{trip_id}/invites"),
            &json!({ "email": "cy@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let participant_id = body["participantId"].as_str().unwrap().to_string();

    let (status, location, _) = send(
        &app.router,
        get(&format!("/participants/{participant_id}/confirm")),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location.as_deref(),
        Some(format!("http://web.test/trips/{trip_id}").as_str())
    );

    let (status, _, body) = send(&app.router, get(&format!("/trips/{trip_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_confirmed"], json!(true));
    let participants = body["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 3);
    assert_eq!(participants[0]["is_owner"], json!(true));
    let cy = participants
        .iter()
        .find(|p| p["email"] == json!("cy@example.com"))
        .unwrap();
    assert_eq!(cy["is_confirmed"], json!(true));
}

#[tokio::test]
async fn schema_violations_are_reported_per_field() {
    let app = app();
    let mut body = trip_body();
    body["destination"] = json!("Rio");
    body["emails_to_invite"] = json!(["bo@example.com", "not-an-email"]);

    let (status, _, body) = send(&app.router, post_json("/trips", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid input"));
    assert!(body["errors"]["destination"].is_array());
    assert!(body["errors"]["emails_to_invite.1"].is_array());
    assert!(app.dispatcher.attempts().is_empty());
}

#[tokio::test]
async fn date_errors_are_client_errors() {
    let app = app();
    let mut body = trip_body();
    body["ends_at"] = json!("2030-01-15T10:00:00Z");

    let (status, _, body) = send(&app.router, post_json("/trips", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid date: end before start"));
}

#[tokio::test]
async fn unknown_trip_is_a_client_error() {
    let app = app();
    let missing = Uuid::new_v4();

    let (status, _, body) = send(
        &app.router,
        post_json(
            &format!("/trips/{missing}/invites"),
            &json!({ "email": "cy@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("trip not found"));

    let (status, _, _) = send(&app.router, get(&format!("/trips/{missing}/confirm"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_ids_are_validation_errors() {
    let app = app();

    let (status, _, body) = send(&app.router, get("/trips/not-a-uuid/confirm")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["tripId"], json!(["invalid uuid"]));
}

#[tokio::test]
async fn undecodable_bodies_use_the_validation_shape() {
    let app = app();

    let mut bad_date = trip_body();
    bad_date["starts_at"] = json!("tomorrow");
    let (status, _, body) = send(&app.router, post_json("/trips", &bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid input"));
    assert!(body["errors"]["starts_at"].is_array());

    let mut no_owner = trip_body();
    no_owner.as_object_mut().unwrap().remove("owner_name");
    let (status, _, body) = send(&app.router, post_json("/trips", &no_owner)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("invalid input"));
    assert!(body["errors"]["owner_name"].is_array());

    let request = Request::post("/trips")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"].is_array());

    assert!(app.dispatcher.attempts().is_empty());
}

#[tokio::test]
async fn invite_list_is_required() {
    let app = app();
    let mut body = trip_body();
    body.as_object_mut().unwrap().remove("emails_to_invite");

    let (status, _, body) = send(&app.router, post_json("/trips", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["emails_to_invite"].is_array());

    let mut empty = trip_body();
    empty["emails_to_invite"] = json!([]);
    let (status, _, _) = send(&app.router, post_json("/trips", &empty)).await;
    assert_eq!(status, StatusCode::CREATED);
}
