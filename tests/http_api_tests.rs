#![cfg(feature = "http_api")]

use availability_tool::{
    AvailabilityConfig, AvailabilityStore, JsonFileStore, TimeSlot, WeekSchedule, Weekday,
    WeeklyAvailabilityScheduler, http_api,
};
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

fn new_state() -> http_api::AppState {
    http_api::AppState::new(
        WeeklyAvailabilityScheduler::new(),
        AvailabilityConfig::default(),
    )
}

fn new_router() -> axum::Router {
    http_api::router(new_state())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn slot_lifecycle_via_http_api() {
    let app = new_router();

    // Create slot
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Monday/slots",
            json!({ "start": "09:00", "end": "10:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let slot: TimeSlot = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(slot.start.to_string(), "09:00");

    // Fetch the day
    let response = app.clone().oneshot(get("/schedule/Monday")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let day = read_json(response).await;
    assert_eq!(day["is_available"], true);
    assert_eq!(day["slots"][0]["end"], "10:00");

    // Delete the slot
    let uri = format!("/schedule/Monday/slots/{}", slot.id);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Ensure the slot is gone
    let response = app.oneshot(get("/schedule/Monday")).await.unwrap();
    let day = read_json(response).await;
    assert_eq!(day["slots"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn overlapping_slot_is_a_conflict() {
    let app = new_router();
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Tuesday/slots",
            json!({ "start": "09:00", "end": "11:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(send_json(
            "POST",
            "/schedule/Tuesday/slots",
            json!({ "start": "10:00", "end": "12:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json(response).await;
    assert_eq!(body["error"], "overlap");
}

#[tokio::test]
async fn missing_and_inverted_times_are_bad_requests() {
    let app = new_router();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Monday/slots",
            json!({ "start": "09:00", "end": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "missing_time");

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Monday/slots",
            json!({ "start": "10:00", "end": "09:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_range");

    let response = app
        .oneshot(send_json(
            "POST",
            "/schedule/Monday/slots",
            json!({ "start": "9am", "end": "10:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn unavailable_day_refuses_new_slots() {
    let app = new_router();
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Sunday/slots",
            json!({ "start": "09:00", "end": "10:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(read_json(response).await["error"], "day_unavailable");

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/schedule/Sunday/availability",
            json!({ "available": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(send_json(
            "POST",
            "/schedule/Sunday/slots",
            json!({ "start": "09:00", "end": "10:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn disabling_a_day_clears_it_in_the_summary() {
    let app = new_router();
    for (start, end) in [("09:00", "10:00"), ("10:00", "11:00")] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/schedule/Friday/slots",
                json!({ "start": start, "end": end }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.clone().oneshot(get("/summary")).await.unwrap();
    let summary = read_json(response).await;
    assert_eq!(summary[4]["day"], "Friday");
    assert_eq!(summary[4]["slot_count"], 2);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/schedule/Friday/availability",
            json!({ "available": false }),
        ))
        .await
        .unwrap();
    let day = read_json(response).await;
    assert_eq!(day["is_available"], false);
    assert_eq!(day["slots"].as_array().unwrap().len(), 0);

    let response = app.oneshot(get("/summary")).await.unwrap();
    let summary = read_json(response).await;
    assert_eq!(summary[4]["is_available"], false);
    assert_eq!(summary[4]["slot_count"], 0);
}

#[tokio::test]
async fn unknown_day_is_not_found() {
    let app = new_router();
    let response = app.clone().oneshot(get("/schedule/monday")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["error"], "not_found");

    let response = app.oneshot(get("/schedule/Funday")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn week_snapshot_lists_all_days() {
    let app = new_router();
    let response = app.oneshot(get("/schedule")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let week: WeekSchedule = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(week, WeekSchedule::default());
    assert!(!week.day(Weekday::Sunday).is_available());
}

#[tokio::test]
async fn time_options_follow_granularity() {
    let app = new_router();
    let response = app.clone().oneshot(get("/time-options")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let options = read_json(response).await;
    let options = options.as_array().unwrap();
    assert_eq!(options.len(), 48);
    assert_eq!(options[0]["value"], "00:00");
    assert_eq!(options[0]["label"], "12:00 AM");
    assert_eq!(options[27]["label"], "1:30 PM");

    let response = app
        .clone()
        .oneshot(get("/time-options?granularity=60"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 24);

    let response = app
        .oneshot(get("/time-options?granularity=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bookable_times_for_a_date() {
    let app = new_router();
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Monday/slots",
            json!({ "start": "09:00", "end": "10:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // 2025-01-06 is a Monday
    let response = app
        .clone()
        .oneshot(get("/bookable/2025-01-06"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["date"], "2025-01-06");
    assert_eq!(body["times"], json!([
        { "value": "09:00", "label": "9:00 AM" },
        { "value": "09:30", "label": "9:30 AM" }
    ]));

    let response = app
        .clone()
        .oneshot(get("/bookable/2025-01-07"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["times"], json!([]));

    let response = app.oneshot(get("/bookable/06-01-2025")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn save_requires_a_store() {
    let app = new_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/save")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn save_writes_to_configured_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("week.json")));
    let app = http_api::router(new_state().with_store(store.clone()));

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/schedule/Wednesday/slots",
            json!({ "start": "14:00", "end": "15:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/save")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let saved = store.load_schedule().unwrap().unwrap();
    assert_eq!(saved.day(Weekday::Wednesday).slot_count(), 1);
}

#[tokio::test]
async fn non_numeric_slot_id_is_a_json_bad_request() {
    let app = new_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/schedule/Monday/slots/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].as_str().unwrap().contains("abc"));
}
