use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cancha_api::{app, AppState};
use cancha_store::seed;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app(date: NaiveDate) -> Router {
    app(AppState::in_memory(seed::demo_facilities(), seed::demo_slots(date)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking_body(date: NaiveDate, slot_hour: &str) -> Value {
    json!({
        "facility_id": "palermo-5",
        "slot_id": format!("palermo-5-{}-{}00", date.format("%Y%m%d"), slot_hour),
        "date": date.format("%Y-%m-%d").to_string(),
        "time": format!("{}:00", slot_hour),
        "players": 10,
        "contact_name": "Lionel",
        "contact_phone": "+54 11 5555-1234",
        "contact_email": "lio@example.com",
        "terms_accepted": true
    })
}

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = test_app(seed::demo_date());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_facility_search_filters() {
    let app = test_app(seed::demo_date());

    let (status, body) = send(&app, get("/v1/facilities")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 5);

    let (_, body) = send(&app, get("/v1/facilities?price_range=low")).await;
    assert_eq!(ids(&body), vec!["palermo-5"]);

    let (_, body) = send(&app, get("/v1/facilities?price_range=medium")).await;
    assert_eq!(ids(&body), vec!["cordoba-7", "belgrano-5", "mendoza-7"]);

    let (_, body) = send(&app, get("/v1/facilities?location=buenos%20aires&amenities=parking,lights")).await;
    assert_eq!(ids(&body), vec!["palermo-5"]);

    let (_, body) = send(&app, get("/v1/facilities?field_type=F%C3%BAtbol%207")).await;
    assert_eq!(ids(&body), vec!["cordoba-7", "mendoza-7"]);

    let (status, body) = send(&app, get("/v1/facilities?amenities=sauna")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_facility_lookup() {
    let app = test_app(seed::demo_date());

    let (status, body) = send(&app, get("/v1/facilities/rosario-11")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Fútbol 11");

    let (status, _) = send(&app, get("/v1/facilities/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_slots_listed_in_time_order() {
    let app = test_app(seed::demo_date());
    let (status, body) = send(&app, get("/v1/facilities/palermo-5/slots?date=2024-01-10")).await;
    assert_eq!(status, StatusCode::OK);

    let slots = body.as_array().unwrap();
    let times: Vec<&str> = slots.iter().map(|s| s["time"].as_str().unwrap()).collect();
    assert_eq!(times, vec!["18:00", "19:00", "20:00", "21:00", "22:00", "23:00"]);
    assert_eq!(slots[0]["available"], false);

    let (status, body) = send(&app, get("/v1/facilities/palermo-5/slots?date=2024-01-11")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/v1/facilities/palermo-5/slots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_then_conflict() {
    let date = seed::demo_date();
    let app = test_app(date);

    let (status, booking) = send(&app, post("/v1/bookings", booking_body(date, "19"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "CONFIRMED");
    assert_eq!(booking["price"], 8000);

    let (status, body) = send(&app, post("/v1/bookings", booking_body(date, "19"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("unavailable"));

    let (_, slots) = send(&app, get("/v1/facilities/palermo-5/slots?date=2024-01-10")).await;
    assert_eq!(slots[1]["time"], "19:00");
    assert_eq!(slots[1]["available"], false);

    let booking_id = booking["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/v1/bookings/{}", booking_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["slot_id"], booking["slot_id"]);

    let (_, owner_view) = send(&app, get("/v1/facilities/palermo-5/bookings")).await;
    assert_eq!(owner_view.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_taken_slot_is_rejected() {
    let date = seed::demo_date();
    let app = test_app(date);
    let (status, _) = send(&app, post("/v1/bookings", booking_body(date, "18"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_booking_reports_every_field() {
    let date = seed::demo_date();
    let app = test_app(date);

    let mut body = booking_body(date, "19");
    body["contact_name"] = json!("");
    body["terms_accepted"] = json!(false);
    body["contact_email"] = json!("nope");

    let (status, response) = send(&app, post("/v1/bookings", body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = response["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["contact_name", "contact_email", "terms_accepted"]);
}

#[tokio::test]
async fn test_cancellation_refunds_in_advance() {
    let date = (Utc::now() + Duration::days(3)).date_naive();
    let app = test_app(date);

    let (status, booking) = send(&app, post("/v1/bookings", booking_body(date, "21"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booking["id"].as_str().unwrap();

    let (status, cancelled) = send(&app, post(&format!("/v1/bookings/{}/cancel", booking_id), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["refund"]["tier"], "FULL");
    assert_eq!(cancelled["refund"]["amount"], 8000);

    let (status, _) = send(&app, post(&format!("/v1/bookings/{}/cancel", booking_id), json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_past_reservation_cannot_be_cancelled() {
    let date = seed::demo_date();
    let app = test_app(date);

    let (_, booking) = send(&app, post("/v1/bookings", booking_body(date, "22"))).await;
    let booking_id = booking["id"].as_str().unwrap();

    let (status, body) = send(&app, post(&format!("/v1/bookings/{}/cancel", booking_id), json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("refused"));
}

#[tokio::test]
async fn test_unknown_booking() {
    let app = test_app(seed::demo_date());
    let uri = format!("/v1/bookings/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
