use axum::{
    Router,
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use http_body_util::BodyExt;
use records::models::{Appointment, Track};
use serde_json::{Value, json};
use server::{
    auth::issue_token,
    config::{Config, StoreBackend},
    database::Store,
    plan, router,
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret";

fn app() -> Router {
    let config = Config {
        port: 0,
        store_backend: StoreBackend::Memory,
        redis_url: String::new(),
        jwt_secret: SECRET.to_string(),
        allowed_origin: "http://localhost:3000".to_string(),
        token_ttl_hours: 1,
    };

    router(AppState::with_store(config, Store::memory()))
}

fn token_for(user_id: Uuid) -> String {
    issue_token(SECRET, user_id, "patient@example.com", 1).unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn list<T: serde::de::DeserializeOwned>(app: &Router, uri: &str, token: &str) -> Vec<T> {
    let (status, body) = send(app, Method::GET, uri, Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    serde_json::from_value(body).unwrap()
}

fn booking() -> Value {
    json!({ "doctorName": "Dr. Alice Nguyen", "date": "2024-01-01", "time": "09:00" })
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(&app(), Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Backend server is running!" }));
}

#[tokio::test]
async fn doctors_are_public_and_unfiltered() {
    let (status, body) = send(&app(), Method::GET, "/api/doctors", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(
        body[0],
        json!({ "id": "d1", "name": "Dr. Alice Nguyen", "specialty": "Neurology" })
    );
}

#[tokio::test]
async fn register_book_and_list() {
    let app = app();

    let (status, session) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Alice", "email": "Alice@Example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["user"]["email"], "alice@example.com");
    assert!(session["user"].get("passwordHash").is_none());

    let token = session["token"].as_str().unwrap().to_string();

    let (status, created) = send(&app, Method::POST, "/api/appointment", Some(&token), Some(booking())).await;
    assert_eq!(status, StatusCode::CREATED);

    let created: Appointment = serde_json::from_value(created).unwrap();
    assert!(plan::is_known(&created.treatment_plan));
    assert_eq!(created.doctor_name, "Dr. Alice Nguyen");
    assert_eq!(created.user_id.to_string(), session["user"]["id"].as_str().unwrap());

    let appointments: Vec<Appointment> = list(&app, "/api/appointments", &token).await;
    assert_eq!(appointments.first(), Some(&created));
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = app();
    let registration = json!({ "name": "Ben", "email": "ben@example.com", "password": "secret1" });

    let (status, _) = send(&app, Method::POST, "/api/auth/register", None, Some(registration.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/api/auth/register", None, Some(registration)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User already exists" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ben@example.com", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": " BEN@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ben");

    let token = body["token"].as_str().unwrap();
    let tracks: Vec<Track> = list(&app, "/api/track", token).await;
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Sara", "email": "sara@example.com", "password": "12345" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Password must be at least 6 characters" }));
}

#[tokio::test]
async fn incomplete_bookings_are_rejected_and_not_stored() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    for body in [
        json!({ "doctorName": "Dr. Ben Carter", "date": "2024-01-01" }),
        json!({ "doctorName": "", "date": "2024-01-01", "time": "09:00" }),
        json!({ "doctorName": "Dr. Ben Carter", "date": "   ", "time": "09:00" }),
        json!({ "doctorName": null, "date": "2024-01-01", "time": "09:00" }),
    ] {
        let (status, error) = send(&app, Method::POST, "/api/appointment", Some(&token), Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, json!({ "error": "All fields are required" }));
    }

    let appointments: Vec<Appointment> = list(&app, "/api/appointments", &token).await;
    assert!(appointments.is_empty());
}

#[tokio::test]
async fn out_of_range_levels_are_rejected_and_not_stored() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&token),
        Some(json!({ "painLevel": 11, "energyLevel": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Levels must be between 1 and 10" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&token),
        Some(json!({ "painLevel": 0, "energyLevel": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Pain level and energy level are required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&token),
        Some(json!({ "painLevel": false, "energyLevel": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Pain level and energy level are required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&token),
        Some(json!({ "energyLevel": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Pain level and energy level are required" }));

    let tracks: Vec<Track> = list(&app, "/api/track", &token).await;
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn booking_fields_are_stored_as_sent() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/appointment",
        Some(&token),
        Some(json!({ "doctorName": "  Dr. Alice Nguyen ", "date": "2024-01-01", "time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["doctorName"], "  Dr. Alice Nguyen ");

    let appointments: Vec<Appointment> = list(&app, "/api/appointments", &token).await;
    assert_eq!(appointments[0].doctor_name, "  Dr. Alice Nguyen ");
}

#[tokio::test]
async fn track_notes_default_to_empty() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&token),
        Some(json!({ "painLevel": "4", "energyLevel": 9 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["painLevel"], 4);
    assert_eq!(body["energyLevel"], 9);
    assert_eq!(body["notes"], "");
}

#[tokio::test]
async fn missing_token_is_unauthorized_and_bad_token_is_forbidden() {
    let app = app();
    let user_id = Uuid::new_v4();

    for uri in ["/api/appointments", "/api/track"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Access token required" }));
    }

    let (status, _) = send(&app, Method::POST, "/api/appointment", None, Some(booking())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/api/appointment", Some("garbage"), Some(booking())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Invalid token" }));

    let forged = issue_token("someone-else", user_id, "patient@example.com", 1).unwrap();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/track",
        Some(&forged),
        Some(json!({ "painLevel": 3, "energyLevel": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = token_for(user_id);
    let appointments: Vec<Appointment> = list(&app, "/api/appointments", &token).await;
    let tracks: Vec<Track> = list(&app, "/api/track", &token).await;
    assert!(appointments.is_empty());
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn users_only_see_their_own_records() {
    let app = app();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let (alice_token, bob_token) = (token_for(alice), token_for(bob));

    send(&app, Method::POST, "/api/appointment", Some(&alice_token), Some(booking())).await;
    send(
        &app,
        Method::POST,
        "/api/track",
        Some(&bob_token),
        Some(json!({ "painLevel": 2, "energyLevel": 7, "notes": "bob" })),
    )
    .await;

    let alice_appointments: Vec<Appointment> = list(&app, "/api/appointments", &alice_token).await;
    let alice_tracks: Vec<Track> = list(&app, "/api/track", &alice_token).await;
    let bob_appointments: Vec<Appointment> = list(&app, "/api/appointments", &bob_token).await;
    let bob_tracks: Vec<Track> = list(&app, "/api/track", &bob_token).await;

    assert_eq!(alice_appointments.len(), 1);
    assert!(alice_appointments.iter().all(|a| a.user_id == alice));
    assert!(alice_tracks.is_empty());
    assert!(bob_appointments.is_empty());
    assert_eq!(bob_tracks.len(), 1);
    assert_eq!(bob_tracks[0].user_id, bob);
}

#[tokio::test]
async fn lists_are_newest_first() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    for note in ["first", "second", "third"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/track",
            Some(&token),
            Some(json!({ "painLevel": 5, "energyLevel": 5, "notes": note })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let tracks: Vec<Track> = list(&app, "/api/track", &token).await;
    let notes: Vec<&str> = tracks.iter().map(|t| t.notes.as_str()).collect();

    assert_eq!(notes, vec!["third", "second", "first"]);
    assert!(tracks.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let token = token_for(Uuid::new_v4());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/track")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Malformed payload" }));
}
