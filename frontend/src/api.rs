use std::fmt;

use records::{
    models::{Appointment, Doctor, Track},
    payloads::{
        AppointmentRequest, AuthResponse, ErrorBody, LoginRequest, RegisterRequest, TrackRequest,
    },
};
use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::session::Session;

pub const API_BASE_URL: &str = match option_env!("CARELOG_API_URL") {
    Some(url) => url,
    None => "http://localhost:5001",
};

/// Message ready to show the user, taken verbatim from the server when it sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(pub String);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Option<&Session>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: session.map(|session| session.token.clone()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/api/auth/register", request, "Registration failed").await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/api/auth/login", request, "Login failed").await
    }

    pub async fn doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get("/api/doctors", "Failed to load doctors").await
    }

    pub async fn appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get("/api/appointments", "Failed to load appointments").await
    }

    pub async fn create_appointment(&self, request: &AppointmentRequest) -> Result<Appointment, ApiError> {
        self.post("/api/appointment", request, "Failed to book appointment").await
    }

    pub async fn tracks(&self) -> Result<Vec<Track>, ApiError> {
        self.get("/api/track", "Failed to load entries").await
    }

    pub async fn create_track(&self, request: &TrackRequest) -> Result<Track, ApiError> {
        self.post("/api/track", request, "Failed to save entry").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        self.send("GET", path, None, fallback).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|_| ApiError(fallback.to_string()))?;

        self.send("POST", path, Some(body), fallback).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let (status, text) = self
            .fetch(method, path, body)
            .await
            .map_err(|_| ApiError(fallback.to_string()))?;

        decode(status, &text, fallback)
    }

    async fn fetch(&self, method: &str, path: &str, body: Option<String>) -> Result<(u16, String), JsValue> {
        let init = RequestInit::new();
        init.set_method(method);
        init.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            init.set_body(&JsValue::from_str(&body));
        }

        let request = Request::new_with_str_and_init(&self.url(path), &init)?;
        request.headers().set("Content-Type", "application/json")?;
        if let Some(authorization) = self.authorization() {
            request.headers().set("Authorization", &authorization)?;
        }

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        let text = JsFuture::from(response.text()?).await?;

        Ok((response.status(), text.as_string().unwrap_or_default()))
    }
}

pub fn decode<T: DeserializeOwned>(status: u16, body: &str, fallback: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|_| ApiError(fallback.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| fallback.to_string());

    Err(ApiError(message))
}
