use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use records::{
    models::{Appointment, Doctor, Track},
    payloads::{AuthResponse, HealthBody},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{Account, Identity, hash_password, issue_token, verify_account_password},
    database::Collection,
    error::AppError,
    plan,
    state::AppState,
    utils::{newest_first, normalize_email, require_all, validate_levels},
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

type Payload<T> = Result<Json<T>, JsonRejection>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    doctor_name: Option<String>,
    date: Option<String>,
    time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    pain_level: Option<Value>,
    energy_level: Option<Value>,
    notes: Option<String>,
}

#[derive(Deserialize)]
pub struct Registration {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    email: Option<String>,
    password: Option<String>,
}

pub async fn health_handler() -> Json<HealthBody> {
    Json(HealthBody {
        message: "Backend server is running!".to_string(),
    })
}

pub async fn doctors_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Doctor>> {
    Json(state.doctors.clone())
}

pub async fn create_appointment_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Payload<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let Json(payload) = payload?;
    let [doctor_name, date, time] = require_all([payload.doctor_name, payload.date, payload.time])?;

    let treatment_plan = plan::generate(&mut rand::thread_rng());
    let now = Utc::now();

    let appointment = Appointment {
        id: Uuid::new_v4(),
        user_id: identity.user_id,
        doctor_name,
        date,
        time,
        treatment_plan,
        created_at: now,
        updated_at: now,
    };

    state
        .store
        .push(Collection::Appointments, identity.user_id, &appointment)
        .await?;

    info!(
        "Booked appointment {} for {} ({})",
        appointment.id, identity.user_id, appointment.treatment_plan.diagnosis
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_appointments_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let mut appointments: Vec<Appointment> = state
        .store
        .list(Collection::Appointments, identity.user_id)
        .await?;
    newest_first(&mut appointments, |appointment| appointment.created_at);

    Ok(Json(appointments))
}

pub async fn create_track_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    payload: Payload<NewTrack>,
) -> Result<(StatusCode, Json<Track>), AppError> {
    let Json(payload) = payload?;
    let (pain_level, energy_level) =
        validate_levels(payload.pain_level.as_ref(), payload.energy_level.as_ref())?;

    let now = Utc::now();
    let track = Track {
        id: Uuid::new_v4(),
        user_id: identity.user_id,
        pain_level,
        energy_level,
        notes: payload.notes.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    state
        .store
        .push(Collection::Tracks, identity.user_id, &track)
        .await?;

    info!("Saved track entry {} for {}", track.id, identity.user_id);

    Ok((StatusCode::CREATED, Json(track)))
}

pub async fn list_tracks_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Track>>, AppError> {
    let mut tracks: Vec<Track> = state.store.list(Collection::Tracks, identity.user_id).await?;
    newest_first(&mut tracks, |track| track.created_at);

    Ok(Json(tracks))
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<Registration>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;
    let [name, email, password] = require_all([payload.name, payload.email, payload.password])?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let account = Account {
        id: Uuid::new_v4(),
        name,
        email: normalize_email(&email),
        password_hash: hash_password(&password)?,
        created_at: Utc::now(),
    };

    if !state.store.insert_account(&account).await? {
        return Err(AppError::validation("User already exists"));
    }

    info!("Registered user {}", account.id);

    Ok((StatusCode::CREATED, Json(session_for(&state, &account)?)))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(payload) = payload?;
    let [email, password] = require_all([payload.email, payload.password])?;

    let account = state.store.find_account(&normalize_email(&email)).await?;

    let verified = verify_account_password(
        &password,
        account.as_ref().map(|account| account.password_hash.as_str()),
    );

    let account = account
        .filter(|_| verified)
        .ok_or_else(|| AppError::validation("Invalid credentials"))?;

    info!("User {} logged in", account.id);

    Ok(Json(session_for(&state, &account)?))
}

fn session_for(state: &AppState, account: &Account) -> Result<AuthResponse, AppError> {
    let token = issue_token(
        &state.config.jwt_secret,
        account.id,
        &account.email,
        state.config.token_ttl_hours,
    )?;

    Ok(AuthResponse {
        token,
        user: account.profile(),
    })
}
