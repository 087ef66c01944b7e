use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, NotificationTokenRequest, PublicUser, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        repo_types::{Role, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/notification-token", put(update_notification_token))
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{6,15}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

pub(crate) fn is_valid_pin(pin: &str) -> bool {
    lazy_static! {
        static ref PIN_RE: Regex = Regex::new(r"^[0-9]{4,8}$").unwrap();
    }
    PIN_RE.is_match(pin)
}

fn sign_for(state: &AppState, user: &User) -> Result<String, ApiError> {
    let keys = JwtKeys::from_ref(state);
    keys.sign(user.id, user.role).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.phone = payload.phone.trim().to_string();
    payload.name = payload.name.trim().to_string();

    if !is_valid_phone(&payload.phone) {
        warn!(phone = %payload.phone, "invalid phone");
        return Err(ApiError::Validation("Invalid phone number".into()));
    }
    if !is_valid_pin(&payload.pin) {
        warn!("invalid pin format");
        return Err(ApiError::Validation("PIN must be 4 to 8 digits".into()));
    }
    if payload.name.is_empty() {
        warn!("missing name");
        return Err(ApiError::Validation("Name is required".into()));
    }

    // Early exit on a taken phone; the unique index still rejects a
    // concurrent duplicate at write time.
    if User::find_by_phone(&state.db, &payload.phone).await?.is_some() {
        warn!(phone = %payload.phone, "phone already registered");
        return Err(ApiError::DuplicateIdentity);
    }

    let user = User::create(
        &state.db,
        &payload.phone,
        &payload.pin,
        &payload.name,
        Role::default(),
    )
    .await?;

    let token = sign_for(&state, &user)?;

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.phone = payload.phone.trim().to_string();

    // Unknown phone and wrong PIN produce the same error on purpose.
    let user = match User::find_by_phone(&state.db, &payload.phone).await? {
        Some(u) => u,
        None => {
            warn!(phone = %payload.phone, "login unknown phone");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !user.verify_pin(&payload.pin) {
        warn!(user_id = %user.id, "login invalid pin");
        return Err(ApiError::InvalidCredentials);
    }

    let token = sign_for(&state, &user)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_notification_token(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<NotificationTokenRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if payload.notification_token.trim().is_empty() {
        return Err(ApiError::Validation("Notification token is required".into()));
    }

    let mut user = User::find_by_id(&state.db, caller.id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    user.notification_token = Some(payload.notification_token);
    let saved = user.save(&state.db).await?;

    info!(user_id = %saved.id, "notification token updated");
    Ok(Json(PublicUser::from(saved)))
}
