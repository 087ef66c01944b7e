use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{auth::jwt::AuthUser, state::AppState};

// Consultation flows live in a separate service. The group is mounted and
// token-guarded here, nothing more.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch))
        .route("/:id/messages", post(send_message))
}

fn not_implemented() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "message": "Consultations are handled by another service" })),
    )
}

async fn list(_user: AuthUser) -> (StatusCode, Json<Value>) {
    not_implemented()
}

async fn create(_user: AuthUser) -> (StatusCode, Json<Value>) {
    not_implemented()
}

async fn fetch(_user: AuthUser) -> (StatusCode, Json<Value>) {
    not_implemented()
}

async fn send_message(_user: AuthUser) -> (StatusCode, Json<Value>) {
    not_implemented()
}
