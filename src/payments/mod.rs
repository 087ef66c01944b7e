use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{auth::jwt::AuthUser, state::AppState};

// Payment processing is an external collaborator; only the mount point and
// the token guard belong to this service.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch))
}

fn not_implemented() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "message": "Payments are handled by another service" })),
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
