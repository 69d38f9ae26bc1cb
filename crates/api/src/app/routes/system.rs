use axum::{Json, extract::Extension, response::IntoResponse};
use serde_json::json;

use stockroom_auth::grants;

use crate::context::AuthContext;

pub async fn health() -> axum::response::Response {
    Json(json!({ "status": "ok" })).into_response()
}

pub async fn whoami(Extension(auth): Extension<AuthContext>) -> axum::response::Response {
    let capabilities: Vec<&str> = grants(auth.role()).iter().map(|c| c.as_str()).collect();
    Json(json!({
        "user_id": auth.user_id().to_string(),
        "role": auth.role().as_str(),
        "capabilities": capabilities,
    }))
    .into_response()
}
