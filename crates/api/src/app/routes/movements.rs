use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_auth::Capability;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new().route("/", get(list_movements))
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<dto::MovementListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::AdjustStock) {
        return resp;
    }

    let state = match query.into_state() {
        Ok(state) => state,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().list_movements(&state).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
