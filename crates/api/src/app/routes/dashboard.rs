use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use stockroom_auth::Capability;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::AuthContext;

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ViewReports) {
        return resp;
    }

    match services.store().dashboard_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
