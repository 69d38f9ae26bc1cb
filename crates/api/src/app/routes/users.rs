use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_auth::{Capability, UserDraft};
use stockroom_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn parse_user_id(id: &str) -> Result<UserId, axum::response::Response> {
    id.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"))
}

fn parse_draft(body: &dto::UserRequest) -> Result<UserDraft, axum::response::Response> {
    let role = body.parse_role().map_err(errors::domain_error_to_response)?;
    UserDraft::validate(&body.name, &body.email, role).map_err(errors::domain_error_to_response)
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageUsers) {
        return resp;
    }

    match services.store().list_users().await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<dto::UserRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageUsers) {
        return resp;
    }
    let draft = match parse_draft(&body) {
        Ok(draft) => draft,
        Err(resp) => return resp,
    };

    match services.store().create_user(draft).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageUsers) {
        return resp;
    }
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().user(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UserRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageUsers) {
        return resp;
    }
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let draft = match parse_draft(&body) {
        Ok(draft) => draft,
        Err(resp) => return resp,
    };

    match services.store().update_user(id, draft).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageUsers) {
        return resp;
    }
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_user(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
