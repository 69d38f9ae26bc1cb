use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockroom_auth::Capability;
use stockroom_catalog::CategoryDraft;
use stockroom_core::CategoryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/all", get(all_categories))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn parse_category_id(id: &str) -> Result<CategoryId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
    })
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageCategories) {
        return resp;
    }

    match services
        .store()
        .list_categories(query.page.unwrap_or(1))
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Unpaginated category list, for filter dropdowns on the product view.
pub async fn all_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ViewProducts) {
        return resp;
    }

    match services.store().all_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageCategories) {
        return resp;
    }

    let draft = match CategoryDraft::validate(&body.name) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().create_category(draft).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageCategories) {
        return resp;
    }
    let id = match parse_category_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().category(id).await {
        Ok(Some(category)) => (StatusCode::OK, Json(category)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CategoryRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageCategories) {
        return resp;
    }
    let id = match parse_category_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let draft = match CategoryDraft::validate(&body.name) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_category(id, draft).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageCategories) {
        return resp;
    }
    let id = match parse_category_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_category(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
