use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stockroom_auth::Capability;
use stockroom_catalog::{ProductDraft, ProductUpdate};
use stockroom_core::{CategoryId, ProductId};
use stockroom_ledger::StockAdjustment;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/adjust", post(adjust_stock))
}

fn parse_product_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ViewProducts) {
        return resp;
    }

    let state = query.into_state();
    match services.store().list_products(&state).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageProducts) {
        return resp;
    }

    let draft = match ProductDraft::validate(
        &body.name,
        &body.sku,
        body.quantity,
        CategoryId::from_uuid(body.category_id),
    ) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().create_product(draft).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ViewProducts) {
        return resp;
    }
    let id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().product(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageProducts) {
        return resp;
    }
    let id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let update = match ProductUpdate::validate(
        &body.name,
        &body.sku,
        CategoryId::from_uuid(body.category_id),
    ) {
        Ok(update) => update,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update_product(id, update).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::ManageProducts) {
        return resp;
    }
    let id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.store().delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&auth, Capability::AdjustStock) {
        return resp;
    }
    let product_id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (kind, reason) = match body.parse() {
        Ok(parsed) => parsed,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let adjustment =
        match StockAdjustment::new(product_id, auth.user_id(), kind, body.quantity, reason) {
            Ok(adjustment) => adjustment,
            Err(e) => return errors::domain_error_to_response(e),
        };

    match services.store().adjust_stock(adjustment).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
