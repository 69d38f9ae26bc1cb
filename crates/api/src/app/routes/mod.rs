use axum::{Router, routing::get};

pub mod categories;
pub mod dashboard;
pub mod movements;
pub mod products;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/dashboard", get(dashboard::stats))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/movements", movements::router())
        .nest("/users", users::router())
}
