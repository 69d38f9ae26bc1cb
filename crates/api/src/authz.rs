//! API-side capability guard.
//!
//! Enforced at the handler boundary, before any store call: a denied check
//! means the operation never runs at all.

use axum::http::StatusCode;
use axum::response::Response;

use stockroom_auth::{Capability, authorize};

use crate::app::errors;
use crate::context::AuthContext;

/// Check a capability in the current request context.
pub fn require(auth: &AuthContext, capability: Capability) -> Result<(), Response> {
    authorize(auth.role(), capability)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
