use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use crate::auth::{extractors::AuthUser, repo_types::User};

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: &'static str,
    pub user: User,
}

#[instrument(skip_all)]
pub async fn protected_route(AuthUser(user): AuthUser) -> Json<ProtectedResponse> {
    info!(user_id = %user.id, "protected route accessed");
    Json(ProtectedResponse {
        message: "You accessed protected route successfully",
        user,
    })
}
