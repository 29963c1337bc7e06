pub mod protected;

use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/protected", get(protected::protected_route))
}

/// Liveness probe served at `/`.
pub async fn root() -> &'static str {
    "KrishiMitra backend running"
}
