use axum::{
    body::Bytes,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::catalog::{detect, Detection, Disease, DISEASES};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    pub crop: Option<String>,
}

pub fn disease_routes() -> Router<AppState> {
    Router::new()
        .route("/diseases", get(list_diseases))
        .route("/diseases/detect", post(detect_disease))
}

pub async fn list_diseases() -> Json<&'static [Disease]> {
    Json(DISEASES)
}

/// POST /diseases/detect, optional body `{crop}`.
#[instrument(skip_all)]
pub async fn detect_disease(body: Bytes) -> Result<Json<Detection>, ApiError> {
    let req: DetectRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DetectRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::validation(e.to_string()))?
    };
    let detection = detect(&mut rand::thread_rng(), req.crop.as_deref());
    info!(disease = detection.disease, confidence = detection.confidence, "mock detection");
    Ok(Json(detection))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::{app::build_app, state::AppState};

    #[tokio::test]
    async fn catalog_and_detection_endpoints() {
        let server = TestServer::new(build_app(AppState::fake())).unwrap();

        let list: Vec<Value> = server.get("/api/diseases").await.json();
        assert_eq!(list.len(), 6);
        assert_eq!(list[0]["name"], "Powdery Mildew");

        let res = server
            .post("/api/diseases/detect")
            .json(&json!({"crop": "Okra"}))
            .await;
        res.assert_status_ok();
        let body: Value = res.json();
        assert_eq!(body["disease"], "Yellow Mosaic Virus");
        assert!(body["confidence"].as_f64().unwrap() >= 89.0);

        server.post("/api/diseases/detect").await.assert_status_ok();
        server
            .post("/api/diseases/detect")
            .content_type("application/json")
            .bytes("{oops".into())
            .await
            .assert_status_bad_request();
    }
}
