use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{Envelope, LoginData, LoginRequest, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        repo_types::User,
        services::{login_user, register_user},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let Json(payload) = payload?;
    let user = register_user(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<LoginData>>, ApiError> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let data = login_user(&keys, state.users.as_ref(), payload).await?;
    Ok(Json(Envelope::ok(data)))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<Envelope<User>> {
    Json(Envelope::ok(user))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::{app::build_app, state::AppState, testing::bearer};

    fn server() -> TestServer {
        TestServer::new(build_app(AppState::fake())).unwrap()
    }

    #[tokio::test]
    async fn register_returns_201_without_password() {
        let server = server();
        let res = server
            .post("/api/auth/register")
            .json(&json!({"name": "Ravi", "email": "ravi@example.com", "password": "secret1"}))
            .await;
        res.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = res.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "ravi@example.com");
        assert_eq!(body["data"]["role"], "farmer");
        assert!(body["data"].get("passwordHash").is_none());
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_register_is_400() {
        let server = server();
        let body = json!({"name": "Ravi", "email": "ravi@example.com", "password": "secret1"});
        server.post("/api/auth/register").json(&body).await.assert_status(axum::http::StatusCode::CREATED);
        let res = server.post("/api/auth/register").json(&body).await;
        res.assert_status_bad_request();
        let err: Value = res.json();
        assert_eq!(err["message"], "User already exists");
    }

    #[tokio::test]
    async fn login_issues_token_usable_on_me() {
        let server = server();
        server
            .post("/api/auth/register")
            .json(&json!({"name": "Meena", "email": "meena@example.com", "password": "secret1"}))
            .await;

        let res = server
            .post("/api/auth/login")
            .json(&json!({"email": "meena@example.com", "password": "secret1"}))
            .await;
        res.assert_status_ok();
        let body: Value = res.json();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["name"], "Meena");

        let (name, value) = bearer(&token);
        let me = server.get("/api/auth/me").add_header(name, value).await;
        me.assert_status_ok();
        let me: Value = me.json();
        assert_eq!(me["data"]["email"], "meena@example.com");
    }

    #[tokio::test]
    async fn login_unknown_email_is_401_without_token() {
        let res = server()
            .post("/api/auth/login")
            .json(&json!({"email": "ghost@example.com", "password": "secret1"}))
            .await;
        res.assert_status_unauthorized();
        let body: Value = res.json();
        assert!(body.get("token").is_none());
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let res = server()
            .post("/api/auth/login")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        res.assert_status_bad_request();
    }
}
