//! # API REST
//!
//! REST API for the triage service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer-token authentication for evaluation endpoints
//! - OpenAPI documentation served as JSON
//! - REST-specific concerns (JSON serialization, CORS, error bodies)
//!
//! Uses `api-shared` for request/response types and sessions.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use api_shared::SessionStore;
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use triage_core::{AccountService, CoreConfig, EvaluationStore, Evaluator, SyntheticClassifier};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub use error::{ApiError, ApiResult};

/// Shared state for every handler.
///
/// Cloning is cheap: the classifier and configuration sit behind `Arc`s and the session map is
/// shared between clones.
#[derive(Clone, Debug)]
pub struct AppState {
    pub evaluator: Evaluator,
    pub store: EvaluationStore,
    pub accounts: AccountService,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires the services around an already fitted classifier.
    pub fn new(cfg: Arc<CoreConfig>, classifier: Arc<SyntheticClassifier>) -> Self {
        let store = EvaluationStore::new(cfg.clone());
        Self {
            evaluator: Evaluator::new(classifier, Arc::new(store.clone())),
            store,
            sessions: SessionStore::new(cfg.session_ttl_secs()),
            accounts: AccountService::new(cfg),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_symptoms,
        handlers::register,
        handlers::login,
        handlers::logout,
        handlers::evaluate,
        handlers::list_evaluations,
        handlers::read_evaluation,
        handlers::symptom_count,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::SymptomInfo,
        api_shared::ListSymptomsRes,
        api_shared::RegisterReq,
        api_shared::RegisterRes,
        api_shared::LoginReq,
        api_shared::LoginRes,
        api_shared::EvaluateReq,
        api_shared::EvaluateRes,
        api_shared::RankedConditionRes,
        api_shared::EvaluationRecordRes,
        api_shared::ListEvaluationsRes,
        api_shared::SymptomCountReq,
        api_shared::SymptomCountRes,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the REST router with CORS and state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/symptoms", get(handlers::list_symptoms))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route(
            "/evaluations",
            get(handlers::list_evaluations).post(handlers::evaluate),
        )
        .route("/evaluations/:id", get(handlers::read_evaluation))
        .route("/api/symcount", post(handlers::symptom_count))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf(), 1)
            .expect("CoreConfig::new should succeed");
        let state = AppState::new(Arc::new(cfg), Arc::new(SyntheticClassifier::pretrained()));
        (temp_dir, router(state))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let (status, _) = send(
            app,
            request(
                Method::POST,
                "/register",
                None,
                Some(json!({ "email": email, "password": "pw", "password2": "pw" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": email, "password": "pw" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn symptoms_lists_full_catalog() {
        let (_dir, app) = test_app();
        let (status, body) = send(&app, request(Method::GET, "/symptoms", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        let symptoms = body["symptoms"].as_array().unwrap();
        assert_eq!(symptoms.len(), 16);
        assert_eq!(symptoms[15]["key"], "saturacion_baja");
    }

    #[tokio::test]
    async fn evaluations_require_a_session() {
        let (_dir, app) = test_app();
        let (status, body) = send(
            &app,
            request(Method::POST, "/evaluations", None, Some(json!({ "symptoms": {} }))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH_REQUIRED");

        let (status, _) = send(
            &app,
            request(Method::GET, "/evaluations", Some("not-a-session"), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn evaluate_records_and_lists_own_evaluations() {
        let (_dir, app) = test_app();
        let token = register_and_login(&app, "ana@example.org").await;

        let (status, outcome) = send(
            &app,
            request(
                Method::POST,
                "/evaluations",
                Some(&token),
                Some(json!({
                    "name": "Ana",
                    "age": "34",
                    "symptoms": { "saturacion_baja": "on", "presion_alta": "on" }
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["triage_level"], "HIGH");
        assert_eq!(outcome["ranking"].as_array().unwrap().len(), 3);

        let (status, listed) =
            send(&app, request(Method::GET, "/evaluations", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        let evaluations = listed["evaluations"].as_array().unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0]["age"], 34);
        assert_eq!(evaluations[0]["triage_level"], "HIGH");
        assert_eq!(evaluations[0]["top_diagnosis"], outcome["ranking"][0]);

        let id = evaluations[0]["id"].as_str().unwrap();
        let (status, single) = send(
            &app,
            request(Method::GET, &format!("/evaluations/{id}"), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(single["name"], "Ana");
    }

    #[tokio::test]
    async fn evaluations_of_other_users_are_hidden() {
        let (_dir, app) = test_app();
        let ana = register_and_login(&app, "ana@example.org").await;
        let bob = register_and_login(&app, "bob@example.org").await;

        send(
            &app,
            request(
                Method::POST,
                "/evaluations",
                Some(&ana),
                Some(json!({ "symptoms": { "fiebre": "on" } })),
            ),
        )
        .await;
        let (_, listed) = send(&app, request(Method::GET, "/evaluations", Some(&ana), None)).await;
        let id = listed["evaluations"][0]["id"].as_str().unwrap().to_string();

        let (_, bobs) = send(&app, request(Method::GET, "/evaluations", Some(&bob), None)).await;
        assert!(bobs["evaluations"].as_array().unwrap().is_empty());

        let (status, _) = send(
            &app,
            request(Method::GET, &format!("/evaluations/{id}"), Some(&bob), None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_evaluation_id_is_bad_request() {
        let (_dir, app) = test_app();
        let token = register_and_login(&app, "ana@example.org").await;
        let (status, _) = send(
            &app,
            request(Method::GET, "/evaluations/NOT-AN-ID", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (_dir, app) = test_app();
        register_and_login(&app, "ana@example.org").await;
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/register",
                None,
                Some(json!({ "email": "ANA@example.org", "password": "x", "password2": "x" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (_dir, app) = test_app();
        register_and_login(&app, "ana@example.org").await;
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "ana@example.org", "password": "nope" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn logout_ends_the_session() {
        let (_dir, app) = test_app();
        let token = register_and_login(&app, "ana@example.org").await;

        let (status, _) = send(&app, request(Method::POST, "/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) =
            send(&app, request(Method::GET, "/evaluations", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn symcount_counts_truthy_values() {
        let (_dir, app) = test_app();
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/api/symcount",
                None,
                Some(json!({ "fiebre": "on", "tos": "", "fatiga": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn openapi_document_lists_paths() {
        let (_dir, app) = test_app();
        let (status, body) =
            send(&app, request(Method::GET, "/api-docs/openapi.json", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/evaluations"].is_object());
        assert!(body["paths"]["/evaluations/{id}"].is_object());
        assert!(body["components"]["securitySchemes"]["bearer"].is_object());
    }
}
