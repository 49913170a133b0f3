//! HTTP handlers.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use api_shared::{
    bearer_token, EvaluateReq, EvaluateRes, EvaluationRecordRes, HealthRes, HealthService,
    ListEvaluationsRes, ListSymptomsRes, LoginReq, LoginRes, RegisterReq, RegisterRes,
    SymptomCountReq, SymptomCountRes,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path as AxumPath, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::Json,
};
use triage_core::{RecordId, UserId};

/// The user behind a valid `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> ApiResult<Self> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;
        let user_id = state.sessions.resolve(token).ok_or(ApiError::Unauthorized)?;
        Ok(Self {
            user_id,
            token: token.to_string(),
        })
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/symptoms",
    responses(
        (status = 200, description = "Symptom catalog in vector order", body = ListSymptomsRes)
    )
)]
#[axum::debug_handler]
pub async fn list_symptoms(State(_state): State<AppState>) -> Json<ListSymptomsRes> {
    Json(ListSymptomsRes::catalog())
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created", body = RegisterRes),
        (status = 400, description = "Missing fields, mismatched passwords or invalid email"),
        (status = 409, description = "Email already registered")
    )
)]
/// Registers an account.
///
/// Password hashing is deliberately slow, so it runs on the blocking pool.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterReq>,
) -> ApiResult<(StatusCode, Json<RegisterRes>)> {
    let accounts = state.accounts.clone();
    let account = tokio::task::spawn_blocking(move || {
        accounts.register(&req.email, &req.password, &req.password2)
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(RegisterRes {
            user_id: account.id.to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session opened", body = LoginRes),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> ApiResult<Json<LoginRes>> {
    let accounts = state.accounts.clone();
    let account =
        tokio::task::spawn_blocking(move || accounts.login(&req.email, &req.password)).await??;

    let token = state.sessions.create(account.id);
    tracing::info!(user_id = %account.id, "session opened");
    Ok(Json(LoginRes {
        token,
        user_id: account.id.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> StatusCode {
    state.sessions.revoke(&user.token);
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/evaluations",
    request_body = EvaluateReq,
    responses(
        (status = 200, description = "Ranking and triage for the submitted symptoms", body = EvaluateRes),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
/// Scores a symptom submission.
///
/// The record is stored for the caller; a storage failure is logged and the result is still
/// returned. Scoring and the file write run on the blocking pool.
#[axum::debug_handler]
pub async fn evaluate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<EvaluateReq>,
) -> ApiResult<Json<EvaluateRes>> {
    let vector = req.symptom_vector();
    let patient = req.patient_metadata();
    let evaluator = state.evaluator.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        evaluator.evaluate_vector(&vector, patient, Some(user.user_id))
    })
    .await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/evaluations",
    responses(
        (status = 200, description = "The caller's evaluations, newest first", body = ListEvaluationsRes),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn list_evaluations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ListEvaluationsRes>> {
    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.list(Some(&user.user_id))).await?;
    let evaluations = records.into_iter().map(EvaluationRecordRes::from).collect();
    Ok(Json(ListEvaluationsRes { evaluations }))
}

#[utoipa::path(
    get,
    path = "/evaluations/{id}",
    params(("id" = String, Path, description = "Evaluation id (32 hex characters)")),
    responses(
        (status = 200, description = "A single evaluation", body = EvaluationRecordRes),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such evaluation for this user")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn read_evaluation(
    State(state): State<AppState>,
    user: CurrentUser,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<Json<EvaluationRecordRes>> {
    let id = RecordId::parse(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let store = state.store.clone();
    let record = tokio::task::spawn_blocking(move || store.read(&id)).await??;

    // Other users' records are reported as missing.
    if record.owner != Some(user.user_id) {
        return Err(ApiError::NotFound("Evaluation not found".into()));
    }
    Ok(Json(record.into()))
}

#[utoipa::path(
    post,
    path = "/api/symcount",
    request_body = SymptomCountReq,
    responses(
        (status = 200, description = "Number of truthy values submitted", body = SymptomCountRes)
    )
)]
#[axum::debug_handler]
pub async fn symptom_count(
    State(_state): State<AppState>,
    Json(req): Json<SymptomCountReq>,
) -> Json<SymptomCountRes> {
    Json(req.count())
}
