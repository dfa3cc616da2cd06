//! REST API for the roster service (axum)
//!
//! # Routes (nested under `/api` by the server binary)
//!
//! - `GET    /health`
//! - `GET    /teachers`, `POST /teachers`, `DELETE /teachers/:email`
//! - `GET    /students`, `POST /students`, `DELETE /students/:email`
//! - `GET    /teachers_students` - every registration edge
//! - `POST   /register` - `{"teacher": "...", "students": ["..."]}`
//! - `GET    /commonstudents?teacher=a&teacher=b` - `{"students": [...]}`
//! - `POST   /suspend`, `POST /unsuspend` - `{"student": "..."}`
//! - `POST   /retrievefornotifications` - `{"teacher", "notification"}` → `{"recipients": [...]}`
//!
//! Errors are `{"message": "..."}`: InvalidArgument → 400, NotFound → 404,
//! Conflict → 409, anything else → 500.

use crate::entities::{Registration, Student, Teacher};
use crate::error::RosterError;
use crate::requests::{
    CommonStudentsRequest, CreateIdentityRequest, NotificationRequest, RegisterRequest,
    SuspendRequest,
};
use crate::service::RosterService;
use crate::store::RosterStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
///
/// The lock is held for the whole of one operation, so each call reads a
/// consistent view of rosters and suspension flags.
pub struct AppState<S: RosterStore> {
    pub service: Mutex<RosterService<S>>,
}

impl<S: RosterStore> AppState<S> {
    pub fn new(service: RosterService<S>) -> Arc<Self> {
        Arc::new(AppState {
            service: Mutex::new(service),
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommonStudentsResponse {
    pub students: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipientsResponse {
    pub recipients: Vec<String>,
}

/// Wrapper so engine errors can be returned straight from handlers
#[derive(Debug)]
pub struct ApiError(pub RosterError);

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RosterError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            RosterError::NotFound { .. } => StatusCode::NOT_FOUND,
            RosterError::Conflict { .. } => StatusCode::CONFLICT,
            RosterError::Storage(_) | RosterError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Router
// ============================================================================

pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: RosterStore + Send + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/teachers", get(list_teachers::<S>).post(create_teacher::<S>))
        .route("/teachers/:email", delete(delete_teacher::<S>))
        .route("/students", get(list_students::<S>).post(create_student::<S>))
        .route("/students/:email", delete(delete_student::<S>))
        .route("/teachers_students", get(list_registrations::<S>))
        .route("/register", post(register_students::<S>))
        .route("/commonstudents", get(common_students::<S>))
        .route("/suspend", post(suspend_student::<S>))
        .route("/unsuspend", post(unsuspend_student::<S>))
        .route("/retrievefornotifications", post(retrieve_for_notifications::<S>))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_teachers<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Json<Vec<Teacher>>> {
    let service = state.service.lock().await;
    Ok(Json(service.list_teachers()?))
}

async fn create_teacher<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateIdentityRequest>,
) -> ApiResult<(StatusCode, Json<Teacher>)> {
    let service = state.service.lock().await;
    let teacher = service.create_teacher(&req)?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn delete_teacher<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> ApiResult<StatusCode> {
    let service = state.service.lock().await;
    service.delete_teacher(&email)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_students<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Json<Vec<Student>>> {
    let service = state.service.lock().await;
    Ok(Json(service.list_students()?))
}

async fn create_student<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateIdentityRequest>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let service = state.service.lock().await;
    let student = service.create_student(&req)?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn delete_student<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> ApiResult<StatusCode> {
    let service = state.service.lock().await;
    service.delete_student(&email)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_registrations<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Json<Vec<Registration>>> {
    let service = state.service.lock().await;
    Ok(Json(service.list_registrations()?))
}

async fn register_students<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<StatusCode> {
    let service = state.service.lock().await;
    service.register_students(&req)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Repeated `teacher` keys arrive as separate pairs; other keys are ignored.
async fn common_students<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<CommonStudentsResponse>> {
    let req = CommonStudentsRequest {
        teachers: params
            .into_iter()
            .filter(|(key, _)| key == "teacher")
            .map(|(_, value)| value)
            .collect(),
    };

    let service = state.service.lock().await;
    let students = service.common_students(&req)?;
    Ok(Json(CommonStudentsResponse {
        students: students.into_iter().collect(),
    }))
}

async fn suspend_student<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SuspendRequest>,
) -> ApiResult<StatusCode> {
    let service = state.service.lock().await;
    service.suspend_student(&req)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unsuspend_student<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SuspendRequest>,
) -> ApiResult<StatusCode> {
    let service = state.service.lock().await;
    service.unsuspend_student(&req)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn retrieve_for_notifications<S: RosterStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NotificationRequest>,
) -> ApiResult<Json<RecipientsResponse>> {
    let service = state.service.lock().await;
    let recipients = service.resolve_recipients(&req)?;
    Ok(Json(RecipientsResponse {
        recipients: recipients.into_iter().collect(),
    }))
}
