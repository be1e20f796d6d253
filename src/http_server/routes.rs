//! Data manager HTTP routes
//!
//! Tab CRUD plus the task and annotation views of a tab. Tab state is keyed by
//! the session id that [`assign_session`] attaches to each request.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::{DataManagerError, DmResult};
use crate::executor::{prepare_annotations, prepare_tasks, AnnotationPage, QueryParams, TaskPage};
use crate::project::{Columns, SharedProject};
use crate::tabs::{Tab, TabSessions, TabStore};

use super::session::{assign_session, SessionId};

// ==================
// Shared State
// ==================

/// State shared across handlers
pub struct AppState {
    pub project: SharedProject,
    pub sessions: TabSessions,
}

impl AppState {
    pub fn new(project: SharedProject) -> Self {
        Self {
            project,
            sessions: TabSessions::new(),
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PageQuery {
    /// Query-string pagination overrides the tab's own
    fn params(&self, tab: Tab) -> QueryParams {
        QueryParams::new(Some(tab)).with_overrides(self.page, self.page_size)
    }
}

#[derive(Debug, Serialize)]
pub struct TabsResponse {
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==================
// Routes
// ==================

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Create data manager routes
pub fn data_manager_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/project/columns", get(columns_handler))
        .route("/project/tabs", get(list_tabs_handler))
        .route(
            "/project/tabs/:id",
            get(get_tab_handler)
                .post(save_tab_handler)
                .delete(delete_tab_handler),
        )
        .route("/project/tabs/:id/tasks", get(tasks_handler))
        .route("/project/tabs/:id/annotations", get(annotations_handler))
        .with_state(state)
        .layer(middleware::from_fn(assign_session))
}

// ==================
// Helper Functions
// ==================

fn load_tab(state: &AppState, session: SessionId, id: i64, require_existing: bool) -> DmResult<Tab> {
    state
        .sessions
        .read(session.0, |store| store.load(id, require_existing))
}

fn log_failure(err: DataManagerError) -> DataManagerError {
    if err.is_client_error() {
        tracing::warn!(event = "REQUEST_REJECTED", code = err.code(), error = %err);
    } else {
        tracing::error!(event = "REQUEST_FAILED", code = err.code(), error = %err);
    }
    err
}

// ==================
// Handlers
// ==================

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn columns_handler(State(state): State<Arc<AppState>>) -> Json<Columns> {
    Json(state.project.columns())
}

async fn list_tabs_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> Json<TabsResponse> {
    let tabs = state.sessions.read(session.0, |store| store.tabs());
    Json(TabsResponse { tabs })
}

async fn get_tab_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> Result<Json<Tab>, DataManagerError> {
    load_tab(&state, session, id, true).map(Json)
}

async fn save_tab_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
    Json(tab): Json<Tab>,
) -> Json<Tab> {
    let saved = state.sessions.write(session.0, |store| store.save(id, tab));
    Json(saved)
}

async fn delete_tab_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> Result<StatusCode, DataManagerError> {
    if state.sessions.delete(session.0, id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DataManagerError::TabNotFound(id))
    }
}

async fn tasks_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TaskPage>, DataManagerError> {
    let tab = load_tab(&state, session, id, false)?;
    prepare_tasks(&state.project, &query.params(tab))
        .map(Json)
        .map_err(log_failure)
}

async fn annotations_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<AnnotationPage>, DataManagerError> {
    let tab = load_tab(&state, session, id, false)?;
    let params = query.params(tab);

    // Annotations paginate over every task's completions
    let tasks = prepare_tasks(&state.project, &params.unpaginated()).map_err(log_failure)?;

    Ok(Json(prepare_annotations(
        &tasks.tasks,
        &params,
        state.project.datetime_format(),
    )))
}
