// handlers/admin/projects.rs - /api/admin/projects[/:id]
//
// Writes go through the repository as single transactions: the project row
// and its full skill set are replaced together or not at all.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{Project, ProjectPayload};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/admin/projects - every project with its `{id, name}` skills
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.store.list_projects().await?))
}

/// GET /api/admin/projects/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Project>> {
    state
        .store
        .get_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

/// POST /api/admin/projects
///
/// Body: `{ title, description, imageUrl?, githubUrl?, liveUrl?, skills: [skillId] }`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Json<Project>> {
    let draft = payload.into_draft()?;
    let project = state.store.create_project(draft).await?;
    tracing::info!(project_id = project.id, "project created");
    state.note_activity("project", format!("Added project {}", project.title)).await;
    Ok(Json(project))
}

/// PUT /api/admin/projects/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Json<Project>> {
    apply_update(&state, id, payload).await
}

/// PUT /api/admin/projects - id carried in the body
pub async fn update_by_body(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Json<Project>> {
    let id = payload.id.ok_or_else(|| ApiError::bad_request("Project id is required"))?;
    apply_update(&state, id, payload).await
}

async fn apply_update(state: &AppState, id: i32, payload: ProjectPayload) -> ApiResult<Json<Project>> {
    let draft = payload.into_draft()?;
    let project = state
        .store
        .update_project(id, draft)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    tracing::info!(project_id = id, skills = project.skills.len(), "project updated");
    state.note_activity("project", format!("Updated project {}", project.title)).await;
    Ok(Json(project))
}

/// DELETE /api/admin/projects/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Value>> {
    remove(&state, id).await
}

/// DELETE /api/admin/projects - id carried in the body
pub async fn delete_by_body(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> ApiResult<Json<Value>> {
    let id = payload.id.ok_or_else(|| ApiError::bad_request("Project id is required"))?;
    remove(&state, id).await
}

async fn remove(state: &AppState, id: i32) -> ApiResult<Json<Value>> {
    if state.store.delete_project(id).await? {
        state.note_activity("project", format!("Deleted project #{id}")).await;
    }
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}
