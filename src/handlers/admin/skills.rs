// handlers/admin/skills.rs - /api/admin/skills[/:id]

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{Skill, SkillPayload};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/admin/skills - all skills ordered by name
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Skill>>> {
    Ok(Json(state.store.list_skills().await?))
}

/// GET /api/admin/skills/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Skill>> {
    state
        .store
        .get_skill(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill not found"))
}

/// POST /api/admin/skills
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SkillPayload>,
) -> ApiResult<Json<Skill>> {
    let draft = payload.into_draft()?;
    let skill = state.store.create_skill(draft).await?;
    state.note_activity("skill", format!("Added skill {}", skill.name)).await;
    Ok(Json(skill))
}

/// PUT /api/admin/skills/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SkillPayload>,
) -> ApiResult<Json<Skill>> {
    apply_update(&state, id, payload).await
}

/// PUT /api/admin/skills - id carried in the body
pub async fn update_by_body(
    State(state): State<AppState>,
    Json(payload): Json<SkillPayload>,
) -> ApiResult<Json<Skill>> {
    let id = payload.id.ok_or_else(|| ApiError::bad_request("Skill id is required"))?;
    apply_update(&state, id, payload).await
}

async fn apply_update(state: &AppState, id: i32, payload: SkillPayload) -> ApiResult<Json<Skill>> {
    let draft = payload.into_draft()?;
    let skill = state
        .store
        .update_skill(id, draft)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found"))?;
    state.note_activity("skill", format!("Updated skill {}", skill.name)).await;
    Ok(Json(skill))
}

/// DELETE /api/admin/skills/:id - succeeds whether or not the skill existed
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Value>> {
    remove(&state, id).await
}

/// DELETE /api/admin/skills - id carried in the body
pub async fn delete_by_body(
    State(state): State<AppState>,
    Json(payload): Json<SkillPayload>,
) -> ApiResult<Json<Value>> {
    let id = payload.id.ok_or_else(|| ApiError::bad_request("Skill id is required"))?;
    remove(&state, id).await
}

async fn remove(state: &AppState, id: i32) -> ApiResult<Json<Value>> {
    if state.store.delete_skill(id).await? {
        state.note_activity("skill", format!("Deleted skill #{id}")).await;
    }
    Ok(Json(json!({ "message": "Skill deleted successfully" })))
}
