// handlers/admin/dashboard.rs - GET /api/admin/dashboard

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::manager::DatabaseError;
use crate::database::models::visitor::{growth_percentage, PresenceWindows};
use crate::database::repository::Store;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub skills: SkillStats,
    pub projects: ProjectStats,
    pub visitors: VisitorStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillStats {
    pub total: i64,
    pub new: i64,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: i64,
    pub completed: i64,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitorStats {
    pub total: i64,
    pub previous: i64,
    pub percentage: String,
}

/// GET /api/admin/dashboard
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(collect_stats(state.store.as_ref(), Utc::now()).await))
}

/// Aggregate counts for the admin summary.
///
/// Each count is queried independently and falls back to zero on failure.
/// Failures are logged.
pub async fn collect_stats(store: &dyn Store, now: DateTime<Utc>) -> DashboardStats {
    let windows = PresenceWindows::ending_at(now);

    let (skills, projects, current, previous) = futures::join!(
        store.count_skills(),
        store.count_projects(),
        store.count_visitors(windows.current_start, None),
        store.count_visitors(windows.previous_start, Some(windows.current_start)),
    );

    let skills = or_zero("skills", skills);
    let projects = or_zero("projects", projects);
    let current = or_zero("visitors", current);
    let previous = or_zero("previous visitors", previous);

    DashboardStats {
        skills: SkillStats {
            total: skills,
            new: 0,
            percentage: "0%".to_string(),
        },
        projects: ProjectStats {
            total: projects,
            completed: 0,
            percentage: "0%".to_string(),
        },
        visitors: VisitorStats {
            total: current,
            previous,
            percentage: growth_percentage(current, previous),
        },
    }
}

fn or_zero(what: &str, result: Result<i64, DatabaseError>) -> i64 {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "dashboard: failed to count {}", what);
        0
    })
}
