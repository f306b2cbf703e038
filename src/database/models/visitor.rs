use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Width of the "active" presence window
pub const ACTIVE_WINDOW_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: i32,
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPayload {
    pub session_id: Option<String>,
    pub page_url: Option<String>,
}

/// One presence ping, with request metadata attached by the handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorPing {
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
}

/// Current and previous presence windows ending at `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceWindows {
    pub current_start: DateTime<Utc>,
    pub previous_start: DateTime<Utc>,
}

impl PresenceWindows {
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        let width = Duration::minutes(ACTIVE_WINDOW_MINUTES);
        Self {
            current_start: now - width,
            previous_start: now - width - width,
        }
    }
}

/// Growth of `current` over `previous` as a whole-number percentage string.
/// A zero previous count yields "0%".
pub fn growth_percentage(current: i64, previous: i64) -> String {
    if previous <= 0 {
        return "0%".to_string();
    }
    let pct = ((current - previous) as f64 / previous as f64) * 100.0;
    format!("{}%", pct.round() as i64)
}
