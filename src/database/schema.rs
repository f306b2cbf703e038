//! SQL DDL for the portfolio database (PostgreSQL).
//!
//! Every statement is idempotent so `migrate` can run on each startup.

/// Fallback icon for skills created without one
pub const DEFAULT_SKILL_ICON: &str = "SiCode";

const SKILLS: &str = r#"
CREATE TABLE IF NOT EXISTS skills (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    icon TEXT NOT NULL DEFAULT 'SiCode'
)"#;

// Older databases predate the icon column
const SKILLS_ICON: &str =
    "ALTER TABLE skills ADD COLUMN IF NOT EXISTS icon TEXT NOT NULL DEFAULT 'SiCode'";

const PROJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url TEXT NULL,
    github_url TEXT NULL,
    live_url TEXT NULL
)"#;

// No foreign key on skill_id: deleting a skill leaves its join rows behind,
// reads hide them by joining against skills.
const PROJECT_SKILLS: &str = r#"
CREATE TABLE IF NOT EXISTS project_skills (
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    skill_id INTEGER NOT NULL,
    PRIMARY KEY (project_id, skill_id)
)"#;

const MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const VISITORS: &str = r#"
CREATE TABLE IF NOT EXISTS visitors (
    id SERIAL PRIMARY KEY,
    session_id TEXT NOT NULL UNIQUE,
    ip_address TEXT NULL,
    user_agent TEXT NULL,
    page_url TEXT NULL,
    last_seen TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const VISITORS_LAST_SEEN_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_visitors_last_seen ON visitors(last_seen)";

const ACTIVITY: &str = r#"
CREATE TABLE IF NOT EXISTS activity (
    id SERIAL PRIMARY KEY,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    user_id INTEGER NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const ADMINS: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id SERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
)"#;

/// Statements in dependency order
pub fn statements() -> [&'static str; 9] {
    [
        SKILLS,
        SKILLS_ICON,
        PROJECTS,
        PROJECT_SKILLS,
        MESSAGES,
        VISITORS,
        VISITORS_LAST_SEEN_INDEX,
        ACTIVITY,
        ADMINS,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_are_created_before_their_join_table() {
        let stmts = statements();
        let projects = stmts.iter().position(|s| s.contains("TABLE IF NOT EXISTS projects"));
        let join = stmts.iter().position(|s| s.contains("TABLE IF NOT EXISTS project_skills"));
        assert!(projects.unwrap() < join.unwrap());
    }

    #[test]
    fn every_statement_is_idempotent() {
        for stmt in statements() {
            assert!(stmt.contains("IF NOT EXISTS"), "not idempotent: {stmt}");
        }
    }
}
