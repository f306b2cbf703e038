// handlers/admin/mod.rs - admin JSON API (/api/admin/*)
//
// These routes are not behind the page gate: the public contact form posts
// to /api/admin/messages.

pub mod activity;
pub mod dashboard;
pub mod messages;
pub mod projects;
pub mod skills;
