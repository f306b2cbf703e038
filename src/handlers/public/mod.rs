// handlers/public/mod.rs - endpoints reachable without the admin cookie
//
// Login, visitor presence pings and image upload.

pub mod auth;
pub mod upload;
pub mod visitors;
