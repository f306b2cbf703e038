use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::database::manager::DatabaseError;
use crate::database::models::Admin;
use crate::database::repository::AdminRepository;

/// Cookie whose mere presence marks a browser as signed in to the admin panel
pub const SESSION_COOKIE: &str = "isAdminLoggedIn";

/// Session cookie lifetime
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24;

/// Check a username/password pair against the admin table.
///
/// This is the only place credentials are compared. Stored passwords are
/// plaintext, so this is a straight equality check; swapping in a hashing
/// scheme only needs to change `password_matches`.
pub async fn verify_credentials<R>(
    admins: &R,
    username: &str,
    password: &str,
) -> Result<Option<Admin>, DatabaseError>
where
    R: AdminRepository + ?Sized,
{
    let Some(admin) = admins.find_admin(username).await? else {
        return Ok(None);
    };
    Ok(password_matches(&admin.password, password).then_some(admin))
}

fn password_matches(stored: &str, supplied: &str) -> bool {
    stored == supplied
}

/// Cookie set on successful login
pub fn session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "true"))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
        .build()
}

/// Cookie shape used to clear the session; path must match the one set at login
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn accepts_matching_credentials() {
        let store = MemoryStore::new();
        store.save_admin("admin", "hunter2").await.unwrap();

        let admin = verify_credentials(&store, "admin", "hunter2").await.unwrap();
        assert_eq!(admin.map(|a| a.username), Some("admin".to_string()));
    }

    #[tokio::test]
    async fn rejects_wrong_password_and_unknown_user() {
        let store = MemoryStore::new();
        store.save_admin("admin", "hunter2").await.unwrap();

        assert!(verify_credentials(&store, "admin", "hunter3").await.unwrap().is_none());
        assert!(verify_credentials(&store, "root", "hunter2").await.unwrap().is_none());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie(true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "true");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(1)));
    }
}
