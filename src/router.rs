use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{self, admin, public};
use crate::middleware::admin_gate;
use crate::pages;
use crate::state::AppState;

/// Router-wide settings that are not part of the per-request state
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub max_body_bytes: usize,
    pub enable_cors: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            enable_cors: false,
        }
    }
}

pub fn app(state: AppState, options: RouterOptions) -> Router {
    let uploads = ServeDir::new(&state.uploads_dir);

    let router = Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(skill_routes())
        .merge(project_routes())
        .merge(admin_routes())
        .merge(public_routes())
        .merge(page_routes())
        .nest_service(public::upload::UPLOADS_URL_PREFIX, uploads)
        .with_state(state)
        // Global middleware
        .layer(middleware::from_fn(admin_gate))
        .layer(DefaultBodyLimit::max(options.max_body_bytes));

    let router = if options.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
}

fn skill_routes() -> Router<AppState> {
    use admin::skills;

    Router::new()
        // Collection, with the id in the body for PUT and DELETE
        .route(
            "/api/admin/skills",
            get(skills::list)
                .post(skills::create)
                .put(skills::update_by_body)
                .delete(skills::delete_by_body),
        )
        .route(
            "/api/admin/skills/:id",
            get(skills::get).put(skills::update).delete(skills::delete),
        )
}

fn project_routes() -> Router<AppState> {
    use admin::projects;

    Router::new()
        .route(
            "/api/admin/projects",
            get(projects::list)
                .post(projects::create)
                .put(projects::update_by_body)
                .delete(projects::delete_by_body),
        )
        .route(
            "/api/admin/projects/:id",
            get(projects::get).put(projects::update).delete(projects::delete),
        )
}

fn admin_routes() -> Router<AppState> {
    use admin::{activity, dashboard, messages};

    Router::new()
        .route("/api/admin/messages", get(messages::list).post(messages::create))
        .route("/api/admin/activity", get(activity::list).post(activity::create))
        .route("/api/admin/dashboard", get(dashboard::get))
}

fn public_routes() -> Router<AppState> {
    use public::{upload, visitors};

    Router::new()
        .route("/api/visitors", get(visitors::active).post(visitors::ping))
        .route("/api/upload", post(upload::upload))
}

fn page_routes() -> Router<AppState> {
    use pages::admin as panel;
    use pages::public as site;

    Router::new()
        .route("/", get(site::home))
        .route("/projects", get(site::projects))
        // Everything below /admin except the login page sits behind admin_gate
        .route("/admin", get(panel::index))
        .route("/admin/login", get(panel::login))
        .route("/admin/dashboard", get(panel::dashboard))
        .route("/admin/skills", get(panel::skills))
        .route("/admin/projects", get(panel::projects))
        .route("/admin/messages", get(panel::messages))
}
