use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// Moderation and reporting endpoints, nested under /api/admin. Every
/// handler takes the `AdminUser` extractor, which authenticates the session
/// and then rejects non-admin roles with 403 — a valid user session is not
/// enough.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/dashboard
        // The reporting pipeline: paginated/filtered/sorted post listing,
        // summary statistics, and the spotlight lists in one response.
        .route("/dashboard", get(handlers::get_admin_dashboard))
        // DELETE /api/admin/posts/{id}
        // Force delete of any post, no ownership check.
        .route("/posts/{id}", delete(handlers::admin_delete_post))
}
