use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints accessible to any client, anonymous or logged-in: the auth
/// gateway (register/login/logout) and the read-only post listing the
/// landing page renders before a session exists.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness check for monitors and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/register
        // Account creation. No session is issued; login is a separate call.
        .route("/api/auth/register", post(handlers::register))
        // POST /api/auth/login
        // Credential verification; sets the HTTP-only session cookie.
        .route("/api/auth/login", post(handlers::login))
        // POST /api/auth/admin/login
        // Administrator login against the configured credential pair.
        .route("/api/auth/admin/login", post(handlers::admin_login))
        // POST /api/auth/logout
        // Clears the session cookie. Deliberately unauthenticated so a
        // client holding an expired token can still log out cleanly.
        .route("/api/auth/logout", post(handlers::logout))
        // GET /api/post/all
        // Every post, newest first, authors and likers joined.
        .route("/api/post/all", get(handlers::get_all_posts))
        // GET /api/post/{id}
        // Single post detail. The static routes above win over this
        // parameterized one during matching.
        .route("/api/post/{id}", get(handlers::get_post))
}
