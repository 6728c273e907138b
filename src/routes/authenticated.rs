use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any caller holding a valid session. The `auth_middleware`
/// layer applied above this module guarantees each handler receives a
/// validated `AuthUser`; owner-only rules (edit/delete) are enforced inside
/// the handlers against that identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/auth/profile
        // The caller's own profile, password hash excluded.
        .route("/api/auth/profile", get(handlers::get_profile))
        // GET /api/auth/is-auth
        // Lightweight session check used by the client on page load.
        .route("/api/auth/is-auth", get(handlers::is_auth))
        // POST /api/post/newpost
        // Creates a post owned by the session user. Content length and
        // title uniqueness are validated before insertion.
        .route("/api/post/newpost", post(handlers::create_post))
        // GET /api/post/user-posts
        // The caller's own posts, newest first.
        .route("/api/post/user-posts", get(handlers::get_user_posts))
        // PUT /api/post/edit/{id}
        // Owner-only edit; admins are deliberately not exempt here.
        .route("/api/post/edit/{id}", put(handlers::edit_post))
        // DELETE /api/post/delete/{id}
        // Owner or admin delete.
        .route("/api/post/delete/{id}", delete(handlers::delete_post))
        // GET /api/post/like/{id}
        // Toggles the caller's membership in the post's likes collection.
        .route("/api/post/like/{id}", get(handlers::toggle_like))
        // POST /api/contact/send
        // Contact form submission.
        .route("/api/contact/send", post(handlers::send_contact))
}
