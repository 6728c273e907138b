use crate::{
    AppState,
    auth::{self, AdminUser, AuthUser, Role},
    dashboard::{self, DashboardQuery},
    error::ApiError,
    models::{
        AdminDeleteResponse, AdminLoginResponse, ContactRequest, CreatePostRequest,
        DashboardFilters, DashboardResponse, DashboardStats, EditPostRequest, LoginRequest,
        LoginResponse, MessageResponse, PostListResponse, PostResponse, ProfileResponse,
        RegisterRequest, Spotlight, UserProfile,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

// --- Credential & Session Issuer ---

/// register
///
/// [Public Route] Creates a new account. The password is argon2-hashed
/// before it touches the database; no token is issued — the user logs in
/// separately.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Please fill all the fields".to_string(),
        ));
    }

    if state.repo.find_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let hash = auth::hash_password(&payload.password)?;
    state
        .repo
        .create_user(&payload.name, &payload.email, &hash)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "User registered successfully".to_string(),
    }))
}

/// login
///
/// [Public Route] Verifies the credential pair and issues a signed session
/// token as an HTTP-only cookie. The response carries only the public
/// profile; the password hash never leaves the repository layer.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, cookie set", body = LoginResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No such user")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Please fill all the fields".to_string(),
        ));
    }

    let user = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User does not exist".to_string()))?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let role = if user.is_admin { Role::Admin } else { Role::User };
    let token = auth::issue_token(&state.config.jwt_secret, user.id, role)?;
    let jar = jar.add(auth::session_cookie(&state.config, token));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "User logged in successfully".to_string(),
            user: crate::models::AuthorInfo {
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

/// admin_login
///
/// [Public Route] Administrator login. The credential pair must match the
/// configured administrator values AND a user record with administrator
/// privileges must exist — both gates, not either.
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin logged in, cookie set", body = AdminLoginResponse),
        (status = 401, description = "Not the configured administrator")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AdminLoginResponse>), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Please fill all the fields".to_string(),
        ));
    }

    if payload.email != state.config.admin_email
        || payload.password != state.config.admin_password
    {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let user = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .filter(|u| u.is_admin)
        .ok_or_else(|| ApiError::Auth("Admin user not found in database".to_string()))?;

    let token = auth::issue_token(&state.config.jwt_secret, user.id, Role::Admin)?;
    let jar = jar.add(auth::session_cookie(&state.config, token));

    Ok((
        jar,
        Json(AdminLoginResponse {
            success: true,
            message: "Admin logged in successfully".to_string(),
            admin: user.email,
        }),
    ))
}

/// logout
///
/// [Public Route] Replaces the session cookie with an expired one.
/// Idempotent; succeeds whether or not a session was present. The token
/// itself stays verifiable until expiry — logout only removes the
/// client-held copy.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = MessageResponse))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(auth::clear_session_cookie(&state.config));
    (
        jar,
        Json(MessageResponse {
            success: true,
            message: "User logged out successfully".to_string(),
        }),
    )
}

/// get_profile
///
/// [Authenticated Route] Fetches the caller's profile by token subject,
/// minus the password hash. A valid token whose user row has since been
/// deleted yields 404.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "User row gone")
    )
)]
pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let record = state
        .repo
        .find_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile fetched successfully".to_string(),
        user: UserProfile {
            id: record.id,
            name: record.name,
            email: record.email,
            is_admin: record.is_admin,
        },
    }))
}

/// is_auth
///
/// [Authenticated Route] Session check used by the client on page load.
/// Same lookup as the profile endpoint, different message.
#[utoipa::path(
    get,
    path = "/api/auth/is-auth",
    responses((status = 200, description = "Session valid", body = ProfileResponse))
)]
pub async fn is_auth(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let record = state
        .repo
        .find_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "User is authenticated".to_string(),
        user: UserProfile {
            id: record.id,
            name: record.name,
            email: record.email,
            is_admin: record.is_admin,
        },
    }))
}

// --- Post Repository Operations ---

/// create_post
///
/// [Authenticated Route] Creates a post owned by the caller. Content must
/// meet the configured minimum length (counted in characters) and the
/// title must be unique across all posts.
#[utoipa::path(
    post,
    path = "/api/post/newpost",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = PostResponse),
        (status = 400, description = "Missing fields or content too short"),
        (status = 409, description = "Title already taken")
    )
)]
pub async fn create_post(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    if payload.title.is_empty() || payload.content.is_empty() {
        return Err(ApiError::Validation(
            "Please fill all the fields".to_string(),
        ));
    }

    let min = state.config.min_content_len;
    if payload.content.chars().count() < min {
        return Err(ApiError::Validation(format!(
            "Content must be at least {} characters long",
            min
        )));
    }

    if state.repo.title_exists(&payload.title).await? {
        return Err(ApiError::Conflict("Post already exists".to_string()));
    }

    let post = state
        .repo
        .create_post(user.id, &payload.title, &payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            success: true,
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

/// get_all_posts
///
/// [Public Route] Lists every post, newest first, with the owner's public
/// fields and the likers joined in.
#[utoipa::path(
    get,
    path = "/api/post/all",
    responses((status = 200, description = "All posts", body = PostListResponse))
)]
pub async fn get_all_posts(
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = state.repo.list_posts().await?;
    Ok(Json(PostListResponse {
        success: true,
        message: "Posts fetched successfully".to_string(),
        posts,
    }))
}

/// get_user_posts
///
/// [Authenticated Route] Lists the caller's own posts, newest first.
#[utoipa::path(
    get,
    path = "/api/post/user-posts",
    responses((status = 200, description = "Own posts", body = PostListResponse))
)]
pub async fn get_user_posts(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = state.repo.list_posts_by_owner(user.id).await?;
    Ok(Json(PostListResponse {
        success: true,
        message: "User posts fetched successfully".to_string(),
        posts,
    }))
}

/// get_post
///
/// [Public Route] Fetches one post by id with owner fields joined.
#[utoipa::path(
    get,
    path = "/api/post/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = PostResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .repo
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(PostResponse {
        success: true,
        message: "Post fetched successfully".to_string(),
        post,
    }))
}

/// edit_post
///
/// [Authenticated Route] Owner-only edit. Title and content are applied
/// only when both are non-empty; otherwise the post is returned unchanged.
/// Admins cannot edit others' posts — only the owner can.
#[utoipa::path(
    put,
    path = "/api/post/edit/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = EditPostRequest,
    responses(
        (status = 200, description = "Updated", body = PostResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn edit_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditPostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let owner = state
        .repo
        .get_post_owner(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    if owner != user.id {
        return Err(ApiError::Forbidden(
            "You can only edit your own posts".to_string(),
        ));
    }

    let post = if !payload.title.is_empty() && !payload.content.is_empty() {
        state
            .repo
            .update_post(id, &payload.title, &payload.content)
            .await?
    } else {
        state.repo.get_post(id).await?
    }
    .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(PostResponse {
        success: true,
        message: "Post updated".to_string(),
        post,
    }))
}

/// delete_post
///
/// [Authenticated Route] Deletes a post. Allowed for the owner or for an
/// administrator; everyone else gets 403 and the post is left unchanged.
#[utoipa::path(
    delete,
    path = "/api/post/delete/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not owner or admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let owner = state
        .repo
        .get_post_owner(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    if user.role != Role::Admin && owner != user.id {
        return Err(ApiError::Forbidden(
            "You can only delete your own posts".to_string(),
        ));
    }

    if !state.repo.delete_post(id).await? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Post deleted".to_string(),
    }))
}

/// toggle_like
///
/// [Authenticated Route] Flips the caller's membership in the post's likes
/// collection. The mutation is a single atomic set operation at the
/// persistence layer, so the caller's id appears at most once no matter
/// how requests interleave. Returns the updated post with owner and
/// likers' public fields joined.
#[utoipa::path(
    get,
    path = "/api/post/like/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Toggled", body = PostResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn toggle_like(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .repo
        .toggle_like(id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(PostResponse {
        success: true,
        message: "Post like updated".to_string(),
        post,
    }))
}

// --- Contact ---

/// send_contact
///
/// [Authenticated Route] Stores a contact message. All four fields are
/// required; the record is immutable after creation.
#[utoipa::path(
    post,
    path = "/api/contact/send",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Sent", body = MessageResponse),
        (status = 400, description = "Missing fields")
    )
)]
pub async fn send_contact(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.name.is_empty()
        || payload.email.is_empty()
        || payload.subject.is_empty()
        || payload.message.is_empty()
    {
        return Err(ApiError::Validation(
            "Please fill all the fields".to_string(),
        ));
    }

    state.repo.create_contact_message(&payload).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Contact form sent successfully".to_string(),
    }))
}

// --- Admin Reporting Pipeline ---

/// Collapses any persistence failure in the dashboard pipeline to the
/// generic envelope; no partial results leave this module.
fn dashboard_err(e: sqlx::Error) -> ApiError {
    tracing::error!("dashboard query failed: {:?}", e);
    ApiError::Internal("Failed to load dashboard data".to_string())
}

/// get_admin_dashboard
///
/// [Admin Route] The reporting pipeline: filtered/sorted/paginated post
/// listing, dashboard-wide summary statistics, and the two spotlight
/// lists. The independent read-only queries run concurrently and the
/// response is assembled only once all of them have completed.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "No session"),
        (status = 403, description = "Not an admin"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_admin_dashboard(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let page = dashboard::clamp_page(query.page);
    let limit = dashboard::clamp_limit(query.limit);
    let search = query.search.trim().to_string();
    let offset = (page - 1) * limit;

    let repo = &state.repo;
    let (rows, filtered, total_posts, total_users, total_likes, active_authors, recent, top_liked) =
        tokio::join!(
            repo.search_posts(&search, query.sort_by, query.sort_order, offset, limit),
            repo.count_posts(&search),
            repo.count_posts(""),
            repo.count_users(),
            repo.total_likes(),
            repo.distinct_author_count(),
            repo.recent_posts(dashboard::RECENT_SPOTLIGHT),
            repo.top_liked_posts(dashboard::TOP_LIKED_SPOTLIGHT),
        );

    let rows = rows.map_err(dashboard_err)?;
    let filtered = filtered.map_err(dashboard_err)?;
    let total_posts = total_posts.map_err(dashboard_err)?;
    let total_users = total_users.map_err(dashboard_err)?;
    let total_likes = total_likes.map_err(dashboard_err)?;
    let active_authors = active_authors.map_err(dashboard_err)?;
    let recent = recent.map_err(dashboard_err)?;
    let top_liked = top_liked.map_err(dashboard_err)?;

    Ok(Json(DashboardResponse {
        success: true,
        message: "Admin dashboard data fetched successfully".to_string(),
        stats: DashboardStats {
            total_posts,
            total_users,
            total_likes,
            active_authors,
            average_likes: dashboard::average_likes(total_likes, total_posts),
        },
        filters: DashboardFilters {
            page,
            limit,
            total_pages: dashboard::total_pages(filtered, limit),
            search,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
        },
        posts: rows.into_iter().map(dashboard::format_post).collect(),
        spotlight: Spotlight {
            recent_posts: recent.into_iter().map(dashboard::format_spotlight).collect(),
            top_liked: top_liked
                .into_iter()
                .map(dashboard::format_spotlight)
                .collect(),
        },
    }))
}

/// admin_delete_post
///
/// [Admin Route] Force delete: removes any post by id, no ownership check.
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Removed", body = AdminDeleteResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_delete_post(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminDeleteResponse>, ApiError> {
    if !state.repo.delete_post(id).await? {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    Ok(Json(AdminDeleteResponse {
        success: true,
        message: "Post removed from the platform".to_string(),
        deleted_post_id: id,
    }))
}
