use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dashboard::{SortBy, SortOrder};

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record from the `users` table, including the one-way
/// argon2 password hash. This struct stays internal to the repository and
/// handlers; anything serialized to the client goes through `UserProfile`
/// or `AuthorInfo`, which carry no hash field at all.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // Unique across all users; registration rejects duplicates.
    pub email: String,
    pub password_hash: String,
    // The RBAC flag: decides which role the session token carries.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// AuthorInfo
///
/// A user's public fields, joined onto posts and returned from login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

/// LikerInfo
///
/// Public identity of a user present in a post's likes collection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct LikerInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// UserProfile
///
/// Output schema for the profile and session-check endpoints. The password
/// hash is structurally absent, not merely skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// PostView
///
/// A post enriched for the client: owner's public fields joined in and the
/// likes collection expanded to the likers' public identities. This is the
/// primary data structure of the application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostView {
    pub id: Uuid,
    // Owner reference, kept so the client can render edit/delete controls.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    pub author: AuthorInfo,
    // Each user id appears at most once; enforced by the composite primary
    // key on `post_likes`, not by application bookkeeping.
    pub likes: Vec<LikerInfo>,
}

// --- Internal Row Types (Repository Use) ---

/// Raw post row with the owner's public fields joined, before the likers
/// are attached. Internal to the repository.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
}

/// One like edge with the liker's public fields, fetched in bulk for a set
/// of posts and grouped in application code to avoid per-post queries.
#[derive(Debug, Clone, FromRow)]
pub struct LikeRow {
    pub post_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Dashboard listing row: like-count derived at query time, author fields
/// nullable so a dangling owner reference degrades instead of failing.
#[derive(Debug, Clone, FromRow, Default)]
pub struct DashboardRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

/// Spotlight list row (most recent / most liked).
#[derive(Debug, Clone, FromRow, Default)]
pub struct SpotlightRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub author_name: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// Input payload for account registration.
#[derive(Debug, Clone, Deserialize, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input payload for user and admin login.
#[derive(Debug, Clone, Deserialize, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Input payload for creating a post. Content length is validated against
/// the configured minimum before anything touches the database.
#[derive(Debug, Clone, Deserialize, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Input payload for editing a post. Both fields must be non-empty for the
/// update to be applied; otherwise the post is returned unchanged.
#[derive(Debug, Clone, Deserialize, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EditPostRequest {
    pub title: String,
    pub content: String,
}

/// Input payload for the contact form. All four fields are required.
#[derive(Debug, Clone, Deserialize, Serialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

// --- Response Envelopes (Output Schemas) ---

/// Minimal `{ success, message }` envelope for operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Login envelope carrying the public profile; never the hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: AuthorInfo,
}

/// Admin login envelope; echoes the administrator email.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub admin: String,
}

/// Profile / session-check envelope.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

/// Single-post envelope.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostResponse {
    pub success: bool,
    pub message: String,
    pub post: PostView,
}

/// Post-collection envelope, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostListResponse {
    pub success: bool,
    pub message: String,
    pub posts: Vec<PostView>,
}

/// Admin delete envelope, echoing the removed post id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_post_id: Uuid,
}

// --- Dashboard Schemas (Output) ---

/// Static permission flags attached to every dashboard row: admins may
/// remove but not edit others' posts from this view.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostPermissions {
    pub can_delete: bool,
    pub can_edit: bool,
}

/// One formatted dashboard row: truncated preview, joined author with
/// fallbacks, derived like-count.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardPost {
    pub id: Uuid,
    pub title: String,
    pub author: AuthorInfo,
    #[ts(type = "string")]
    pub published_on: DateTime<Utc>,
    pub likes_count: i64,
    pub content_preview: String,
    pub permissions: PostPermissions,
}

/// Dashboard-wide summary statistics, recomputed on every request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_posts: i64,
    pub total_users: i64,
    pub total_likes: i64,
    pub active_authors: i64,
    /// totalLikes / totalPosts rounded to one decimal; 0 when no posts.
    pub average_likes: f64,
}

/// Echo of the effective (clamped, defaulted) query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardFilters {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub search: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// Spotlight entry: a post headline for the recent / top-liked lists.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SpotlightPost {
    pub id: Uuid,
    pub title: String,
    #[ts(type = "string")]
    pub published_on: DateTime<Utc>,
    pub likes_count: i64,
    pub author_name: String,
}

/// The two curated dashboard lists: five most recent posts and the three
/// with the highest like-count.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Spotlight {
    pub recent_posts: Vec<SpotlightPost>,
    pub top_liked: Vec<SpotlightPost>,
}

/// Full dashboard envelope. Either every section is present or the request
/// failed as a whole; there is no partial-result state.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardResponse {
    pub success: bool,
    pub message: String,
    pub stats: DashboardStats,
    pub filters: DashboardFilters,
    pub posts: Vec<DashboardPost>,
    pub spotlight: Spotlight,
}
