use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::models::{AuthorInfo, DashboardPost, DashboardRow, PostPermissions, SpotlightPost, SpotlightRow};

/// Maximum characters of post content shown in a dashboard row.
pub const PREVIEW_LIMIT: usize = 160;

/// Page-size clamp bounds for the dashboard listing.
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Number of entries in each spotlight list.
pub const RECENT_SPOTLIGHT: i64 = 5;
pub const TOP_LIKED_SPOTLIGHT: i64 = 3;

/// SortBy
///
/// Accepted sort keys for the dashboard listing. Unrecognized values fall
/// back to `Date` rather than rejecting the request, matching the lenient
/// query handling the client relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortBy {
    Title,
    Likes,
    #[serde(other)]
    Date,
}

/// SortOrder
///
/// Requested sort direction. Unrecognized values fall back to `Desc`.
/// Note that `sortBy=likes` ignores this entirely (see `order_clause`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortOrder {
    Asc,
    #[serde(other)]
    Desc,
}

/// DashboardQuery
///
/// Raw query parameters for GET /api/admin/dashboard, before clamping.
/// Every field is optional on the wire; missing values take the documented
/// defaults via `Default`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardQuery {
    /// 1-based page number; values below 1 are clamped up.
    pub page: i64,
    /// Page size; clamped to [1, 50].
    pub limit: i64,
    /// Free-text filter over title OR content, case-insensitive substring.
    pub search: String,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_by: SortBy::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

/// Lower-bounds the requested page at 1.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// Clamps the requested page size into [1, 50].
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// ceil(total / limit), floored at 1 so an empty result set still renders
/// as a single empty page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    ((total + limit - 1) / limit).max(1)
}

/// Average likes per post, rounded to one decimal. Zero when there are no
/// posts — the division is never evaluated in that case.
pub fn average_likes(total_likes: i64, total_posts: i64) -> f64 {
    if total_posts == 0 {
        return 0.0;
    }
    (total_likes as f64 / total_posts as f64 * 10.0).round() / 10.0
}

/// ORDER BY clause for the dashboard listing query. Column references are
/// fixed strings selected here, never interpolated user input; the search
/// filter itself is bound separately as a parameter.
///
/// `likes` always sorts by count descending with newest-first tie-break,
/// irrespective of the requested order: the view exists to surface the most
/// liked content, and an ascending pile of zero-like posts is never what an
/// operator asked for.
pub fn order_clause(sort_by: SortBy, sort_order: SortOrder) -> &'static str {
    match (sort_by, sort_order) {
        (SortBy::Title, SortOrder::Asc) => "p.title ASC",
        (SortBy::Title, SortOrder::Desc) => "p.title DESC",
        (SortBy::Likes, _) => "likes_count DESC, p.created_at DESC",
        (SortBy::Date, SortOrder::Asc) => "p.created_at ASC",
        (SortBy::Date, SortOrder::Desc) => "p.created_at DESC",
    }
}

/// Truncates content to the preview limit. Counted in characters, not
/// bytes, so multibyte content never splits a code point. Trailing
/// whitespace at the cut is trimmed before the ellipsis marker.
pub fn content_preview(content: &str) -> String {
    let mut chars = content.chars();
    let preview: String = chars.by_ref().take(PREVIEW_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", preview.trim_end())
    } else {
        preview
    }
}

/// Formats one listing row for the dashboard: author fallbacks for a
/// missing owner, truncated preview, and the static permission flags
/// (admins may remove but not edit others' posts from this view).
pub fn format_post(row: DashboardRow) -> DashboardPost {
    DashboardPost {
        id: row.id,
        title: row.title,
        author: AuthorInfo {
            name: row.author_name.unwrap_or_else(|| "Unknown".to_string()),
            email: row.author_email.unwrap_or_else(|| "N/A".to_string()),
        },
        published_on: row.created_at,
        likes_count: row.likes_count,
        content_preview: content_preview(&row.content),
        permissions: PostPermissions {
            can_delete: true,
            can_edit: false,
        },
    }
}

/// Formats one spotlight row.
pub fn format_spotlight(row: SpotlightRow) -> SpotlightPost {
    SpotlightPost {
        id: row.id,
        title: row.title,
        published_on: row.created_at,
        likes_count: row.likes_count,
        author_name: row.author_name.unwrap_or_else(|| "Unknown".to_string()),
    }
}
