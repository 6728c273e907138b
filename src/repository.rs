use crate::dashboard::{SortBy, SortOrder, order_clause};
use crate::models::{
    ContactRequest, DashboardRow, LikeRow, LikerInfo, PostRow, PostView, SpotlightRow, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for all persistence operations. Handlers interact with
/// the data layer through this trait only, which keeps them testable against
/// in-memory mocks and keeps every SQL statement in one file.
///
/// Errors propagate as `sqlx::Error` and are mapped to the API error
/// envelope at the handler layer; the repository never swallows a failure.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;
    async fn count_users(&self) -> Result<i64, sqlx::Error>;

    // --- Posts ---
    async fn title_exists(&self, title: &str) -> Result<bool, sqlx::Error>;
    async fn create_post(
        &self,
        owner: Uuid,
        title: &str,
        content: &str,
    ) -> Result<PostView, sqlx::Error>;
    /// All posts, newest first, owner and likers joined.
    async fn list_posts(&self) -> Result<Vec<PostView>, sqlx::Error>;
    async fn list_posts_by_owner(&self, owner: Uuid) -> Result<Vec<PostView>, sqlx::Error>;
    async fn get_post(&self, id: Uuid) -> Result<Option<PostView>, sqlx::Error>;
    /// Owner reference only; used for ownership checks without fetching the
    /// full joined view.
    async fn get_post_owner(&self, id: Uuid) -> Result<Option<Uuid>, sqlx::Error>;
    async fn update_post(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<PostView>, sqlx::Error>;
    /// Returns true if a row was removed.
    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// Atomic like-set toggle. Membership mutation happens in single
    /// statements against the composite primary key, never as an
    /// application-level read-modify-write. Returns the updated view, or
    /// None if the post is absent.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<PostView>, sqlx::Error>;

    // --- Contact ---
    async fn create_contact_message(&self, req: &ContactRequest) -> Result<(), sqlx::Error>;

    // --- Dashboard ---
    /// Filtered, sorted, paginated listing rows with derived like-counts.
    async fn search_posts(
        &self,
        search: &str,
        sort_by: SortBy,
        sort_order: SortOrder,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<DashboardRow>, sqlx::Error>;
    /// Count of posts matching the filter; empty filter counts all posts.
    async fn count_posts(&self, search: &str) -> Result<i64, sqlx::Error>;
    async fn total_likes(&self) -> Result<i64, sqlx::Error>;
    async fn distinct_author_count(&self) -> Result<i64, sqlx::Error>;
    async fn recent_posts(&self, limit: i64) -> Result<Vec<SpotlightRow>, sqlx::Error>;
    async fn top_liked_posts(&self, limit: i64) -> Result<Vec<SpotlightRow>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

/// Base SELECT for post views: post columns plus the owner's public fields.
const POST_SELECT: &str = "SELECT p.id, p.user_id, p.title, p.content, p.created_at, \
     u.name AS author_name, u.email AS author_email \
     FROM posts p JOIN users u ON p.user_id = u.id";

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches the likers' public fields to a batch of post rows.
    /// One bulk query over all post ids instead of a query per post.
    async fn attach_likes(&self, rows: Vec<PostRow>) -> Result<Vec<PostView>, sqlx::Error> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let mut likes_by_post: HashMap<Uuid, Vec<LikerInfo>> = HashMap::new();
        if !ids.is_empty() {
            let like_rows = sqlx::query_as::<_, LikeRow>(
                "SELECT l.post_id, u.id, u.name, u.email \
                 FROM post_likes l JOIN users u ON l.user_id = u.id \
                 WHERE l.post_id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            for like in like_rows {
                likes_by_post.entry(like.post_id).or_default().push(LikerInfo {
                    id: like.id,
                    name: like.name,
                    email: like.email,
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let likes = likes_by_post.remove(&row.id).unwrap_or_default();
                PostView {
                    id: row.id,
                    user_id: row.user_id,
                    title: row.title,
                    content: row.content,
                    date: row.created_at,
                    author: crate::models::AuthorInfo {
                        name: row.author_name,
                        email: row.author_email,
                    },
                    likes,
                }
            })
            .collect())
    }

    /// Appends the case-insensitive substring filter over title OR content.
    /// The pattern is always a bound parameter.
    fn push_search_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, search: &str) {
        if !search.is_empty() {
            let pattern = format!("%{}%", search);
            builder.push(" WHERE (p.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.content ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, is_admin, created_at) \
             VALUES ($1, $2, $3, $4, FALSE, NOW()) \
             RETURNING id, name, email, password_hash, is_admin, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }

    async fn title_exists(&self, title: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE title = $1)")
            .bind(title)
            .fetch_one(&self.pool)
            .await
    }

    async fn create_post(
        &self,
        owner: Uuid,
        title: &str,
        content: &str,
    ) -> Result<PostView, sqlx::Error> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO posts (id, user_id, title, content, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        self.get_post(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    async fn list_posts(&self) -> Result<Vec<PostView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} ORDER BY p.created_at DESC",
            POST_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_likes(rows).await
    }

    async fn list_posts_by_owner(&self, owner: Uuid) -> Result<Vec<PostView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} WHERE p.user_id = $1 ORDER BY p.created_at DESC",
            POST_SELECT
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        self.attach_likes(rows).await
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_likes(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn get_post_owner(&self, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_post(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<PostView>, sqlx::Error> {
        let updated = sqlx::query("UPDATE posts SET title = $2, content = $3 WHERE id = $1")
            .bind(id)
            .bind(title)
            .bind(content)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_post(id).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Ok(None);
        }

        // ON CONFLICT DO NOTHING makes the insert atomic against the
        // composite primary key; when the membership already exists the
        // statement affects zero rows and the toggle becomes a delete.
        // Two racing requests by the same user resolve to one insert and
        // one delete, each with exactly one outcome.
        let inserted = sqlx::query(
            "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected()
            > 0;

        if !inserted {
            sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        self.get_post(id).await
    }

    async fn create_contact_message(&self, req: &ContactRequest) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO contact_messages (id, name, email, subject, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW())",
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.subject)
        .bind(&req.message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Implements the dashboard listing with QueryBuilder for safe
    /// parameterization. The like-count is derived per row at query time;
    /// it is never stored redundantly.
    async fn search_posts(
        &self,
        search: &str,
        sort_by: SortBy,
        sort_order: SortOrder,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<DashboardRow>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "SELECT p.id, p.title, p.content, p.created_at, \
             (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count, \
             u.name AS author_name, u.email AS author_email \
             FROM posts p LEFT JOIN users u ON p.user_id = u.id",
        );

        Self::push_search_filter(&mut builder, search);

        builder.push(" ORDER BY ");
        builder.push(order_clause(sort_by, sort_order));
        builder.push(" OFFSET ");
        builder.push_bind(offset);
        builder.push(" LIMIT ");
        builder.push_bind(limit);

        builder
            .build_query_as::<DashboardRow>()
            .fetch_all(&self.pool)
            .await
    }

    async fn count_posts(&self, search: &str) -> Result<i64, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM posts p");

        Self::push_search_filter(&mut builder, search);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
    }

    async fn total_likes(&self) -> Result<i64, sqlx::Error> {
        // Every row is one like, so the sum of per-post counts is the row
        // count of the join table.
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_likes")
            .fetch_one(&self.pool)
            .await
    }

    async fn distinct_author_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT user_id) FROM posts")
            .fetch_one(&self.pool)
            .await
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<SpotlightRow>, sqlx::Error> {
        sqlx::query_as::<_, SpotlightRow>(
            "SELECT p.id, p.title, p.created_at, \
             (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count, \
             u.name AS author_name \
             FROM posts p LEFT JOIN users u ON p.user_id = u.id \
             ORDER BY p.created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn top_liked_posts(&self, limit: i64) -> Result<Vec<SpotlightRow>, sqlx::Error> {
        sqlx::query_as::<_, SpotlightRow>(
            "SELECT p.id, p.title, p.created_at, \
             (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count, \
             u.name AS author_name \
             FROM posts p LEFT JOIN users u ON p.user_id = u.id \
             ORDER BY likes_count DESC, p.created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
