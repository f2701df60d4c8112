pub use crate::posts::repo_types::Post;
use sqlx::PgPool;
use uuid::Uuid;

impl Post {
    /// All posts owned by a user, newest first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, user_id, created_at
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    /// Fetch scoped to the owner; a foreign post reads as absent.
    pub async fn find_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM posts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as(r#"SELECT 1 FROM posts WHERE id = $1"#)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.is_some())
    }

    /// Overwrite title and content, refreshing the timestamp. Returns `None`
    /// when the post is absent or owned by someone else.
    pub async fn update_owned(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        title: &str,
        content: &str,
    ) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $3, content = $4, created_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, content, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    /// Delete scoped to the owner; `false` when nothing matched.
    pub async fn delete_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM posts WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on title or content, scoped to the
    /// caller's posts.
    pub async fn search_by_user(
        db: &PgPool,
        user_id: Uuid,
        query: &str,
    ) -> anyhow::Result<Vec<Post>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM posts
            WHERE user_id = $1 AND (title ILIKE $2 OR content ILIKE $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
