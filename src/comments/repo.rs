pub use crate::comments::repo_types::Comment;
use sqlx::PgPool;
use uuid::Uuid;

impl Comment {
    pub async fn create(
        db: &PgPool,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> anyhow::Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, post_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, post_id, user_id, created_at
            "#,
        )
        .bind(content)
        .bind(post_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(comment)
    }

    /// All comments on a post, regardless of author, oldest first.
    pub async fn list_by_post(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, post_id, user_id, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Delete scoped to the author; `false` when nothing matched.
    pub async fn delete_authored(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM comments WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
