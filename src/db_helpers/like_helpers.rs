use sqlx::SqlitePool;

use crate::errors::RequestResult;

/// Like the comment, or remove an existing like. Returns whether the user
/// likes the comment afterwards.
pub async fn toggle_like(pool: &SqlitePool, user_id: i64, comment_id: i64) -> RequestResult<bool> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query("DELETE FROM likes WHERE comment_id = $1 AND user_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if removed == 0 {
        sqlx::query("INSERT INTO likes (comment_id, user_id) VALUES ($1, $2)")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(removed == 0)
}
