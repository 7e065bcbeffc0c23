use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    errors::RequestResult,
    models::{Comment, CommentView},
};

const COMMENT_COLUMNS: &str = "id, text, date_created, date_edited, author_id, post_id";

/// `text` must already be sanitized.
pub async fn insert_comment(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    text: &str,
) -> RequestResult<Comment> {
    let query = format!(
        r#"
        INSERT INTO comments (text, date_created, author_id, post_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let mut tx = pool.begin().await?;
    let comment = sqlx::query_as::<_, Comment>(&query)
        .bind(text)
        .bind(Utc::now())
        .bind(author_id)
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn get_comment(pool: &SqlitePool, id: i64) -> RequestResult<Option<Comment>> {
    let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
    let comment = sqlx::query_as::<_, Comment>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(comment)
}

/// Oldest first, with author names and like counts.
pub async fn get_comments_for_post(
    pool: &SqlitePool,
    post_id: i64,
) -> RequestResult<Vec<CommentView>> {
    let comments = sqlx::query_as::<_, CommentView>(
        r#"
        SELECT comments.id,
               comments.text,
               comments.date_created,
               comments.author_id,
               users.username   AS author_username,
               users.first_name AS author_first_name,
               users.last_name  AS author_last_name,
               (SELECT COUNT(*) FROM likes WHERE likes.comment_id = comments.id) AS likes
        FROM comments
        JOIN users ON users.id = comments.author_id
        WHERE comments.post_id = $1
        ORDER BY comments.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

pub async fn delete_comment(pool: &SqlitePool, id: i64) -> RequestResult<bool> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
