use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    errors::RequestResult,
    models::{BlogPost, PostFields},
    pagination::{Pagination, PAGE_SIZE},
};

const POST_COLUMNS: &str = "id, uploader_id, article_author, title, subtitle, date, edit_date, \
                            body, img_url, source_url";

pub async fn get_post(pool: &SqlitePool, id: i64) -> RequestResult<Option<BlogPost>> {
    let query = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1");
    let post = sqlx::query_as::<_, BlogPost>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(post)
}

pub async fn count_posts(pool: &SqlitePool) -> RequestResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Newest-first slice for one listing page.
pub async fn list_posts_page(
    pool: &SqlitePool,
    pagination: &Pagination,
) -> RequestResult<Vec<BlogPost>> {
    let query = format!(
        "SELECT {POST_COLUMNS} FROM blog_posts ORDER BY id DESC LIMIT $1 OFFSET $2"
    );
    let posts = sqlx::query_as::<_, BlogPost>(&query)
        .bind(PAGE_SIZE)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

/// Ids of the next newer and next older post, for prev/next links.
pub async fn neighbouring_post_ids(
    pool: &SqlitePool,
    id: i64,
) -> RequestResult<(Option<i64>, Option<i64>)> {
    let newer: Option<i64> =
        sqlx::query_scalar("SELECT id FROM blog_posts WHERE id > $1 ORDER BY id ASC LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let older: Option<i64> =
        sqlx::query_scalar("SELECT id FROM blog_posts WHERE id < $1 ORDER BY id DESC LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok((newer, older))
}

pub async fn insert_post(
    pool: &SqlitePool,
    uploader_id: i64,
    fields: &PostFields,
) -> RequestResult<BlogPost> {
    let query = format!(
        r#"
        INSERT INTO blog_posts (uploader_id, article_author, title, subtitle, date, body, img_url, source_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {POST_COLUMNS}
        "#
    );
    let mut tx = pool.begin().await?;
    let post = sqlx::query_as::<_, BlogPost>(&query)
        .bind(uploader_id)
        .bind(&fields.article_author)
        .bind(&fields.title)
        .bind(&fields.subtitle)
        .bind(Utc::now())
        .bind(&fields.body)
        .bind(&fields.img_url)
        .bind(&fields.source_url)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(post)
}

/// Overwrite every editable field and stamp `edit_date`.
pub async fn update_post(pool: &SqlitePool, id: i64, fields: &PostFields) -> RequestResult<bool> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"
        UPDATE blog_posts
        SET title = $1, subtitle = $2, article_author = $3, img_url = $4,
            body = $5, source_url = $6, edit_date = $7
        WHERE id = $8
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.subtitle)
    .bind(&fields.article_author)
    .bind(&fields.img_url)
    .bind(&fields.body)
    .bind(&fields.source_url)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete; comments and their likes cascade.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> RequestResult<bool> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
