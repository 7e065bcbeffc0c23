use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    authentication::random_token_hex,
    errors::RequestResult,
    models::{NewUser, User},
};

use super::{generate_unique, UniqueColumn};

const USER_COLUMNS: &str = "id, token, date_created, date_updated, email, password, username, \
                            first_name, last_name, birth_date";

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> RequestResult<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> RequestResult<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Insert a user with a freshly generated unique token and username.
///
/// A duplicate email surfaces as a UNIQUE violation
/// (see [`RequestError::is_unique_violation`](crate::errors::RequestError::is_unique_violation)).
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> RequestResult<User> {
    let token = generate_unique(pool, UniqueColumn::Token, random_token_hex).await?;
    let username = generate_unique(pool, UniqueColumn::Username, random_token_hex).await?;

    let query = format!(
        r#"
        INSERT INTO users (token, date_created, email, password, username, first_name, last_name, birth_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {USER_COLUMNS}
        "#
    );
    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<_, User>(&query)
        .bind(token)
        .bind(Utc::now())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.birth_date)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(user)
}

/// Store a new password hash and rotate the user's token, which invalidates
/// every outstanding session and remember cookie.
pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> RequestResult<String> {
    let token = generate_unique(pool, UniqueColumn::Token, random_token_hex).await?;
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE users SET password = $1, token = $2, date_updated = $3 WHERE id = $4
        "#,
    )
    .bind(password_hash)
    .bind(&token)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(token)
}

pub async fn update_username(pool: &SqlitePool, id: i64, username: &str) -> RequestResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE users SET username = $1, date_updated = $2 WHERE id = $3")
        .bind(username)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Posts, comments and likes owned by the user go with it.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> RequestResult<bool> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
