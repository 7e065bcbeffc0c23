use sqlx::SqlitePool;

use crate::errors::{RequestError, RequestResult};

mod comment_helpers;
mod like_helpers;
mod post_helpers;
mod user_helpers;

pub use comment_helpers::*;
pub use like_helpers::*;
pub use post_helpers::*;
pub use user_helpers::*;

/// Upper bound on candidates tried by [`generate_unique`].
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// `users` columns that hold generated unique values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    Token,
    Username,
}

impl UniqueColumn {
    fn as_str(self) -> &'static str {
        match self {
            UniqueColumn::Token => "token",
            UniqueColumn::Username => "username",
        }
    }
}

// ----------------- Helper Functions -----------------

pub async fn value_exists(
    pool: &SqlitePool,
    column: UniqueColumn,
    value: &str,
) -> RequestResult<bool> {
    // column comes from a closed enum, never from input
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1)",
        column.as_str()
    );
    let exists: i64 = sqlx::query_scalar(&query)
        .bind(value)
        .fetch_one(pool)
        .await?;
    Ok(exists != 0)
}

/// Draw candidates from `next` until one is unused in `column`.
pub async fn generate_unique<F>(
    pool: &SqlitePool,
    column: UniqueColumn,
    mut next: F,
) -> RequestResult<String>
where
    F: FnMut() -> String,
{
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let candidate = next();
        if !value_exists(pool, column, &candidate).await? {
            return Ok(candidate);
        }
        tracing::warn!(column = column.as_str(), attempt, "generated value collided");
    }
    Err(RequestError::GenerationExhausted(column.as_str()))
}

// ----------------- End Helper Functions -----------------
