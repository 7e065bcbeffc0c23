use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub token: String,
    pub date_created: DateTime<Utc>,
    pub date_updated: Option<DateTime<Utc>>,
    pub email: String,
    /// argon2 PHC string, never the plaintext.
    pub password: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub uploader_id: i64,
    pub article_author: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub date: DateTime<Utc>,
    pub edit_date: Option<DateTime<Utc>>,
    /// Sanitized HTML.
    pub body: String,
    pub img_url: String,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    /// Sanitized HTML.
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub date_edited: Option<DateTime<Utc>>,
    pub author_id: i64,
    pub post_id: i64,
}

/// A comment joined with its author and like count, as shown under a post.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub likes: i64,
}

impl CommentView {
    pub fn author_name(&self) -> String {
        format!("{} {}", self.author_first_name, self.author_last_name)
    }
}

/// Everything a new `users` row needs; `token` and `username` are generated.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

/// Editable fields of a post. `body` must already be sanitized.
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub subtitle: Option<String>,
    pub article_author: String,
    pub img_url: String,
    pub source_url: Option<String>,
    pub body: String,
}
