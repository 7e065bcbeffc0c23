pub mod access;
pub mod authentication;
pub mod config;
pub mod context;
pub mod data_formats;
pub mod db_helpers;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod sanitize;
pub mod views;

use std::{str::FromStr, sync::Arc};

use anyhow::Context;
pub use anyhow::Result;
use axum::{routing::*, Router};
use handlers::*;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use authentication::CookieKeys;
use config::Config;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub keys: CookieKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            keys: CookieKeys::new(&config.secret_key),
            config: Arc::new(config),
        }
    }
}

pub async fn run_app(config: Config) -> Result<()> {
    let pool = init_db(&config.database_url).await?;
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    serve(listener, AppState::new(pool, config)).await
}

/// Serve on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "server started");
    axum::serve(listener, make_router(state)).await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("failed to create database {db_url}"))?;
    } else {
        tracing::debug!(db_url, "database already exists");
    }

    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn make_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(alive))
        .route("/posts/{page}", get(posts_page).post(posts_page))
        .route("/post/{id}", get(show_post).post(add_comment))
        .route("/new-post", get(new_post_page).post(new_post))
        .route("/edit-post/{id}", get(edit_post_page).post(edit_post))
        .route("/delete-post/{id}", get(delete_post))
        .route("/delete-comment/{id}", get(delete_comment))
        .route("/like-comment/{id}", get(like_comment))
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        .route("/new-password", get(new_password_page).post(new_password))
        .route(
            "/new-username/{username}",
            get(change_username).post(change_username),
        )
        .route("/delete-account", get(delete_account))
        .route("/aboutme", get(about))
        .route("/contact", get(contact))
        .route("/form-entry", get(form_entry_page).post(form_entry))
        .route("/secrets", get(secrets))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
