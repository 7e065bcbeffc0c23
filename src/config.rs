//! Application configuration loaded from environment variables.

use anyhow::Context;

/// Runtime configuration for the blog server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (e.g. "127.0.0.1:5000").
    pub bind_addr: String,

    /// sqlx SQLite connection string.
    pub database_url: String,

    /// Key used to sign session and remember-me cookies.
    pub secret_key: String,

    /// Id of the single administrator account.
    pub admin_user_id: i64,

    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,

    /// Restrict post edit/delete to the uploader (or the admin).
    pub enforce_ownership: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SECRET_KEY`
    ///
    /// Optional:
    /// - `DATABASE_URL` (default: "sqlite://posts.db?mode=rwc")
    /// - `BIND_ADDR` (default: "127.0.0.1:5000")
    /// - `ADMIN_USER_ID` (default: 1)
    /// - `COOKIE_SECURE` (default: false)
    /// - `ENFORCE_OWNERSHIP` (default: false)
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://posts.db?mode=rwc".to_string());

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        let admin_user_id = match std::env::var("ADMIN_USER_ID") {
            Ok(value) => value
                .trim()
                .parse()
                .context("ADMIN_USER_ID must be an integer")?,
            Err(_) => 1,
        };

        let cookie_secure = env_flag("COOKIE_SECURE");
        let enforce_ownership = env_flag("ENFORCE_OWNERSHIP");

        tracing::info!(
            bind_addr = %bind_addr,
            database_url = %database_url,
            admin_user_id,
            cookie_secure,
            enforce_ownership,
            "blog configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            secret_key,
            admin_user_id,
            cookie_secure,
            enforce_ownership,
        })
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("ON"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("nope"));
    }
}
