#![allow(dead_code)]

use std::sync::Arc;

use blog::{config::Config, init_db, serve, AppState};
use reqwest::{
    cookie::{CookieStore, Jar},
    header::LOCATION,
    redirect::Policy,
    Response, StatusCode, Url,
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    _db_dir: TempDir,
}

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        database_url: String::new(),
        secret_key: "integration-test-secret".to_string(),
        admin_user_id: 1,
        cookie_secure: false,
        enforce_ownership: false,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Start a server on a random port backed by a fresh database file.
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let db_dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.database_url = format!("sqlite://{}", db_dir.path().join("blog.db").display());
        configure(&mut config);

        let pool = init_db(&config.database_url).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(listener, AppState::new(pool.clone(), config)));

        TestApp {
            address,
            pool,
            _db_dir: db_dir,
        }
    }

    /// A browser with its own cookie jar that does not follow redirects.
    pub fn client(&self) -> TestClient {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .redirect(Policy::none())
            .build()
            .unwrap();
        TestClient {
            http,
            jar,
            base: Url::parse(&self.address).unwrap(),
        }
    }

    /// Sign up a new user in a fresh client; the client is left logged in.
    pub async fn signed_up(&self, email: &str) -> TestClient {
        let client = self.client();
        let response = client.signup(email, "ada", "lovelace").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        client
    }

    pub async fn user_id(&self, email: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub struct TestClient {
    pub http: reqwest::Client,
    pub jar: Arc<Jar>,
    base: Url,
}

impl TestClient {
    pub async fn get(&self, path: &str) -> Response {
        self.http
            .get(self.base.join(path).unwrap())
            .send()
            .await
            .unwrap()
    }

    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.http
            .post(self.base.join(path).unwrap())
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn signup(&self, email: &str, first_name: &str, last_name: &str) -> Response {
        self.post_form(
            "/signup",
            &[
                ("email", email),
                ("password", PASSWORD),
                ("first_name", first_name),
                ("last_name", last_name),
                ("birth_date", "1990-01-02"),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    pub async fn create_post(&self, title: &str, body: &str) -> Response {
        self.post_form(
            "/new-post",
            &[
                ("blog_title", title),
                ("blog_subtitle", ""),
                ("blog_author", "Ada Lovelace"),
                ("blog_img_url", "https://example.com/cover.png"),
                ("source_link", ""),
                ("blog_content", body),
            ],
        )
        .await
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        header
            .to_str()
            .ok()?
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    pub fn set_cookie(&self, name: &str, value: &str) {
        self.jar
            .add_cookie_str(&format!("{name}={value}; Path=/"), &self.base);
    }
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .expect("redirect without Location")
        .to_str()
        .unwrap()
        .to_string()
}
