mod common;

use common::{location, TestApp, PASSWORD};
use reqwest::StatusCode;

async fn app_with_post() -> (TestApp, common::TestClient) {
    let app = TestApp::spawn().await;
    let admin = app.signed_up("admin@example.com").await;
    admin.create_post("Commented", "<p>talk about it</p>").await;
    (app, admin)
}

#[tokio::test]
async fn anonymous_comment_goes_through_login_and_back() {
    let (app, _) = app_with_post().await;
    let client = app.client();

    let response = client.post_form("/post/1", &[("text", "hello")]).await;
    assert_eq!(location(&response), "/login?next=%2Fpost%2F1");
    assert_eq!(app.count("comments").await, 0);

    let login_page = client.get_text("/login?next=%2Fpost%2F1").await;
    assert!(login_page.contains("Log in to post comment"));
    assert!(login_page.contains("value=\"/post/1\""));

    let response = client
        .post_form(
            "/login",
            &[
                ("email", "admin@example.com"),
                ("password", PASSWORD),
                ("next", "/post/1"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/post/1");
}

#[tokio::test]
async fn comments_are_sanitized_and_shown() {
    let (app, admin) = app_with_post().await;

    let response = admin
        .post_form(
            "/post/1",
            &[("text", "<b>nice</b><img src=x onerror=alert(1)><script>x()</script>")],
        )
        .await;
    assert_eq!(location(&response), "/post/1");

    let page = admin.get_text("/post/1").await;
    assert!(page.contains("<b>nice</b>"));
    assert!(!page.contains("onerror"));
    assert!(!page.contains("x()"));
    assert!(page.contains("Ada Lovelace"));
    assert_eq!(app.count("comments").await, 1);
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let (app, admin) = app_with_post().await;

    let response = admin.post_form("/post/1", &[("text", "   ")]).await;
    assert_eq!(location(&response), "/post/1");
    assert!(admin.get_text("/post/1").await.contains("Comment is required"));
    assert_eq!(app.count("comments").await, 0);
}

#[tokio::test]
async fn likes_toggle() {
    let (app, admin) = app_with_post().await;
    admin.post_form("/post/1", &[("text", "like me")]).await;
    let reader = app.signed_up("reader@example.com").await;

    assert_eq!(location(&reader.get("/like-comment/1").await), "/post/1");
    assert!(reader.get_text("/post/1").await.contains("1 likes"));

    admin.get("/like-comment/1").await;
    assert!(reader.get_text("/post/1").await.contains("2 likes"));

    reader.get("/like-comment/1").await;
    assert!(reader.get_text("/post/1").await.contains("1 likes"));
    assert_eq!(app.count("likes").await, 1);
}

#[tokio::test]
async fn liking_needs_a_login() {
    let (app, admin) = app_with_post().await;
    admin.post_form("/post/1", &[("text", "like me")]).await;

    let response = app.client().get("/like-comment/1").await;
    assert_eq!(location(&response), "/login?next=%2Flike-comment%2F1");
    assert_eq!(app.count("likes").await, 0);
}

#[tokio::test]
async fn only_author_or_admin_deletes_comments() {
    let (app, admin) = app_with_post().await;
    let author = app.signed_up("author@example.com").await;
    let other = app.signed_up("other@example.com").await;
    author.post_form("/post/1", &[("text", "first")]).await;
    author.post_form("/post/1", &[("text", "second")]).await;

    assert_eq!(other.get("/delete-comment/1").await.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.count("comments").await, 2);

    assert_eq!(location(&author.get("/delete-comment/1").await), "/post/1");
    assert_eq!(location(&admin.get("/delete-comment/2").await), "/post/1");
    assert_eq!(app.count("comments").await, 0);

    assert_eq!(location(&admin.get("/delete-comment/2").await), "/");
}

#[tokio::test]
async fn delete_link_shown_to_author_and_admin() {
    let (app, admin) = app_with_post().await;
    let author = app.signed_up("author@example.com").await;
    let other = app.signed_up("other@example.com").await;
    author.post_form("/post/1", &[("text", "mine")]).await;

    let delete_link = "href=\"/delete-comment/1\"";
    assert!(author.get_text("/post/1").await.contains(delete_link));
    assert!(admin.get_text("/post/1").await.contains(delete_link));
    assert!(!other.get_text("/post/1").await.contains(delete_link));
    assert!(!app.client().get_text("/post/1").await.contains(delete_link));
}

#[tokio::test]
async fn comment_on_missing_post_redirects_home() {
    let (app, admin) = app_with_post().await;

    let response = admin.post_form("/post/42", &[("text", "hello?")]).await;
    assert_eq!(location(&response), "/");
    assert_eq!(app.count("comments").await, 0);
}
