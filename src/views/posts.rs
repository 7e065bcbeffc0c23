use maud::{html, Markup, PreEscaped};

use crate::data_formats::PostForm;
use crate::models::{BlogPost, CommentView};
use crate::pagination::Pagination;

use super::{format_date, page_shell, Chrome};

pub fn index_page(chrome: &Chrome, posts: &[BlogPost], pagination: &Pagination) -> Markup {
    page_shell(
        "Home",
        chrome,
        html! {
            h1 { "Latest Posts" }
            @if posts.is_empty() {
                p { "No posts yet." }
            }
            @for post in posts {
                article class="post-preview" {
                    h2 { a href={ "/post/" (post.id) } { (post.title) } }
                    @if let Some(subtitle) = &post.subtitle {
                        h3 { (subtitle) }
                    }
                    p class="meta" { "Posted by " (post.article_author) " on " (format_date(&post.date)) }
                }
            }
            nav class="pager" {
                @if let Some(previous) = pagination.previous() {
                    a href={ "/posts/" (previous) } { "← Newer Posts" } " "
                }
                span { "Page " (pagination.current + 1) " of " (pagination.page_count().max(1)) }
                @if let Some(next) = pagination.next() {
                    " " a href={ "/posts/" (next) } { "Older Posts →" }
                }
            }
        },
    )
}

pub struct PostPage<'a> {
    pub post: &'a BlogPost,
    pub comments: &'a [CommentView],
    pub viewer_id: Option<i64>,
    pub viewer_is_admin: bool,
    pub newer: Option<i64>,
    pub older: Option<i64>,
}

pub fn post_page(chrome: &Chrome, page: &PostPage<'_>) -> Markup {
    let post = page.post;
    page_shell(
        &post.title,
        chrome,
        html! {
            header {
                img class="hero" src=(post.img_url) alt="";
                h1 { (post.title) }
                @if let Some(subtitle) = &post.subtitle {
                    h2 { (subtitle) }
                }
                p class="meta" {
                    "Posted by " (post.article_author) " on " (format_date(&post.date))
                    @if let Some(edited) = &post.edit_date {
                        " (edited " (format_date(edited)) ")"
                    }
                }
            }
            article { (PreEscaped(&post.body)) }
            @if let Some(source) = &post.source_url {
                p { "Source: " a href=(source) { (source) } }
            }
            @if page.viewer_id.is_some() {
                p {
                    a href={ "/edit-post/" (post.id) } { "Edit Post" } " "
                    a href={ "/delete-post/" (post.id) } { "Delete Post" }
                }
            }
            nav class="pager" {
                @if let Some(newer) = page.newer {
                    a href={ "/post/" (newer) } { "← Newer" } " "
                }
                @if let Some(older) = page.older {
                    a href={ "/post/" (older) } { "Older →" }
                }
            }
            section class="comments" {
                h2 { "Comments" }
                @for comment in page.comments {
                    div class="comment" {
                        (PreEscaped(&comment.text))
                        p class="meta" {
                            (comment.author_name()) " · " (format_date(&comment.date_created))
                            " · " (comment.likes) " likes"
                            @if page.viewer_id.is_some() {
                                " " a href={ "/like-comment/" (comment.id) } { "Like" }
                            }
                            @if page.viewer_is_admin || page.viewer_id == Some(comment.author_id) {
                                " " a href={ "/delete-comment/" (comment.id) } { "Delete" }
                            }
                        }
                    }
                }
                form method="post" action={ "/post/" (post.id) } {
                    label { "Comment" textarea name="text" required {} }
                    button type="submit" { "Submit" }
                }
            }
        },
    )
}

/// Shared by the new-post and edit-post pages.
pub fn post_editor_page(chrome: &Chrome, heading: &str, action: &str, form: &PostForm) -> Markup {
    page_shell(
        heading,
        chrome,
        html! {
            h1 { (heading) }
            form method="post" action=(action) {
                label { "Post Title" input type="text" name="blog_title" value=(form.blog_title) required autofocus; }
                label { "Subtitle (Optional)" input type="text" name="blog_subtitle" value=(form.blog_subtitle.as_deref().unwrap_or_default()); }
                label { "Author" input type="text" name="blog_author" value=(form.blog_author) required; }
                label { "Blog Image Url" input type="url" name="blog_img_url" value=(form.blog_img_url) required; }
                label { "Source Link (Optional)" input type="url" name="source_link" value=(form.source_link.as_deref().unwrap_or_default()); }
                label { "Body" textarea name="blog_content" required { (form.blog_content) } }
                button type="submit" { "Submit Post" }
            }
        },
    )
}
