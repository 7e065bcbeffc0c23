use axum::{
    extract::{Path, State},
    Form,
};
use validator::Validate;

use crate::{
    access::{Anyone, FreshLogin, Guard},
    context::{login_url, redirect, RequestContext},
    data_formats::{error_messages, CommentForm, PostForm},
    db_helpers::{
        count_posts, delete_post as delete_post_in_db, get_comments_for_post, get_post,
        insert_comment, insert_post, list_posts_page, neighbouring_post_ids, update_post,
    },
    errors::RequestError,
    models::BlogPost,
    pagination::Pagination,
    views::{self, PostPage},
    AppState,
};

use super::{render, HandlerResult};

pub async fn index(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
) -> HandlerResult {
    ctx.visit("/");
    list_page(&state, ctx, 0).await
}

pub async fn posts_page(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
    Path(page): Path<i64>,
) -> HandlerResult {
    ctx.visit(format!("/posts/{page}"));
    list_page(&state, ctx, page).await
}

async fn list_page(state: &AppState, ctx: RequestContext, page: i64) -> HandlerResult {
    let pagination = Pagination::new(count_posts(&state.pool).await?, page);
    if !pagination.is_valid_page() {
        return Ok(ctx.finish(redirect("/")));
    }
    let posts = list_posts_page(&state.pool, &pagination).await?;
    Ok(render(ctx, |chrome| {
        views::index_page(chrome, &posts, &pagination)
    }))
}

pub async fn show_post(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
    Path(id): Path<i64>,
) -> HandlerResult {
    ctx.visit(format!("/post/{id}"));
    let Some(post) = get_post(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };
    post_response(&state, ctx, &post).await
}

pub async fn add_comment(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> HandlerResult {
    let post_url = format!("/post/{id}");
    ctx.visit(post_url.clone());
    let Some(post) = get_post(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };

    let Some(author_id) = ctx.user_id() else {
        ctx.flash("Log in to post comment");
        return Ok(ctx.finish(redirect(&login_url(&post_url))));
    };

    if let Err(errors) = form.validate() {
        for message in error_messages(&errors) {
            ctx.flash(message);
        }
        return Ok(ctx.finish(redirect(&post_url)));
    }

    let comment = insert_comment(&state.pool, author_id, post.id, &form.sanitized_text()).await?;
    tracing::info!(comment_id = comment.id, post_id = post.id, author_id, "comment added");
    Ok(ctx.finish(redirect(&post_url)))
}

async fn post_response(state: &AppState, ctx: RequestContext, post: &BlogPost) -> HandlerResult {
    let comments = get_comments_for_post(&state.pool, post.id).await?;
    let (newer, older) = neighbouring_post_ids(&state.pool, post.id).await?;
    let page = PostPage {
        post,
        comments: &comments,
        viewer_id: ctx.user_id(),
        viewer_is_admin: ctx.user_id() == Some(state.config.admin_user_id),
        newer,
        older,
    };
    Ok(render(ctx, |chrome| views::post_page(chrome, &page)))
}

pub async fn new_post_page(Guard(ctx, _): Guard<FreshLogin>) -> HandlerResult {
    Ok(render(ctx, |chrome| {
        views::post_editor_page(chrome, "New Post", "/new-post", &PostForm::default())
    }))
}

pub async fn new_post(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<FreshLogin>,
    Form(form): Form<PostForm>,
) -> HandlerResult {
    let Some(uploader_id) = ctx.user_id() else {
        return Ok(ctx.finish(redirect("/login")));
    };
    if let Err(errors) = form.validate() {
        for message in error_messages(&errors) {
            ctx.flash(message);
        }
        return Ok(render(ctx, |chrome| {
            views::post_editor_page(chrome, "New Post", "/new-post", &form)
        }));
    }

    let post = insert_post(&state.pool, uploader_id, &form.into_fields()).await?;
    tracing::info!(post_id = post.id, uploader_id, "post created");
    Ok(ctx.finish(redirect("/")))
}

pub async fn edit_post_page(
    State(state): State<AppState>,
    Guard(ctx, _): Guard<FreshLogin>,
    Path(id): Path<i64>,
) -> HandlerResult {
    let Some(post) = get_post(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };
    ensure_may_modify(&state, &ctx, &post)?;

    let action = format!("/edit-post/{id}");
    let form = PostForm::from_post(&post);
    Ok(render(ctx, |chrome| {
        views::post_editor_page(chrome, "Edit Post", &action, &form)
    }))
}

pub async fn edit_post(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<FreshLogin>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> HandlerResult {
    let Some(post) = get_post(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };
    ensure_may_modify(&state, &ctx, &post)?;

    if let Err(errors) = form.validate() {
        for message in error_messages(&errors) {
            ctx.flash(message);
        }
        let action = format!("/edit-post/{id}");
        return Ok(render(ctx, |chrome| {
            views::post_editor_page(chrome, "Edit Post", &action, &form)
        }));
    }

    update_post(&state.pool, id, &form.into_fields()).await?;
    tracing::info!(post_id = id, editor_id = ?ctx.user_id(), "post edited");
    Ok(ctx.finish(redirect(&format!("/post/{id}"))))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Guard(ctx, _): Guard<FreshLogin>,
    Path(id): Path<i64>,
) -> HandlerResult {
    let Some(post) = get_post(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };
    ensure_may_modify(&state, &ctx, &post)?;

    delete_post_in_db(&state.pool, id).await?;
    tracing::info!(post_id = id, user_id = ?ctx.user_id(), "post deleted");
    Ok(ctx.finish(redirect("/")))
}

/// Any logged-in user may change any post unless ownership is enforced, in
/// which case only the uploader and the admin may.
fn ensure_may_modify(
    state: &AppState,
    ctx: &RequestContext,
    post: &BlogPost,
) -> Result<(), RequestError> {
    if !state.config.enforce_ownership {
        return Ok(());
    }
    match ctx.user_id() {
        Some(id) if id == post.uploader_id || id == state.config.admin_user_id => Ok(()),
        user_id => {
            tracing::warn!(post_id = post.id, ?user_id, "post modification refused");
            Err(RequestError::Forbidden)
        }
    }
}
