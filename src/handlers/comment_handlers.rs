use axum::extract::{Path, State};

use crate::{
    access::{FreshLogin, Guard, LoggedIn},
    context::redirect,
    db_helpers::{delete_comment as delete_comment_in_db, get_comment, toggle_like},
    errors::RequestError,
    AppState,
};

use super::HandlerResult;

/// Only the comment's author or the admin may delete it.
pub async fn delete_comment(
    State(state): State<AppState>,
    Guard(ctx, _): Guard<FreshLogin>,
    Path(id): Path<i64>,
) -> HandlerResult {
    let Some(comment) = get_comment(&state.pool, id).await? else {
        return Ok(ctx.finish(redirect("/")));
    };

    let user_id = ctx.user_id();
    if user_id != Some(comment.author_id) && user_id != Some(state.config.admin_user_id) {
        tracing::warn!(comment_id = id, ?user_id, "comment deletion refused");
        return Err(RequestError::Forbidden);
    }

    delete_comment_in_db(&state.pool, id).await?;
    tracing::info!(comment_id = id, post_id = comment.post_id, ?user_id, "comment deleted");
    Ok(ctx.finish(redirect(&format!("/post/{}", comment.post_id))))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Guard(ctx, _): Guard<LoggedIn>,
    Path(id): Path<i64>,
) -> HandlerResult {
    let (Some(comment), Some(user_id)) = (get_comment(&state.pool, id).await?, ctx.user_id())
    else {
        return Ok(ctx.finish(redirect("/")));
    };

    let liked = toggle_like(&state.pool, user_id, id).await?;
    tracing::debug!(comment_id = id, user_id, liked, "like toggled");
    Ok(ctx.finish(redirect(&format!("/post/{}", comment.post_id))))
}
