use axum::{
    extract::{Path, Query, State},
    Form,
};
use validator::Validate;

use crate::{
    access::{Anyone, FreshLogin, Guard, LoggedIn},
    authentication::{hash_password_argon2, verify_password_argon2},
    context::{redirect, safe_redirect_target},
    data_formats::{error_messages, ChangePasswordForm, LoginForm, NextQuery, SignupForm},
    db_helpers::{delete_user, get_user_by_email, insert_user, update_password, update_username},
    models::NewUser,
    views, AppState,
};

use super::{render, HandlerResult};

pub async fn signup_page(Guard(ctx, _): Guard<Anyone>) -> HandlerResult {
    if ctx.is_authenticated() {
        return Ok(ctx.finish(redirect("/")));
    }
    Ok(render(ctx, |chrome| {
        views::signup_page(chrome, &SignupForm::default())
    }))
}

pub async fn signup(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
    Form(form): Form<SignupForm>,
) -> HandlerResult {
    if ctx.is_authenticated() {
        return Ok(ctx.finish(redirect("/")));
    }

    let validation = form.validate();
    let (Ok(()), Some(birth_date)) = (&validation, form.birth_date()) else {
        ctx.flash("Incomplete Entry");
        if let Err(errors) = &validation {
            for message in error_messages(errors) {
                ctx.flash(message);
            }
        }
        return Ok(render(ctx, |chrome| views::signup_page(chrome, &form)));
    };

    if get_user_by_email(&state.pool, &form.email).await?.is_some() {
        ctx.flash("Email already exists");
        return Ok(ctx.finish(redirect("/login")));
    }

    let new_user = NewUser {
        email: form.email.clone(),
        password_hash: hash_password_argon2(form.password()).await?,
        first_name: form.first_name(),
        last_name: form.last_name(),
        birth_date,
    };
    let user = match insert_user(&state.pool, &new_user).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation() => {
            ctx.flash("Email already exists");
            return Ok(ctx.finish(redirect("/login")));
        }
        Err(e) => return Err(e),
    };

    tracing::info!(user_id = user.id, "user registered");
    ctx.login(user);
    Ok(ctx.finish(redirect("/")))
}

pub async fn login_page(
    Guard(ctx, _): Guard<Anyone>,
    Query(query): Query<NextQuery>,
) -> HandlerResult {
    if ctx.is_fresh() {
        return Ok(ctx.finish(redirect("/")));
    }
    let next = query.next.as_deref().and_then(safe_redirect_target);
    Ok(render(ctx, |chrome| views::login_page(chrome, "", next)))
}

pub async fn login(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<Anyone>,
    Form(form): Form<LoginForm>,
) -> HandlerResult {
    if ctx.is_fresh() {
        return Ok(ctx.finish(redirect("/")));
    }
    let next = form.next.as_deref().and_then(safe_redirect_target);

    if let Err(errors) = form.validate() {
        for message in error_messages(&errors) {
            ctx.flash(message);
        }
        return Ok(render(ctx, |chrome| {
            views::login_page(chrome, &form.email, next)
        }));
    }

    let Some(user) = get_user_by_email(&state.pool, &form.email).await? else {
        ctx.flash("Email not found, create an account to log in.");
        return Ok(ctx.finish(redirect("/signup")));
    };

    let password = form.password.trim().to_string();
    if !verify_password_argon2(password, user.password.clone()).await? {
        tracing::info!(user_id = user.id, "failed login");
        ctx.flash("Invalid Username or Password");
        return Ok(render(ctx, |chrome| {
            views::login_page(chrome, &form.email, next)
        }));
    }

    let target = next
        .or_else(|| ctx.last_url().and_then(safe_redirect_target))
        .unwrap_or("/")
        .to_string();
    tracing::info!(user_id = user.id, "user logged in");
    ctx.login(user);
    Ok(ctx.finish(redirect(&target)))
}

pub async fn logout(Guard(mut ctx, _): Guard<LoggedIn>) -> HandlerResult {
    let target = ctx
        .last_url()
        .and_then(safe_redirect_target)
        .unwrap_or("/")
        .to_string();
    ctx.logout();
    Ok(ctx.finish(redirect(&target)))
}

pub async fn new_password_page(Guard(mut ctx, _): Guard<FreshLogin>) -> HandlerResult {
    ctx.visit("/new-password");
    Ok(render(ctx, views::new_password_page))
}

pub async fn new_password(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<FreshLogin>,
    Form(form): Form<ChangePasswordForm>,
) -> HandlerResult {
    ctx.visit("/new-password");
    if let Err(errors) = form.validate() {
        for message in error_messages(&errors) {
            ctx.flash(message);
        }
        return Ok(render(ctx, views::new_password_page));
    }

    let Some(user) = ctx.user().cloned() else {
        return Ok(ctx.finish(redirect("/login")));
    };
    let current_password = form.current_password.trim().to_string();
    if !verify_password_argon2(current_password, user.password).await? {
        ctx.flash("Incorrect Current Password");
        return Ok(render(ctx, views::new_password_page));
    }

    let password_hash = hash_password_argon2(form.new_password.trim().to_string()).await?;
    let token = update_password(&state.pool, user.id, &password_hash).await?;
    tracing::info!(user_id = user.id, "password changed");
    ctx.rotate_token(token);
    Ok(ctx.finish(redirect("/")))
}

pub async fn change_username(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<FreshLogin>,
    Path(username): Path<String>,
) -> HandlerResult {
    let username = username.trim();
    let Some(user_id) = ctx.user_id() else {
        return Ok(ctx.finish(redirect("/login")));
    };
    if username.is_empty() {
        ctx.flash("Username cannot be blank");
        return Ok(ctx.finish(redirect("/")));
    }

    match update_username(&state.pool, user_id, username).await {
        Ok(()) => tracing::info!(user_id, "username changed"),
        Err(e) if e.is_unique_violation() => ctx.flash("Username already taken"),
        Err(e) => return Err(e),
    }
    Ok(ctx.finish(redirect("/")))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Guard(mut ctx, _): Guard<FreshLogin>,
) -> HandlerResult {
    if let Some(user_id) = ctx.user_id() {
        delete_user(&state.pool, user_id).await?;
        tracing::info!(user_id, "account deleted");
    }
    ctx.logout();
    ctx.flash("Your account has been deleted.");
    Ok(ctx.finish(redirect("/")))
}
