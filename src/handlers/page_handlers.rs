use axum::Form;

use crate::{
    access::{Admin, Anyone, Guard, LoggedIn},
    context::redirect,
    data_formats::ContactForm,
    views,
};

use super::{render, HandlerResult};

pub async fn about(Guard(mut ctx, _): Guard<Anyone>) -> HandlerResult {
    ctx.visit("/aboutme");
    Ok(render(ctx, views::about_page))
}

pub async fn contact(Guard(mut ctx, _): Guard<LoggedIn>) -> HandlerResult {
    ctx.visit("/contact");
    Ok(render(ctx, |chrome| views::contact_page(chrome, "Contact Me")))
}

pub async fn form_entry_page(Guard(mut ctx, _): Guard<LoggedIn>) -> HandlerResult {
    ctx.visit("/form-entry");
    Ok(ctx.finish(redirect("/contact")))
}

/// Messages are only logged; nothing is stored or mailed.
pub async fn form_entry(
    Guard(mut ctx, _): Guard<LoggedIn>,
    Form(form): Form<ContactForm>,
) -> HandlerResult {
    ctx.visit("/form-entry");
    if let Some(user) = ctx.user() {
        tracing::info!(
            name = %user.full_name(),
            email = %user.email,
            phone = form.phone_number.as_deref().unwrap_or("-"),
            message = %form.message,
            "contact message received"
        );
    }
    Ok(render(ctx, |chrome| {
        views::contact_page(chrome, "Your message is sent.")
    }))
}

pub async fn secrets(Guard(ctx, _): Guard<Admin>) -> HandlerResult {
    Ok(ctx.finish("Welcome to Secrets"))
}

