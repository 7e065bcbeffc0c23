//! Authorization requirements checked before a handler runs.
//!
//! Each requirement is a marker type; `Guard<R>` builds the
//! [`RequestContext`] and rejects the request unless `R` is satisfied:
//!
//! ```ignore
//! async fn new_post(Guard(ctx, _): Guard<FreshLogin>) -> Response { ... }
//! ```

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::config::Config;
use crate::context::{login_url, redirect, RequestContext};
use crate::errors::RequestError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    LoginRequired,
    ReauthenticationRequired,
    Forbidden,
}

impl Denial {
    fn message(self) -> &'static str {
        match self {
            Denial::LoginRequired => "Please log in to access this page.",
            Denial::ReauthenticationRequired => "Please reauthenticate to access this page.",
            Denial::Forbidden => "Forbidden",
        }
    }
}

pub trait Requirement: Send + Sync + 'static {
    fn check(ctx: &RequestContext, config: &Config) -> Result<(), Denial>;
}

/// Public pages.
pub struct Anyone;

/// Any authenticated session, including one restored from the remember cookie.
pub struct LoggedIn;

/// A session whose password login happened in this browser session.
pub struct FreshLogin;

/// The configured administrator.
pub struct Admin;

impl Requirement for Anyone {
    fn check(_: &RequestContext, _: &Config) -> Result<(), Denial> {
        Ok(())
    }
}

impl Requirement for LoggedIn {
    fn check(ctx: &RequestContext, _: &Config) -> Result<(), Denial> {
        if ctx.is_authenticated() {
            Ok(())
        } else {
            Err(Denial::LoginRequired)
        }
    }
}

impl Requirement for FreshLogin {
    fn check(ctx: &RequestContext, config: &Config) -> Result<(), Denial> {
        LoggedIn::check(ctx, config)?;
        if ctx.is_fresh() {
            Ok(())
        } else {
            Err(Denial::ReauthenticationRequired)
        }
    }
}

impl Requirement for Admin {
    fn check(ctx: &RequestContext, config: &Config) -> Result<(), Denial> {
        if ctx.user_id() == Some(config.admin_user_id) {
            Ok(())
        } else {
            Err(Denial::Forbidden)
        }
    }
}

pub struct Guard<R: Requirement>(pub RequestContext, pub PhantomData<R>);

impl<R: Requirement> FromRequestParts<AppState> for Guard<R> {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut ctx = RequestContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match R::check(&ctx, &state.config) {
            Ok(()) => Ok(Guard(ctx, PhantomData)),
            Err(Denial::Forbidden) => {
                tracing::warn!(user_id = ?ctx.user_id(), path = ctx.path(), "admin route refused");
                Err(ctx.finish(RequestError::Forbidden))
            }
            Err(denial) => {
                ctx.flash(denial.message());
                let target = login_url(ctx.path());
                Err(ctx.finish(redirect(&target)))
            }
        }
    }
}
