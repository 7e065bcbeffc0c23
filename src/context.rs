//! Per-request session context.
//!
//! Every handler receives a [`RequestContext`] built from the request's
//! cookies. It carries the authenticated user, whether the login is fresh,
//! the last visited page and pending flash messages. Handlers mutate it and
//! hand it back through [`RequestContext::finish`], which writes the session
//! (and, when needed, the remember-me cookie) onto the response.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::CookieBuilder;
use serde::de::DeserializeOwned;

use crate::authentication::{
    expiry_after, CookieKeys, RememberClaims, SessionClaims, REMEMBER_EXPIRY_DURATION,
    SESSION_EXPIRY_DURATION,
};
use crate::db_helpers::get_user_by_id;
use crate::errors::{RequestError, RequestResult};
use crate::models::User;
use crate::AppState;

pub const SESSION_COOKIE: &str = "blog_session";
pub const REMEMBER_COOKIE: &str = "blog_remember";

#[derive(Debug, Clone, PartialEq)]
enum RememberAction {
    Keep,
    Set(RememberClaims),
    Clear,
}

pub struct RequestContext {
    user: Option<User>,
    fresh: bool,
    last_url: Option<String>,
    flashes: Vec<String>,
    remember: RememberAction,
    path: String,
    keys: CookieKeys,
    cookie_secure: bool,
    jar: CookieJar,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session: SessionClaims =
            decode_cookie(&jar, SESSION_COOKIE, &state.keys).unwrap_or_default();

        let mut user = None;
        let mut fresh = false;
        let mut remember = RememberAction::Keep;

        if let (Some(uid), Some(token)) = (session.uid, session.token.as_deref()) {
            user = load_user_with_token(state, uid, token).await?;
            fresh = user.is_some() && session.fresh;
        }

        if user.is_none() {
            if jar.get(REMEMBER_COOKIE).is_some() {
                let claims: Option<RememberClaims> =
                    decode_cookie(&jar, REMEMBER_COOKIE, &state.keys);
                if let Some(claims) = claims {
                    user = load_user_with_token(state, claims.uid, &claims.token).await?;
                }
                if user.is_some() {
                    tracing::debug!("session restored from remember cookie");
                } else {
                    remember = RememberAction::Clear;
                }
            }
        }

        let path = parts
            .uri
            .path_and_query()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(RequestContext {
            user,
            fresh,
            last_url: session.last_url,
            flashes: session.flashes,
            remember,
            path,
            keys: state.keys.clone(),
            cookie_secure: state.config.cookie_secure,
            jar,
        })
    }
}

/// Signed claims stored in `name`; missing or invalid cookies read as `None`.
fn decode_cookie<T: DeserializeOwned>(jar: &CookieJar, name: &str, keys: &CookieKeys) -> Option<T> {
    jar.get(name).and_then(|cookie| keys.decode(cookie.value_trimmed()))
}

/// The user only counts as logged in while the cookie's token matches the
/// stored one; a password change or account deletion revokes old cookies.
async fn load_user_with_token(
    state: &AppState,
    uid: i64,
    token: &str,
) -> RequestResult<Option<User>> {
    let user = get_user_by_id(&state.pool, uid).await?;
    Ok(user.filter(|user| user.token == token))
}

impl RequestContext {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Logged in with a password during this browser session, as opposed to
    /// being restored from the remember-me cookie.
    pub fn is_fresh(&self) -> bool {
        self.user.is_some() && self.fresh
    }

    /// Path and query of the current request.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Record a navigable page as the place to return to after login/logout.
    pub fn visit(&mut self, path: impl Into<String>) {
        self.last_url = Some(path.into());
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    /// Pending messages for the page being rendered; they are not shown again.
    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }

    /// Establish a fresh, remembered login.
    pub fn login(&mut self, user: User) {
        self.remember = RememberAction::Set(RememberClaims {
            uid: user.id,
            token: user.token.clone(),
            exp: expiry_after(REMEMBER_EXPIRY_DURATION),
        });
        self.user = Some(user);
        self.fresh = true;
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.fresh = false;
        self.remember = RememberAction::Clear;
    }

    /// Keep the current login alive after the user's token was rotated.
    pub fn rotate_token(&mut self, token: String) {
        if let Some(mut user) = self.user.take() {
            user.token = token;
            let fresh = self.fresh;
            self.login(user);
            self.fresh = fresh;
        }
    }

    /// Write the session back onto `response`.
    pub fn finish(self, response: impl IntoResponse) -> Response {
        match self.cookie_jar() {
            Ok(jar) => (jar, response).into_response(),
            Err(e) => e.into_response(),
        }
    }

    fn cookie_jar(&self) -> RequestResult<CookieJar> {
        let claims = SessionClaims {
            uid: self.user.as_ref().map(|user| user.id),
            token: self.user.as_ref().map(|user| user.token.clone()),
            fresh: self.is_fresh(),
            last_url: self.last_url.clone(),
            flashes: self.flashes.clone(),
            exp: expiry_after(SESSION_EXPIRY_DURATION),
        };
        let jar = self
            .jar
            .clone()
            .add(self.cookie(SESSION_COOKIE, self.keys.encode(&claims)?));

        let jar = match &self.remember {
            RememberAction::Keep => jar,
            RememberAction::Set(claims) => jar.add(
                self.cookie(REMEMBER_COOKIE, self.keys.encode(claims)?)
                    .max_age(REMEMBER_EXPIRY_DURATION),
            ),
            RememberAction::Clear => {
                let mut cookie = self.cookie(REMEMBER_COOKIE, String::new()).build();
                cookie.make_removal();
                jar.add(cookie)
            }
        };
        Ok(jar)
    }

    fn cookie(&self, name: &'static str, value: String) -> CookieBuilder<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
    }
}

// ----------------- Redirect Helpers -----------------

pub fn redirect(to: &str) -> Response {
    Redirect::to(to).into_response()
}

/// Only same-site absolute paths are accepted as post-login targets.
pub fn safe_redirect_target(target: &str) -> Option<&str> {
    let is_local = target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.contains(|c: char| c == '\r' || c == '\n');
    is_local.then_some(target)
}

pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/login?next={encoded}")
}

#[cfg(test)]
mod tests {
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{HeaderMap, HeaderValue};

    use super::*;

    fn anonymous_context(cookie_secure: bool) -> RequestContext {
        RequestContext {
            user: None,
            fresh: false,
            last_url: None,
            flashes: Vec::new(),
            remember: RememberAction::Keep,
            path: "/".to_string(),
            keys: CookieKeys::new("context-test-secret"),
            cookie_secure,
            jar: CookieJar::new(),
        }
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn session_cookie_attributes() {
        let cookies = set_cookies(&anonymous_context(true).finish(()));
        assert_eq!(cookies.len(), 1);
        let session = &cookies[0];
        assert!(session.starts_with("blog_session="));
        for attribute in ["HttpOnly", "SameSite=Lax", "Path=/", "Secure"] {
            assert!(session.contains(attribute), "{session}");
        }
        assert!(!session.contains("Max-Age"));
    }

    #[test]
    fn logout_removes_remember_cookie() {
        let mut ctx = anonymous_context(false);
        ctx.logout();
        let cookies = set_cookies(&ctx.finish(()));
        let remember = cookies
            .iter()
            .find(|cookie| cookie.starts_with("blog_remember="))
            .unwrap();
        assert!(remember.contains("Max-Age=0"), "{remember}");
        assert!(remember.contains("Path=/"));
        assert!(!remember.contains("Secure"));
    }

    #[test]
    fn quoted_cookie_values_are_decoded() {
        let keys = CookieKeys::new("context-test-secret");
        let claims = SessionClaims {
            uid: Some(7),
            exp: expiry_after(SESSION_EXPIRY_DURATION),
            ..Default::default()
        };
        let token = keys.encode(&claims).unwrap();

        let mut headers = HeaderMap::new();
        let header = format!("other=1; {SESSION_COOKIE}=\"{token}\"");
        headers.insert(COOKIE, HeaderValue::from_str(&header).unwrap());
        let jar = CookieJar::from_headers(&headers);

        let decoded: Option<SessionClaims> = decode_cookie(&jar, SESSION_COOKIE, &keys);
        assert_eq!(decoded.and_then(|claims| claims.uid), Some(7));
        assert!(decode_cookie::<SessionClaims>(&jar, "other", &keys).is_none());
    }

    #[test]
    fn redirect_targets() {
        assert_eq!(safe_redirect_target("/post/3"), Some("/post/3"));
        assert_eq!(safe_redirect_target("//evil.example"), None);
        assert_eq!(safe_redirect_target("/\\evil.example"), None);
        assert_eq!(safe_redirect_target("https://evil.example"), None);
        assert_eq!(safe_redirect_target("post/3"), None);
    }

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/post/3"), "/login?next=%2Fpost%2F3");
        assert_eq!(login_url("/posts/1?x=y"), "/login?next=%2Fposts%2F1%3Fx%3Dy");
    }
}
