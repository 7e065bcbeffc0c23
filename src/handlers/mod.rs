use axum::{http::Uri, response::Html, response::Response};
use maud::Markup;

use crate::{context::RequestContext, errors::RequestError, models::User, views::Chrome};

mod comment_handlers;
mod page_handlers;
mod post_handlers;
mod user_handlers;

pub use comment_handlers::*;
pub use page_handlers::*;
pub use post_handlers::*;
pub use user_handlers::*;

pub type HandlerResult = Result<Response, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!(%uri, "no route matched");
    RequestError::NotFound
}

/// Render a full page with the context's navigation and flashes, then write
/// the session back.
pub(crate) fn render(mut ctx: RequestContext, page: impl FnOnce(&Chrome) -> Markup) -> Response {
    let chrome = Chrome {
        user_name: ctx.user().map(User::full_name),
        flashes: ctx.take_flashes(),
    };
    let markup = page(&chrome);
    ctx.finish(Html(markup.into_string()))
}
