//! Server-rendered pages.
//!
//! Markup is built with maud, which escapes every dynamic value. The only
//! raw HTML inserted is post and comment bodies, which were sanitized before
//! they were stored.

mod accounts;
mod posts;

pub use accounts::*;
pub use posts::*;

use axum::http::StatusCode;
use chrono::{DateTime, Datelike, Utc};
use maud::{html, Markup, DOCTYPE};

/// Navigation state and flash messages shared by every page.
pub struct Chrome {
    pub user_name: Option<String>,
    pub flashes: Vec<String>,
}

pub fn page_shell(title: &str, chrome: &Chrome, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Blog" }
            }
            body {
                nav {
                    a href="/" { "Home" } " "
                    a href="/aboutme" { "About" } " "
                    @if let Some(name) = &chrome.user_name {
                        a href="/new-post" { "New Post" } " "
                        a href="/contact" { "Contact" } " "
                        a href="/new-password" { "Change Password" } " "
                        a href="/logout" { "Log Out" } " "
                        span class="user" { (name) }
                    } @else {
                        a href="/login" { "Log In" } " "
                        a href="/signup" { "Sign Up" }
                    }
                }
                @for message in &chrome.flashes {
                    p class="flash" { (message) }
                }
                main { (content) }
                footer { "Copyright © " (Utc::now().year()) }
            }
        }
    }
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (status.as_u16()) " | Blog" }
            }
            body {
                h1 { (status.as_u16()) }
                p { (message) }
                a href="/" { "Back to home" }
            }
        }
    }
}

pub fn about_page(chrome: &Chrome) -> Markup {
    page_shell(
        "About Me",
        chrome,
        html! {
            h1 { "About Me" }
            p { "A small blog about whatever is on my mind." }
        },
    )
}

pub fn contact_page(chrome: &Chrome, message: &str) -> Markup {
    page_shell(
        "Contact",
        chrome,
        html! {
            h1 { (message) }
            form method="post" action="/form-entry" {
                label { "Phone number" input type="tel" name="phoneNumber"; }
                label { "Message" textarea name="message" required {} }
                button type="submit" { "Send" }
            }
        },
    )
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %d, %Y").to_string()
}
