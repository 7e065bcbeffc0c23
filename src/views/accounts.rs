use maud::{html, Markup};

use crate::data_formats::SignupForm;

use super::{page_shell, Chrome};

pub fn signup_page(chrome: &Chrome, form: &SignupForm) -> Markup {
    page_shell(
        "Sign Up",
        chrome,
        html! {
            h1 { "Sign Up" }
            form method="post" action="/signup" {
                label { "First Name" input type="text" name="first_name" value=(form.first_name) required autofocus; }
                label { "Last Name" input type="text" name="last_name" value=(form.last_name) required; }
                label { "Birth Date" input type="date" name="birth_date" value=(form.birth_date) required; }
                label { "Email" input type="email" name="email" value=(form.email) required; }
                label { "Password" input type="password" name="password" required; }
                button type="submit" { "Sign up" }
            }
        },
    )
}

pub fn login_page(chrome: &Chrome, email: &str, next: Option<&str>) -> Markup {
    page_shell(
        "Log In",
        chrome,
        html! {
            h1 { "Log In" }
            form method="post" action="/login" {
                label { "Email" input type="email" name="email" value=(email) required autofocus; }
                label { "Password" input type="password" name="password" required; }
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next);
                }
                button type="submit" { "Login" }
            }
        },
    )
}

pub fn new_password_page(chrome: &Chrome) -> Markup {
    page_shell(
        "Change Password",
        chrome,
        html! {
            h1 { "Change Password" }
            form method="post" action="/new-password" {
                label { "Current Password" input type="password" name="current_password" required autofocus; }
                label { "New Password" input type="password" name="new_password" required; }
                label { "Confirm Password" input type="password" name="confirm_password" required; }
                button type="submit" { "Submit" }
            }
        },
    )
}
