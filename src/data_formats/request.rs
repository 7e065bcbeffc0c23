use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::{models::PostFields, sanitize::sanitize_html};

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

// ----------------- User Request -----------------
#[derive(Deserialize, Debug, Default, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "valid_birth_date", message = "Enter a valid birth date"))]
    pub birth_date: String,
}

impl SignupForm {
    pub fn password(&self) -> String {
        self.password.trim().to_string()
    }

    pub fn first_name(&self) -> String {
        capitalize(self.first_name.trim())
    }

    pub fn last_name(&self) -> String {
        capitalize(self.last_name.trim())
    }

    /// Only meaningful after `validate()` succeeded.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        parse_birth_date(&self.birth_date)
    }
}

#[derive(Deserialize, Debug, Default, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub next: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct NextQuery {
    #[serde(deserialize_with = "empty_as_none")]
    pub next: Option<String>,
}

#[derive(Deserialize, Debug, Default, Validate)]
#[serde(default)]
pub struct ChangePasswordForm {
    #[validate(custom(function = "not_blank", message = "Current Password is required"))]
    pub current_password: String,
    #[validate(custom(function = "not_blank", message = "New Password is required"))]
    pub new_password: String,
    #[validate(must_match(
        other = "new_password",
        message = "Confirm Password should match New Password"
    ))]
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactForm {
    pub message: String,
    #[serde(rename = "phoneNumber", deserialize_with = "empty_as_none")]
    pub phone_number: Option<String>,
}

// ----------------- Post Request -----------------
#[derive(Deserialize, Debug, Default, Clone, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(custom(function = "not_blank", message = "Post Title is required"))]
    pub blog_title: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub blog_subtitle: Option<String>,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub blog_author: String,
    #[validate(url(message = "Blog Image Url must be a valid URL"))]
    pub blog_img_url: String,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(url(message = "Source Link must be a valid URL"))]
    pub source_link: Option<String>,
    #[validate(custom(function = "not_blank", message = "Body is required"))]
    pub blog_content: String,
}

impl PostForm {
    /// Pre-fill from an existing post for the edit page.
    pub fn from_post(post: &crate::models::BlogPost) -> Self {
        Self {
            blog_title: post.title.clone(),
            blog_subtitle: post.subtitle.clone(),
            blog_author: post.article_author.clone(),
            blog_img_url: post.img_url.clone(),
            source_link: post.source_url.clone(),
            blog_content: post.body.clone(),
        }
    }

    /// The body is sanitized here, so nothing built from a form reaches the
    /// database unsanitized.
    pub fn into_fields(self) -> PostFields {
        PostFields {
            title: self.blog_title.trim().to_string(),
            subtitle: self.blog_subtitle,
            article_author: self.blog_author.trim().to_string(),
            img_url: self.blog_img_url.trim().to_string(),
            source_url: self.source_link,
            body: sanitize_html(&self.blog_content),
        }
    }
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Debug, Default, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank", message = "Comment is required"))]
    pub text: String,
}

impl CommentForm {
    pub fn sanitized_text(&self) -> String {
        sanitize_html(&self.text)
    }
}

// ----------------- Helpers -----------------

/// Flattened, sorted messages for flashing back to the user.
pub fn error_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {field}"),
            })
        })
        .collect();
    messages.sort();
    messages
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn valid_birth_date(value: &str) -> Result<(), ValidationError> {
    match parse_birth_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("date")),
    }
}

fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BIRTH_DATE_FORMAT).ok()
}

/// Upper-case the first character, lower-case the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            email: "ada@example.com".into(),
            password: " secret ".into(),
            first_name: "  aDA ".into(),
            last_name: "lovelace".into(),
            birth_date: "1990-01-02".into(),
        }
    }

    #[test]
    fn signup_normalizes_fields() {
        let form = signup();
        assert!(form.validate().is_ok());
        assert_eq!(form.password(), "secret");
        assert_eq!(form.first_name(), "Ada");
        assert_eq!(form.last_name(), "Lovelace");
        assert_eq!(form.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 2));
    }

    #[test]
    fn signup_requires_everything() {
        let errors = SignupForm::default().validate().unwrap_err();
        let messages = error_messages(&errors);
        assert_eq!(messages.len(), 5);
        assert!(messages.contains(&"Enter a valid birth date".to_string()));
        assert!(messages.contains(&"Password is required".to_string()));
    }

    #[test]
    fn signup_rejects_bad_email_and_date() {
        let mut form = signup();
        form.email = "not-an-email".into();
        form.birth_date = "02/01/1990".into();
        let messages = error_messages(&form.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["Enter a valid birth date", "Enter a valid email address"]
        );
    }

    #[test]
    fn password_confirmation_must_match() {
        let form = ChangePasswordForm {
            current_password: "old".into(),
            new_password: "new".into(),
            confirm_password: "other".into(),
        };
        let messages = error_messages(&form.validate().unwrap_err());
        assert_eq!(messages, vec!["Confirm Password should match New Password"]);
    }

    #[test]
    fn post_form_urls() {
        let mut form = PostForm {
            blog_title: "Title".into(),
            blog_subtitle: None,
            blog_author: "Ada".into(),
            blog_img_url: "https://example.com/a.png".into(),
            source_link: None,
            blog_content: "<p>x</p>".into(),
        };
        assert!(form.validate().is_ok());

        form.source_link = Some("not a url".into());
        form.blog_img_url = String::new();
        let messages = error_messages(&form.validate().unwrap_err());
        assert_eq!(
            messages,
            vec![
                "Blog Image Url must be a valid URL",
                "Source Link must be a valid URL"
            ]
        );
    }

    #[test]
    fn post_form_sanitizes_body() {
        let form = PostForm {
            blog_title: " Title ".into(),
            blog_author: "Ada".into(),
            blog_img_url: "https://example.com/a.png".into(),
            blog_content: "<p>ok</p><script>bad()</script>".into(),
            ..Default::default()
        };
        let fields = form.into_fields();
        assert_eq!(fields.title, "Title");
        assert_eq!(fields.body, "<p>ok</p>");
    }

    #[test]
    fn blank_comment_is_invalid() {
        assert!(CommentForm { text: "   ".into() }.validate().is_err());
        let comment = CommentForm {
            text: "<b>hi</b><img src=x onerror=alert(1)>".into(),
        };
        assert!(comment.validate().is_ok());
        assert!(!comment.sanitized_text().contains("onerror"));
    }

    async fn parse_form<T: serde::de::DeserializeOwned>(body: &'static str) -> T {
        use axum::extract::FromRequest;
        let request = axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from(body))
            .unwrap();
        let axum::Form(form) = axum::Form::<T>::from_request(request, &()).await.unwrap();
        form
    }

    #[tokio::test]
    async fn padded_email_is_trimmed_before_validation() {
        let form: SignupForm = parse_form(
            "email=+ada%40example.com+&password=pw&first_name=ada&last_name=lovelace&birth_date=1990-01-02",
        )
        .await;
        assert_eq!(form.email, "ada@example.com");
        assert!(form.validate().is_ok());

        let login: LoginForm = parse_form("email=%09ada%40example.com+&password=pw").await;
        assert_eq!(login.email, "ada@example.com");
        assert!(login.validate().is_ok());
        assert_eq!(login.next, None);
    }

    #[test]
    fn capitalize_matches_expectations() {
        assert_eq!(capitalize("éLODIE"), "Élodie");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
    }
}
