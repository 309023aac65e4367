use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use time::macros::format_description;
use tracing::error;

use crate::{error::AppError, submissions::repo_types::Submission};

/// Renders an askama template as an HTML response.
pub struct HtmlTemplate<T>(pub T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => Html(body).into_response(),
            Err(e) => AppError::Template(e).into_response(),
        }
    }
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormTemplate;

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub submission: SubmissionView,
}

#[derive(Template)]
#[template(path = "auth.html")]
pub struct AuthTemplate<'a> {
    pub message: &'a str,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub submission: SubmissionView,
}

#[derive(Template)]
#[template(path = "list.html")]
pub struct ListTemplate {
    pub submissions: Vec<SubmissionView>,
}

/// Display-ready copy of a submission; absent fields render as empty text.
#[derive(Debug, Clone)]
pub struct SubmissionView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
}

impl From<Submission> for SubmissionView {
    fn from(s: Submission) -> Self {
        let created_at = s
            .created_at
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
            ))
            .unwrap_or_else(|e| {
                error!(error = %e, id = %s.id, "created_at formatting failed");
                s.created_at.to_string()
            });
        Self {
            id: s.id.to_string(),
            name: s.name.unwrap_or_default(),
            email: s.email.unwrap_or_default(),
            message: s.message.unwrap_or_default(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn submission_view_fills_missing_fields_and_formats_time() {
        let view = SubmissionView::from(Submission {
            id: Uuid::nil(),
            name: None,
            email: Some("ann@x.com".into()),
            message: None,
            created_at: datetime!(2024-03-05 09:07:01 UTC),
        });
        assert_eq!(view.name, "");
        assert_eq!(view.message, "");
        assert_eq!(view.email, "ann@x.com");
        assert_eq!(view.created_at, "2024-03-05 09:07:01 UTC");
    }

    #[test]
    fn templates_escape_user_text() {
        let html = ProfileTemplate {
            submission: SubmissionView {
                id: "1".into(),
                name: "<b>Ann</b>".into(),
                email: "ann@x.com".into(),
                message: "<script>alert(1)</script>".into(),
                created_at: "now".into(),
            },
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn list_template_reports_empty_state() {
        let html = ListTemplate { submissions: vec![] }.render().unwrap();
        assert!(html.contains("No submissions yet"));
    }
}
