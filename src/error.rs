use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Backend: {0}")]
    Api(#[from] ApiError),
    #[error("Template: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>Error</title></head>
<body>
<h1>{{ title }}</h1>
<p class="error">{{ message }}</p>
<p><a href="/login">Back to login</a></p>
</body></html>"#
)]
struct ErrorTemplate<'a> {
    title: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg.clone()),
            AppError::Api(err) => (StatusCode::BAD_GATEWAY, "Request failed", err.user_message()),
            AppError::Template(err) => {
                tracing::error!("Template error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "Internal server error".to_string(),
                )
            }
        };

        let page = ErrorTemplate { title, message }
            .render()
            .unwrap_or_else(|_| title.to_string());
        (status, Html(page)).into_response()
    }
}
