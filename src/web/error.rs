//! Human-readable failure pages for the browser surfaces.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub title: String,
    pub message: String,
}

/// An [`AppError`] rendered as an HTML page instead of JSON.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();

        let (title, message) = match status {
            StatusCode::NOT_FOUND => ("Not found", "Nothing lives at this address."),
            StatusCode::GONE => ("Expired", "This paste has expired and has been deleted."),
            StatusCode::UNAUTHORIZED => ("Incorrect password", "The password you entered is not correct."),
            StatusCode::BAD_REQUEST => ("Bad request", self.0.message()),
            _ => {
                tracing::error!(message = %self.0.message(), details = %self.0.details(), "Page request failed");
                ("Something went wrong", "Please try again later.")
            }
        };

        let page = ErrorPage {
            title: title.to_string(),
            message: message.to_string(),
        };

        (status, page).into_response()
    }
}
