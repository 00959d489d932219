use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Internal failure (SQL, template rendering). Surfaced as a bare 500;
/// the cause goes to the log, never into the page body.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("request failed: {:#}", self.0);
        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body("internal error")
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
