//! Request-level errors and their JSON rendering.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("{0}")]
    MissingFields(String),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(eyre::Report),

    #[error("{0}")]
    EmptyCompletion(&'static str),

    #[error("Failed to parse suggestions")]
    MalformedOutput,

    #[error("Invalid suggestion format received")]
    InvalidSuggestions,

    #[error("Failed to download image")]
    Download(eyre::Report),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidUrl | Error::MissingFields(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Upstream(_)
            | Error::EmptyCompletion(_)
            | Error::MalformedOutput
            | Error::InvalidSuggestions
            | Error::Download(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<eyre::Report> for Error {
    fn from(report: eyre::Report) -> Self {
        Error::Upstream(report)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Error::Upstream(report) | Error::Download(report) => log::error!("{self}: {report:#}"),
            _ if status.is_server_error() => log::error!("{self}"),
            _ => log::debug!("rejected request: {self}"),
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
