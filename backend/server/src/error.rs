use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FirebaseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid service account: {0}")]
    Credentials(#[from] std::io::Error),

    #[error("Token request failed: {0}")]
    Token(#[from] yup_oauth2::Error),

    #[error("Token response carried no access token")]
    MissingToken,

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("URL {0} cannot carry path segments")]
    CannotBeBase(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firebase responded {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Firebase(#[from] FirebaseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Firebase { .. } => StatusCode::BAD_GATEWAY,
        };

        (status, self.to_string()).into_response()
    }
}
