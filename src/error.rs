//! Error handler for the HTTP boundary.

use application::error::ApplicationError;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

const BEARER_CHALLENGE: &str = "Bearer";

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Json(#[from] JsonRejection),

    #[error("missing or invalid 'Authorization' header")]
    Unauthorized,

    #[error("administrator role required")]
    Forbidden,

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
    #[serde(skip)]
    challenge: bool,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Report a single invalid field.
    pub fn field_error(mut self, field: &str, message: &str) -> Self {
        self.errors = Some(vec![FieldError {
            field: field.to_owned(),
            message: message.to_owned(),
        }]);
        self
    }

    /// Ask the client for bearer credentials.
    pub fn challenge(mut self) -> Self {
        self.challenge = true;
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(
        self,
    ) -> std::result::Result<Response, axum::http::Error> {
        let Ok(body) = serde_json::to_string(&self) else {
            return Ok(internal_server_error());
        };

        let mut builder = Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, "application/problem+json");
        if self.challenge {
            builder =
                builder.header(header::WWW_AUTHENTICATE, BEARER_CHALLENGE);
        }

        builder.body(body.into())
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
            challenge: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue
                    .message
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| issue.code.to_string()),
            })
        })
        .collect()
}

fn application_response(err: &ApplicationError) -> ResponseError {
    let response = ResponseError::default().details(&err.to_string());

    match err {
        ApplicationError::Domain(domain) => response
            .title("There were validation errors with your request.")
            .status(StatusCode::UNPROCESSABLE_ENTITY)
            .field_error(domain.field(), &domain.to_string()),

        ApplicationError::AlreadyExists => response
            .title("Resource already exists.")
            .status(StatusCode::CONFLICT),

        ApplicationError::InvalidCredentials
        | ApplicationError::AccountDeactivated
        | ApplicationError::Token => response
            .title("Authentication failed.")
            .status(StatusCode::UNAUTHORIZED)
            .challenge(),

        ApplicationError::UserNotFound => response
            .title("Resource not found.")
            .status(StatusCode::NOT_FOUND),

        ApplicationError::Internal(source) => {
            tracing::error!(error = %source, "server returned 500 status");

            ResponseError::default()
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .title("There were validation errors with your request.")
            .details(&self.to_string())
            .status(StatusCode::UNPROCESSABLE_ENTITY);

        let response = match &self {
            ServerError::Validation(validation_errors) => {
                response.errors(validation_errors)
            },

            ServerError::Json(rejection) => response
                .title("Malformed request body.")
                .details(&rejection.body_text()),

            ServerError::Unauthorized => response
                .title("Missing or invalid 'Authorization' header.")
                .status(StatusCode::UNAUTHORIZED)
                .challenge(),

            ServerError::Forbidden => response
                .title("Insufficient permissions.")
                .status(StatusCode::FORBIDDEN),

            ServerError::Application(err) => application_response(err),
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/problem+json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}
