use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::CheckinValidationError;
use persistence::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl ApiError {
    fn validation(details: Vec<ValidationDetail>) -> Self {
        let message = match details.as_slice() {
            [single] => single.message.clone(),
            _ => format!("{} validation errors", details.len()),
        };
        ApiError::Validation { message, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                Some(details),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "Storage is temporarily unavailable. Please retry.".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CheckinValidationError> for ApiError {
    fn from(err: CheckinValidationError) -> Self {
        ApiError::validation(
            err.violations
                .into_iter()
                .map(|v| ValidationDetail {
                    field: v.field,
                    message: v.message,
                })
                .collect(),
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(err) => err.into(),
            StoreError::NotFound(id) => ApiError::NotFound(format!("Check-in {id} not found")),
            StoreError::Persistence(err) => ApiError::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(vec![rejection_detail(&rejection.body_text(), "body")])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(vec![rejection_detail(&rejection.body_text(), "query")])
    }
}

/// Turns an extractor rejection such as
/// "Failed to deserialize ...: missing field `fullName`" into a detail naming
/// the field in snake_case, or `fallback` when no field can be identified.
fn rejection_detail(text: &str, fallback: &str) -> ValidationDetail {
    let reason = text.split_once(": ").map_or(text, |(_, rest)| rest);

    let field = if let Some((_, rest)) = reason.split_once("missing field `") {
        rest.split('`').next().map(str::to_string)
    } else {
        reason
            .split_once(": ")
            .map(|(path, _)| path)
            .filter(|path| {
                !path.is_empty()
                    && path
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
            })
            .map(str::to_string)
    };

    ValidationDetail {
        field: field
            .filter(|f| !f.is_empty())
            .map(|f| to_snake_case(&f))
            .unwrap_or_else(|| fallback.to_string()),
        message: reason.to_string(),
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                ApiError::ServiceUnavailable(format!("Database error: {}", db_err))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApiError::ServiceUnavailable(format!("Database unreachable: {}", err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .errors()
            .iter()
            .flat_map(|(field, kind)| {
                let messages: Vec<String> = match kind {
                    validator::ValidationErrorsKind::Field(errs) => errs
                        .iter()
                        .map(|e| {
                            e.message
                                .clone()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect(),
                    _ => vec!["Invalid value".to_string()],
                };
                messages.into_iter().map(move |message| ValidationDetail {
                    field: field.to_string(),
                    message,
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::validation(details)
    }
}
