//! HTTP mapping for domain errors.
//!
//! Handlers return [`crate::domain::Error`]; this module turns it into a JSON
//! body with a status derived from [`ErrorCode`]. Internal errors are
//! redacted before they leave the process and the `trace-id` header is set
//! whenever a trace id was captured.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, error};

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), "internal error returned to client");
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}

fn json_payload_error(err: &JsonPayloadError) -> Error {
    let (message, code) = match err {
        JsonPayloadError::ContentType => ("expected an application/json body", "content_type"),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ("request body is too large", "payload_too_large")
        }
        JsonPayloadError::Deserialize(_) => ("request body is not valid", "invalid_body"),
        _ => ("request body could not be read", "unreadable_body"),
    };
    Error::invalid_request(message).with_details(json!({
        "code": code,
        "reason": err.to_string(),
    }))
}

/// JSON extractor configuration that reports body rejections as
/// `invalid_request` domain errors.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use vaxdrive::inbound::http::error::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        debug!(path = %req.path(), error = %err, "rejected JSON body");
        json_payload_error(&err).into()
    })
}

#[cfg(test)]
mod tests;
