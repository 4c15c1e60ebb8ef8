//! Conversion of domain and request errors into JSON error responses

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use kb_core::errors::{AuthError, DomainError, TokenError};
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::dto::{error_codes, ErrorResponse, ErrorResponseExt};

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Map a domain error onto its HTTP status and error body.
///
/// Keyring and issuance failures are logged and answered with a generic
/// message so no internal detail reaches the client.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, code, message) = match error {
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        ),
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_CREDENTIALS,
                auth_error.to_string(),
            ),
            AuthError::UserAlreadyExists => (
                StatusCode::BAD_REQUEST,
                error_codes::USER_EXISTS,
                auth_error.to_string(),
            ),
            AuthError::UserNotFound => (
                StatusCode::NOT_FOUND,
                error_codes::NOT_FOUND,
                auth_error.to_string(),
            ),
            AuthError::ForbiddenRole { .. } => (
                StatusCode::FORBIDDEN,
                error_codes::FORBIDDEN,
                auth_error.to_string(),
            ),
        },
        DomainError::Token(TokenError::NoSigningKey | TokenError::TokenGenerationFailed) => {
            error!("Token issuance failed: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                INTERNAL_MESSAGE.to_string(),
            )
        }
        DomainError::Token(TokenError::TokenExpired) => (
            StatusCode::UNAUTHORIZED,
            error_codes::TOKEN_EXPIRED,
            TokenError::TokenExpired.to_string(),
        ),
        DomainError::Token(token_error) => (
            StatusCode::UNAUTHORIZED,
            error_codes::TOKEN_INVALID,
            token_error.to_string(),
        ),
        DomainError::Keyring(_) | DomainError::Internal { .. } => {
            error!("Internal error: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                INTERNAL_MESSAGE.to_string(),
            )
        }
    };

    ErrorResponse::new(code, message).to_response(status)
}

/// 400 response listing every failing field
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }
    response.to_response(StatusCode::BAD_REQUEST)
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    ErrorResponse::new(error_codes::BAD_REQUEST, message).to_response(StatusCode::BAD_REQUEST)
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, message).to_response(StatusCode::NOT_FOUND)
}

/// Malformed query strings get the same error shape as every other failure
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected query string: {}", err);
    let response = bad_request(format!("Malformed query string: {}", err));
    InternalError::from_response(err, response).into()
}

/// Malformed JSON bodies get the same error shape as every other failure
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    let response = bad_request(format!("Malformed request body: {}", err));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_status_mapping() {
        let cases = [
            (DomainError::Auth(AuthError::InvalidCredentials), 401),
            (DomainError::Auth(AuthError::UserAlreadyExists), 400),
            (DomainError::Auth(AuthError::UserNotFound), 404),
            (
                DomainError::Auth(AuthError::ForbiddenRole {
                    role: "banned".to_string(),
                }),
                403,
            ),
            (DomainError::Token(TokenError::UnknownKey), 401),
            (DomainError::Token(TokenError::TokenExpired), 401),
            (DomainError::Token(TokenError::NoSigningKey), 500),
            (
                DomainError::Validation {
                    message: "bad".to_string(),
                },
                400,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(handle_domain_error(&error).status().as_u16(), status, "{:?}", error);
        }
    }

    #[actix_web::test]
    async fn test_internal_failures_hide_details() {
        let error = DomainError::Internal {
            message: "lock poisoned at set.rs".to_string(),
        };
        let json = body_json(handle_domain_error(&error)).await;
        assert_eq!(json["error"], "INTERNAL_ERROR");
        assert_eq!(json["message"], INTERNAL_MESSAGE);

        let json = body_json(handle_domain_error(&DomainError::Token(TokenError::NoSigningKey))).await;
        assert_eq!(json["message"], INTERNAL_MESSAGE);
    }
}
