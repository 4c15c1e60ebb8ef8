//! Bearer token middleware for protected endpoints.
//!
//! Tokens are verified in-process against the signing keyring through the
//! `TokenService` registered as app data. Verified claims are injected into
//! the request extensions and exposed to handlers through [`AuthContext`].

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::{header::AUTHORIZATION, StatusCode},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use kb_core::{
    domain::entities::{Claims, UserRole},
    errors::{AuthError, DomainError},
    services::token::TokenService,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::dto::{error_codes, ErrorResponse, ErrorResponseExt};
use crate::handlers::error::handle_domain_error;

/// Caller identity taken from a verified token
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub username: String,
    pub role: UserRole,
    /// Token id, for log correlation
    pub jti: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.account_id,
            username: claims.username,
            role: claims.role,
            jti: claims.jti,
        }
    }
}

/// Bearer authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req) {
                Ok(context) => {
                    debug!("Authenticated {} via token {}", context.account_id, context.jti);
                    req.extensions_mut().insert(context);
                    let response = service.call(req).await?;
                    Ok(response.map_into_left_body())
                }
                Err(rejection) => Ok(req.into_response(rejection).map_into_right_body()),
            }
        })
    }
}

/// Verify the request's bearer token and check the caller's role
fn authenticate(req: &ServiceRequest) -> Result<AuthContext, HttpResponse> {
    let token = extract_bearer_token(req).ok_or_else(|| {
        ErrorResponse::new(
            error_codes::UNAUTHORIZED,
            "Missing or invalid Authorization header",
        )
        .to_response(StatusCode::UNAUTHORIZED)
    })?;

    let token_service = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        error!("Bearer authentication used without a TokenService in app data");
        handle_domain_error(&DomainError::Internal {
            message: "token service is not configured".to_string(),
        })
    })?;

    let claims = token_service.verify(&token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        handle_domain_error(&e)
    })?;

    if claims.role.is_forbidden() {
        debug!("Rejected {} with forbidden role {}", claims.account_id, claims.role);
        let error: DomainError = AuthError::ForbiddenRole {
            role: claims.role.to_string(),
        }
        .into();
        return Err(handle_domain_error(&error));
    }

    Ok(claims.into())
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            let message = "Authentication required";
            let response = ErrorResponse::new(error_codes::UNAUTHORIZED, message)
                .to_response(StatusCode::UNAUTHORIZED);
            InternalError::from_response(message, response).into()
        });

        ready(result)
    }
}
