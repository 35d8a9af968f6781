//! Authentication interceptor.
//! Rejects requests without a valid bearer credential.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    response::Response,
};
use tracing::debug;

use crate::http::middleware::chain::{reject, Interceptor, Next, RequestContext};
use crate::observability::metrics;
use crate::security::{AuthError, CredentialVerifier};

pub struct AuthInterceptor {
    verifier: CredentialVerifier,
}

impl AuthInterceptor {
    pub fn new(verifier: CredentialVerifier) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl Interceptor for AuthInterceptor {
    async fn intercept(&self, request: Request<Body>, mut ctx: RequestContext, next: Next<'_>) -> Response {
        let presented = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingCredential);

        match presented.and_then(|value| self.verifier.verify(value)) {
            Ok(claims) => {
                debug!(subject = %claims.subject, role = %claims.role, "Credential accepted");
                ctx.claims = Some(claims);
                next.run(request, ctx).await
            }
            Err(err) => {
                debug!(reason = err.code(), path = %request.uri().path(), "Credential rejected");
                metrics::record_auth_rejection(err.code());
                reject(&ctx, err)
            }
        }
    }
}
