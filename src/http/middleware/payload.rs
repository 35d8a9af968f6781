//! Payload decode-and-validate interceptor for state-mutating routes.

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::http::middleware::chain::{reject, Interceptor, Next, RequestContext};
use crate::models::Product;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl PayloadError {
    pub fn code(&self) -> &'static str {
        match self {
            PayloadError::Malformed(_) => "malformed_payload",
            PayloadError::Validation(_) => "validation_failed",
        }
    }
}

/// Consumes the body, decodes it as a [`Product`] and checks its field rules.
pub struct PayloadInterceptor {
    max_body_size: usize,
}

impl PayloadInterceptor {
    pub fn new(max_body_size: usize) -> Self {
        Self { max_body_size }
    }

    async fn decode(&self, body: Body) -> Result<Product, PayloadError> {
        let bytes = axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|e| PayloadError::Malformed(e.to_string()))?;
        let product: Product =
            serde_json::from_slice(&bytes).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        product.validate()?;
        Ok(product)
    }
}

#[async_trait]
impl Interceptor for PayloadInterceptor {
    async fn intercept(&self, request: Request<Body>, mut ctx: RequestContext, next: Next<'_>) -> Response {
        let (parts, body) = request.into_parts();

        match self.decode(body).await {
            Ok(product) => {
                ctx.product = Some(product);
                next.run(Request::from_parts(parts, Body::empty()), ctx).await
            }
            Err(err) => {
                tracing::debug!(
                    reason = err.code(),
                    subject = ctx.claims.as_ref().map(|c| c.subject.as_str()).unwrap_or("-"),
                    error = %err,
                    "Payload rejected"
                );
                metrics::record_payload_rejection(err.code());
                reject(&ctx, err)
            }
        }
    }
}
