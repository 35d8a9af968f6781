//! Interceptor chain.
//!
//! A route is served by an ordered list of interceptors followed by one
//! handler. Each interceptor either answers the request itself or hands the
//! request and an augmented [`RequestContext`] to [`Next::run`], which it can
//! call at most once because `run` consumes it.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::models::Product;
use crate::security::Claims;

/// Facts attached to one in-flight request by the interceptors it passed.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Set by the authentication interceptor.
    pub claims: Option<Claims>,
    /// Set by the payload interceptor.
    pub product: Option<Product>,
}

/// A stage that may reject a request or forward it.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: Request<Body>, ctx: RequestContext, next: Next<'_>) -> Response;
}

/// The terminal stage of a chain.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request<Body>, ctx: RequestContext) -> Response;
}

/// The rest of the chain after the current interceptor.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Interceptor>],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub async fn run(self, request: Request<Body>, ctx: RequestContext) -> Response {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    stages: rest,
                    handler: self.handler,
                };
                stage.intercept(request, ctx, next).await
            }
            None => self.handler.call(request, ctx).await,
        }
    }
}

/// An ordered list of interceptors in front of a handler.
#[derive(Clone)]
pub struct Chain {
    stages: Vec<Arc<dyn Interceptor>>,
    handler: Arc<dyn Handler>,
}

impl Chain {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            stages: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Append a stage. Stages run in the order they are added.
    pub fn with(mut self, stage: impl Interceptor + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn with_shared(mut self, stage: Arc<dyn Interceptor>) -> Self {
        self.stages.push(stage);
        self
    }

    pub async fn handle(&self, request: Request<Body>) -> Response {
        let next = Next {
            stages: &self.stages,
            handler: self.handler.as_ref(),
        };
        next.run(request, RequestContext::default()).await
    }
}

/// Terminate the chain with `err`.
///
/// The claims gathered so far travel in the response extensions so outer
/// layers can tell who was rejected.
pub fn reject(ctx: &RequestContext, err: impl Into<ApiError>) -> Response {
    let mut response = err.into().into_response();
    if let Some(claims) = &ctx.claims {
        response.extensions_mut().insert(claims.clone());
    }
    response
}
