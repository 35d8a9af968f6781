//! Product handlers behind the interceptor chain.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use tracing::{debug, info};

use crate::http::middleware::{Handler, RequestContext};
use crate::http::response::ApiError;
use crate::store::DataStore;

async fn product_id(request: Request<Body>) -> Option<u64> {
    let (mut parts, _) = request.into_parts();
    parts.extract::<Path<u64>>().await.ok().map(|Path(id)| id)
}

fn subject(ctx: &RequestContext) -> &str {
    ctx.claims.as_ref().map(|c| c.subject.as_str()).unwrap_or("-")
}

/// The payload interceptor did not run in front of this handler.
fn missing_payload() -> Response {
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "request payload unavailable",
    )
    .into_response()
}

/// `GET /products`
pub struct ListProducts {
    pub store: Arc<dyn DataStore>,
}

#[async_trait]
impl Handler for ListProducts {
    async fn call(&self, _request: Request<Body>, ctx: RequestContext) -> Response {
        debug!(subject = subject(&ctx), "Listing products");
        match self.store.list_products().await {
            Ok(products) => Json(products).into_response(),
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}

/// `GET /products/{id}`
pub struct GetProduct {
    pub store: Arc<dyn DataStore>,
}

#[async_trait]
impl Handler for GetProduct {
    async fn call(&self, request: Request<Body>, ctx: RequestContext) -> Response {
        let Some(id) = product_id(request).await else {
            return ApiError::new(StatusCode::NOT_FOUND, "not_found", "{id} not found in the path")
                .into_response();
        };
        debug!(subject = subject(&ctx), id, "Fetching product");
        match self.store.get_product(id).await {
            Ok(product) => Json(product).into_response(),
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}

/// `POST /products`
pub struct AddProduct {
    pub store: Arc<dyn DataStore>,
}

#[async_trait]
impl Handler for AddProduct {
    async fn call(&self, _request: Request<Body>, ctx: RequestContext) -> Response {
        let Some(product) = ctx.product.clone() else {
            return missing_payload();
        };
        match self.store.insert_product(product).await {
            Ok(created) => {
                info!(subject = subject(&ctx), id = created.id, "Product created");
                (StatusCode::CREATED, Json(created)).into_response()
            }
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}

/// `PUT /products/{id}`
pub struct UpdateProduct {
    pub store: Arc<dyn DataStore>,
}

#[async_trait]
impl Handler for UpdateProduct {
    async fn call(&self, request: Request<Body>, ctx: RequestContext) -> Response {
        let Some(id) = product_id(request).await else {
            return ApiError::bad_request("invalid_id", "{id} not found in the path").into_response();
        };
        let Some(product) = ctx.product.clone() else {
            return missing_payload();
        };
        match self.store.update_product(id, product).await {
            Ok(_) => {
                info!(subject = subject(&ctx), id, "Product updated");
                StatusCode::NO_CONTENT.into_response()
            }
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}
