//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Mount interceptor chains on protected routes
//! - Wire up middleware (request ID, tracing, timeout, body limit)

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::sync::watch;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ApiConfig, AuthConfig};
use crate::handlers::{self, AddProduct, GetProduct, ListProducts, UpdateProduct};
use crate::http::middleware::{AuthInterceptor, Chain, Interceptor, PayloadInterceptor};
use crate::lifecycle::Phase;
use crate::security::{CredentialVerifier, TokenCodec};
use crate::store::DataStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub codec: Arc<TokenCodec>,
    pub auth: AuthConfig,
    pub phase: watch::Receiver<Phase>,
}

type ChainFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Adapt a chain into an axum handler.
fn chained(chain: Chain) -> impl FnOnce(Request<Body>) -> ChainFuture + Clone + Send + Sync + 'static {
    move |request| Box::pin(async move { chain.handle(request).await })
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ApiConfig, state: AppState) -> Router {
    let verifier = CredentialVerifier::new(state.codec.clone());
    let auth: Arc<dyn Interceptor> = Arc::new(AuthInterceptor::new(verifier));
    let payload: Arc<dyn Interceptor> =
        Arc::new(PayloadInterceptor::new(config.security.max_body_size));

    let list = Chain::new(ListProducts {
        store: state.store.clone(),
    })
    .with_shared(auth.clone());

    let fetch = Chain::new(GetProduct {
        store: state.store.clone(),
    })
    .with_shared(auth.clone());

    // Authentication first: unauthenticated callers never get their body decoded.
    let add = Chain::new(AddProduct {
        store: state.store.clone(),
    })
    .with_shared(auth.clone())
    .with_shared(payload.clone());

    let update = Chain::new(UpdateProduct {
        store: state.store.clone(),
    })
    .with_shared(auth)
    .with_shared(payload);

    Router::new()
        .route("/login", post(handlers::login))
        .route("/health", get(handlers::health))
        .route("/products", get(chained(list)).post(chained(add)))
        .route("/products/{id}", get(chained(fetch)).put(chained(update)))
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::LoginResponse;
    use crate::http::response::ErrorBody;
    use crate::models::{user::password_digest, Product};
    use crate::security::{SigningSecret, BEARER_PREFIX};
    use crate::store::MemoryStore;
    use crate::config::UserSeed;
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<TokenCodec>, watch::Sender<Phase>) {
        let config = ApiConfig::default();
        let store = Arc::new(MemoryStore::with_users(&[UserSeed {
            username: "andrea".into(),
            password_sha256: password_digest("secret"),
            role: "admin".into(),
        }]));
        let codec = Arc::new(TokenCodec::with_system_clock(SigningSecret::generate()));
        let (phase_tx, phase_rx) = watch::channel(Phase::Running);
        let state = AppState {
            store,
            codec: codec.clone(),
            auth: config.auth.clone(),
            phase: phase_rx,
        };
        (build_router(&config, state), codec, phase_tx)
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("{}{}", BEARER_PREFIX, token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let (router, _, _) = app();
        let response = router
            .oneshot(request(
                Method::POST,
                "/login",
                None,
                r#"{"username":"andrea","password":"secret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let header = response.headers()[header::AUTHORIZATION].to_str().unwrap().to_string();
        let body: LoginResponse = json(response).await;
        assert_eq!(header, format!("Bearer {}", body.token));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let (router, _, _) = app();

        let missing = router
            .clone()
            .oneshot(request(Method::POST, "/login", None, r#"{"username":"andrea"}"#))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let wrong = router
            .oneshot(request(
                Method::POST,
                "/login",
                None,
                r#"{"username":"andrea","password":"guess"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = json(wrong).await;
        assert_eq!(body.code, "authentication_failed");
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let (router, _, _) = app();
        for (method, uri) in [
            (Method::GET, "/products"),
            (Method::GET, "/products/1"),
            (Method::POST, "/products"),
            (Method::PUT, "/products/1"),
        ] {
            let response = router
                .clone()
                .oneshot(request(method.clone(), uri, None, "not json"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        }
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let (router, codec, _) = app();
        let token = codec.issue("andrea", "admin", Duration::from_secs(300)).unwrap();

        let created = router
            .clone()
            .oneshot(request(
                Method::POST,
                "/products",
                Some(&token),
                r#"{"name":"test product","price":11.22,"sku":"dfr-fadf-adfa"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created: Product = json(created).await;
        assert_eq!(created.id, 1);

        let fetched = router
            .clone()
            .oneshot(request(Method::GET, "/products/1", Some(&token), ""))
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let fetched: Product = json(fetched).await;
        assert_eq!(fetched, created);

        let missing = router
            .oneshot(request(Method::GET, "/products/42", Some(&token), ""))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let (router, codec, _) = app();
        let token = codec.issue("andrea", "admin", Duration::from_secs(300)).unwrap();
        let body = r#"{"name":"renamed","price":3.5,"sku":"abc-def-ghi"}"#;

        let missing = router
            .clone()
            .oneshot(request(Method::PUT, "/products/9", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        router
            .clone()
            .oneshot(request(Method::POST, "/products", Some(&token), body))
            .await
            .unwrap();
        let updated = router
            .oneshot(request(Method::PUT, "/products/1", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invalid_sku_is_bad_request() {
        let (router, codec, _) = app();
        let token = codec.issue("andrea", "admin", Duration::from_secs(300)).unwrap();

        let response = router
            .oneshot(request(
                Method::POST,
                "/products",
                Some(&token),
                r#"{"name":"test product","price":11.22,"sku":"badformat"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = json(response).await;
        assert_eq!(body.code, "validation_failed");
    }

    #[tokio::test]
    async fn test_health_follows_phase() {
        let (router, _, phase) = app();

        let running = router
            .clone()
            .oneshot(request(Method::GET, "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(running.status(), StatusCode::OK);

        phase.send_replace(Phase::Draining);
        let draining = router
            .oneshot(request(Method::GET, "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(draining.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let (router, _, _) = app();
        let response = router
            .oneshot(request(Method::GET, "/health", None, ""))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
