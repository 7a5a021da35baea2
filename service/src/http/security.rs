//! Security headers middleware for HTTP responses.
//!
//! The header list is built once from the [`HeadersConfigurer`] and shared
//! across requests via Axum's `Extension` layer.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    Extension,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::security::{CorsConfigurer, HeadersConfigurer};

/// Pre-built headers, in write order.
pub type SecurityHeaders = Arc<Vec<(HeaderName, HeaderValue)>>;

/// Build security headers from the built headers configuration.
#[must_use]
pub fn build_security_headers(config: &HeadersConfigurer) -> SecurityHeaders {
    Arc::new(config.headers())
}

/// Middleware to add security headers to all responses.
///
/// A header the handler already set is left alone, so a route can send its
/// own `Cache-Control` or `Content-Security-Policy`. Add this as the
/// outermost layer so headers are applied to all routes.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, Router, Extension};
/// use gatekeeper_api::http::security::{build_security_headers, security_headers_middleware};
/// use gatekeeper_api::security::HeadersConfigurer;
///
/// let headers = build_security_headers(&HeadersConfigurer::default());
///
/// let app = Router::new()
///     // ... routes ...
///     .layer(middleware::from_fn(security_headers_middleware))
///     .layer(Extension(headers));
/// ```
pub async fn security_headers_middleware(
    Extension(headers): Extension<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let response_headers = response.headers_mut();
    for (name, value) in headers.iter() {
        if !response_headers.contains_key(name) {
            response_headers.insert(name.clone(), value.clone());
        }
    }
    response
}

/// Build the CORS layer from the built CORS configuration.
#[must_use]
pub fn cors_layer(config: &CorsConfigurer) -> CorsLayer {
    let origins = config.origins();
    let allow_origin: AllowOrigin = if config.allows_any_origin() {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else if origins.is_empty() {
        tracing::info!(
            "CORS allowed origins not configured - cross-origin requests will be blocked"
        );
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        tracing::info!(origins = ?origins, "CORS allowed origins configured");
        AllowOrigin::list(config.origin_values().to_vec())
    };

    CorsLayer::new()
        .allow_methods(config.methods().to_vec())
        .allow_headers(Any)
        .allow_origin(allow_origin)
}
