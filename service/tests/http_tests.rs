//! HTTP integration tests using TestAppBuilder.
//!
//! These tests verify the response headers and CORS behavior produced by
//! declared security sections, using the shared app builder that mirrors
//! main.rs wiring.

mod common;

use axum::body::Body;
use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
        CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY, EXPIRES, ORIGIN, PRAGMA,
        REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        X_XSS_PROTECTION,
    },
    HeaderName, HeaderValue, Method, Request, StatusCode,
};
use axum::response::Response;
use common::{app_builder::TestAppBuilder, get};
use gatekeeper_api::security::headers::{
    CacheControlDsl, ContentSecurityPolicyDsl, FrameOptionsDsl, HeadersDsl, HstsDsl,
    ReferrerPolicyDsl,
};
use tower::ServiceExt;

fn header<'a>(response: &'a Response, name: &HeaderName) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .map(|v| v.to_str().expect("ascii header"))
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = TestAppBuilder::minimal().build();
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Content-Security-Policy Tests
// =============================================================================

#[tokio::test]
async fn test_csp_default_policy() {
    let app = TestAppBuilder::minimal()
        .with_headers(HeadersDsl::new().content_security_policy(ContentSecurityPolicyDsl::new()))
        .build();

    let response = get(app, "/health").await;

    assert_eq!(
        header(&response, &CONTENT_SECURITY_POLICY),
        Some("default-src 'self'")
    );
    assert!(response
        .headers()
        .get(CONTENT_SECURITY_POLICY_REPORT_ONLY)
        .is_none());
}

#[tokio::test]
async fn test_csp_custom_directives_are_written_verbatim() {
    let directives = "default-src 'self'; script-src trustedscripts.example.com";
    let app = TestAppBuilder::minimal()
        .with_headers(HeadersDsl::new().content_security_policy(
            ContentSecurityPolicyDsl::new().policy_directives(directives),
        ))
        .build();

    let response = get(app, "/health").await;

    assert_eq!(header(&response, &CONTENT_SECURITY_POLICY), Some(directives));
}

#[tokio::test]
async fn test_csp_report_only_switches_header_name() {
    let app = TestAppBuilder::minimal()
        .with_headers(HeadersDsl::new().content_security_policy(
            ContentSecurityPolicyDsl::new().report_only(true),
        ))
        .build();

    let response = get(app, "/health").await;

    assert_eq!(
        header(&response, &CONTENT_SECURITY_POLICY_REPORT_ONLY),
        Some("default-src 'self'")
    );
    assert!(response.headers().get(CONTENT_SECURITY_POLICY).is_none());
}

#[tokio::test]
async fn test_csp_absent_until_declared() {
    let app = TestAppBuilder::minimal().build();
    let response = get(app, "/health").await;
    assert!(response.headers().get(CONTENT_SECURITY_POLICY).is_none());
    assert!(response
        .headers()
        .get(CONTENT_SECURITY_POLICY_REPORT_ONLY)
        .is_none());
}

#[test]
fn test_csp_blank_directives_are_rejected() {
    let err = TestAppBuilder::minimal()
        .with_headers(
            HeadersDsl::new()
                .content_security_policy(ContentSecurityPolicyDsl::new().policy_directives("  ")),
        )
        .try_build()
        .expect_err("blank directives");

    assert_eq!(
        err.path(),
        vec!["headers", "content_security_policy", "policy_directives"]
    );
}

// =============================================================================
// Default Header Tests
// =============================================================================

#[tokio::test]
async fn test_default_security_headers_present() {
    let app = TestAppBuilder::minimal().build();
    let response = get(app, "/health").await;

    assert_eq!(header(&response, &X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
    assert_eq!(header(&response, &X_XSS_PROTECTION), Some("1; mode=block"));
    assert_eq!(
        header(&response, &CACHE_CONTROL),
        Some("no-cache, no-store, max-age=0, must-revalidate")
    );
    assert_eq!(header(&response, &PRAGMA), Some("no-cache"));
    assert_eq!(header(&response, &EXPIRES), Some("0"));
    assert_eq!(header(&response, &X_FRAME_OPTIONS), Some("DENY"));
    assert!(response.headers().get(STRICT_TRANSPORT_SECURITY).is_none());
    assert!(response.headers().get(REFERRER_POLICY).is_none());
}

#[tokio::test]
async fn test_declared_optional_headers_are_written() {
    let app = TestAppBuilder::minimal()
        .with_headers(
            HeadersDsl::new()
                .hsts(HstsDsl::new())
                .referrer_policy(ReferrerPolicyDsl::new())
                .frame_options(FrameOptionsDsl::new().same_origin()),
        )
        .build();

    let response = get(app, "/health").await;

    assert_eq!(
        header(&response, &STRICT_TRANSPORT_SECURITY),
        Some("max-age=31536000; includeSubDomains")
    );
    assert_eq!(
        header(&response, &REFERRER_POLICY),
        Some("strict-origin-when-cross-origin")
    );
    assert_eq!(header(&response, &X_FRAME_OPTIONS), Some("SAMEORIGIN"));
}

#[tokio::test]
async fn test_cache_control_disable_removes_only_cache_headers() {
    let app = TestAppBuilder::minimal()
        .with_headers(HeadersDsl::new().cache_control(CacheControlDsl::new().disable()))
        .build();

    let response = get(app, "/health").await;

    assert!(response.headers().get(CACHE_CONTROL).is_none());
    assert!(response.headers().get(PRAGMA).is_none());
    assert!(response.headers().get(EXPIRES).is_none());
    assert_eq!(header(&response, &X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
}

#[tokio::test]
async fn test_headers_disable_removes_every_header() {
    let app = TestAppBuilder::minimal()
        .with_headers(
            HeadersDsl::new()
                .content_security_policy(ContentSecurityPolicyDsl::new())
                .disable(),
        )
        .build();

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    for name in [
        X_CONTENT_TYPE_OPTIONS,
        X_XSS_PROTECTION,
        CACHE_CONTROL,
        X_FRAME_OPTIONS,
        CONTENT_SECURITY_POLICY,
    ] {
        assert!(response.headers().get(&name).is_none(), "{name} present");
    }
}

#[tokio::test]
async fn test_defaults_disabled_keeps_only_declared_sections() {
    let app = TestAppBuilder::minimal()
        .with_headers(
            HeadersDsl::new()
                .defaults_disabled()
                .content_security_policy(ContentSecurityPolicyDsl::new()),
        )
        .build();

    let response = get(app, "/health").await;

    assert!(response.headers().get(X_CONTENT_TYPE_OPTIONS).is_none());
    assert!(response.headers().get(X_FRAME_OPTIONS).is_none());
    assert!(response.headers().get(CACHE_CONTROL).is_none());
    assert_eq!(
        header(&response, &CONTENT_SECURITY_POLICY),
        Some("default-src 'self'")
    );
}

#[tokio::test]
async fn test_handler_set_header_is_not_overwritten() {
    let app = TestAppBuilder::minimal()
        .with_header_route("/cached", CACHE_CONTROL, "public, max-age=60")
        .build();

    let response = get(app, "/cached").await;

    assert_eq!(header(&response, &CACHE_CONTROL), Some("public, max-age=60"));
    assert_eq!(header(&response, &X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
}

#[tokio::test]
async fn test_headers_applied_to_unknown_routes() {
    let app = TestAppBuilder::minimal().build();
    let response = get(app, "/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&response, &X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
}

// =============================================================================
// CORS Tests
// =============================================================================

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/health")
        .header(ORIGIN, origin)
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = TestAppBuilder::minimal()
        .with_cors(&["http://localhost:3000"])
        .build();

    let response = app
        .oneshot(preflight("http://localhost:3000"))
        .await
        .expect("response");

    // Preflight should succeed
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );
}

#[tokio::test]
async fn test_cors_blocks_unconfigured_origin() {
    let app = TestAppBuilder::minimal()
        .with_cors(&["http://localhost:3000"])
        .build();

    let response = app
        .oneshot(preflight("http://evil.com"))
        .await
        .expect("response");

    // Origin header should not be present for blocked origins
    assert!(response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard_allows_any_origin() {
    let app = TestAppBuilder::minimal().with_cors(&["*"]).build();

    let response = app
        .oneshot(preflight("http://any-origin.com"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn test_cors_allows_configured_methods() {
    let app = TestAppBuilder::minimal()
        .with_cors(&["http://localhost:3000"])
        .build();

    let response = app
        .oneshot(preflight("http://localhost:3000"))
        .await
        .expect("response");

    let methods = header(&response, &ACCESS_CONTROL_ALLOW_METHODS).expect("allow methods");
    assert!(methods.contains("GET"));
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_no_cors_section_means_no_cors_layer() {
    let app = TestAppBuilder::minimal().build();

    let response = app
        .oneshot(preflight("http://localhost:3000"))
        .await
        .expect("response");

    assert!(response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[test]
fn test_cors_rejects_invalid_origin() {
    let err = TestAppBuilder::minimal()
        .with_cors(&["not a url"])
        .try_build()
        .expect_err("invalid origin");
    assert_eq!(err.path(), vec!["cors", "allowed_origins"]);
}

#[test]
fn test_cors_rejects_origin_that_is_not_a_header_value() {
    let err = TestAppBuilder::minimal()
        .with_cors(&["https://a.example.com", "https://b.example.com\u{7f}"])
        .try_build()
        .expect_err("control character in origin");
    assert_eq!(err.path(), vec!["cors", "allowed_origins"]);
}
