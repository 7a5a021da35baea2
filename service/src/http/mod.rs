//! HTTP utilities and middleware.
//!
//! [`secure`] wires a built [`HttpSecurity`] into an axum router.

pub mod login_page;
pub mod security;

use std::sync::Arc;

use axum::{middleware, Extension, Router};

use crate::security::HttpSecurity;
pub use login_page::{login_page_fallback, LoginPage};
pub use security::{
    build_security_headers, cors_layer, security_headers_middleware, SecurityHeaders,
};

/// Apply a built security configuration to `router`.
///
/// Layer order, innermost first:
/// 1. Generated login page (when form login wants one). A route `router`
///    already has at that path takes precedence over the generated page.
/// 2. CORS layer (when a CORS section was declared and not disabled)
/// 3. Security headers middleware (outermost)
#[must_use]
pub fn secure(mut router: Router, security: &HttpSecurity) -> Router {
    match security.form_login() {
        Some(login) if login.is_enabled() => {
            if let Some(page) = LoginPage::generated(login) {
                tracing::info!(path = page.path(), "Serving generated login page");
                router = router.layer(middleware::from_fn_with_state(
                    Arc::new(page),
                    login_page_fallback,
                ));
            } else {
                tracing::info!(
                    path = login.login_page_url(),
                    "Form login enabled with a custom login page"
                );
            }
        }
        Some(_) => tracing::info!("Form login disabled"),
        None => {}
    }

    if let Some(cors) = security.cors() {
        if cors.is_enabled() {
            router = router.layer(cors_layer(cors));
        } else {
            tracing::info!("CORS disabled");
        }
    }

    let headers = build_security_headers(security.headers());
    if headers.is_empty() {
        tracing::info!("Security headers disabled");
    } else {
        tracing::info!(count = headers.len(), "Security headers enabled");
        router = router
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(Extension(headers));
    }

    router
}
