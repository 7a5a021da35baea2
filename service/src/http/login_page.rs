//! Generated login page.
//!
//! Served at the default login page URL when form login is enabled and no
//! custom login page was configured. The form posts to the processing URL
//! using the configured parameter names; checking the credentials is up to
//! whatever handles that URL.
//!
//! The page is a fallback: a route the application registers at the same
//! path answers first, and the page is only rendered when that path would
//! otherwise be a 404 (no route) or a 405 (e.g. only the `POST` credential
//! handler is registered there).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::security::FormLoginConfigurer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPage {
    path: String,
    processing_url: String,
    username_parameter: String,
    password_parameter: String,
}

impl LoginPage {
    /// `None` when the configuration does not want a generated page.
    #[must_use]
    pub fn generated(login: &FormLoginConfigurer) -> Option<Self> {
        login.generates_login_page().then(|| Self {
            path: login.login_page_url().to_string(),
            processing_url: login.processing_url().to_string(),
            username_parameter: login.username_param().to_string(),
            password_parameter: login.password_param().to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Render the page for a request to `uri`; a query containing `error`
    /// shows the failure banner.
    #[must_use]
    pub fn render(&self, uri: &Uri) -> Html<String> {
        let failed = uri.query().is_some_and(|query| {
            query
                .split('&')
                .any(|pair| pair == "error" || pair.starts_with("error="))
        });
        let banner = if failed {
            r#"<div class="alert" role="alert">Bad credentials</div>"#
        } else {
            ""
        };
        Html(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Please sign in</title></head>
<body>
<form method="post" action="{action}">
<h2>Please sign in</h2>
{banner}
<p><label for="username">Username</label>
<input type="text" id="username" name="{username}" required autofocus></p>
<p><label for="password">Password</label>
<input type="password" id="password" name="{password}" required></p>
<button type="submit">Sign in</button>
</form>
</body>
</html>
"#,
            action = escape_html(&self.processing_url),
            username = escape_html(&self.username_parameter),
            password = escape_html(&self.password_parameter),
        ))
    }
}

/// Middleware serving the generated page for `GET <login page>` when the
/// wrapped router has no `GET` handler there.
pub async fn login_page_fallback(
    State(page): State<Arc<LoginPage>>,
    request: Request,
    next: Next,
) -> Response {
    let wants_page = request.method() == Method::GET && request.uri().path() == page.path();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    if wants_page
        && matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
        )
    {
        return page.render(&uri).into_response();
    }
    response
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
