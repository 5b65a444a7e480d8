//! CORS headers on every response.
//!
//! Browsers call the API from arbitrary origins, with credentials. The
//! request's `Origin` and requested headers are echoed back; preflight
//! requests are answered here without reaching a handler.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Settings for [`cors`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CorsConfig {
    /// Send `Access-Control-Max-Age: 1` so browsers don't cache preflights.
    pub debug: bool,
}

/// Middleware adding CORS headers; use with
/// [`axum::middleware::from_fn_with_state`].
pub async fn cors(State(config): State<CorsConfig>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));
    let allow_headers = request
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("Authorization"));

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS, GET"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    if config.debug {
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("1"));
    }

    response
}
