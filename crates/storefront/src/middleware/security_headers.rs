//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Every response gets the same restrictive header set. The policy is locked
//! down except where the storefront needs it:
//!
//! - htmx is loaded from unpkg
//! - catalog photos come from images.unsplash.com, which sends no CORP header,
//!   so COEP is `credentialless`
//! - outfit photos may be captured with the camera on the same origin

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Content Security Policy applied to every page and fragment.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; \
    script-src 'self' https://unpkg.com; \
    style-src 'self'; \
    font-src 'self'; \
    img-src 'self' data: blob: https://images.unsplash.com; \
    connect-src 'self'; \
    frame-src 'none'; \
    object-src 'none'; \
    base-uri 'self'; \
    form-action 'self'; \
    frame-ancestors 'none'";

/// Features the page may use; everything not listed is denied.
const PERMISSIONS_POLICY: &str = "accelerometer=(), \
    autoplay=(), \
    browsing-topics=(), \
    camera=(self), \
    display-capture=(), \
    encrypted-media=(), \
    fullscreen=(), \
    geolocation=(), \
    gyroscope=(), \
    hid=(), \
    idle-detection=(), \
    interest-cohort=(), \
    magnetometer=(), \
    microphone=(), \
    midi=(), \
    payment=(), \
    picture-in-picture=(), \
    publickey-credentials-get=(), \
    screen-wake-lock=(), \
    serial=(), \
    usb=(), \
    xr-spatial-tracking=()";

const HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("permissions-policy", PERMISSIONS_POLICY),
    ("cache-control", "no-store, max-age=0"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("cross-origin-embedder-policy", "credentialless"),
    ("x-dns-prefetch-control", "off"),
];

/// Add security headers to all responses.
///
/// Headers already set by a handler are overwritten.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_headers_applied() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["cross-origin-embedder-policy"], "credentialless");
        let csp = headers["content-security-policy"].to_str().expect("ascii");
        assert!(csp.contains("img-src 'self' data: blob: https://images.unsplash.com"));
        assert!(csp.contains("script-src 'self' https://unpkg.com"));
    }
}
