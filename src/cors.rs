//! src/cors.rs

use actix_cors::Cors;
use actix_web::http::header::{HeaderMap, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN};
use std::sync::Arc;

const ALLOWED_METHODS: [&str; 3] = ["GET", "POST", "OPTIONS"];

/// Browser access for the configured front-end origins. An entry is either an
/// exact origin, `*`, or a subdomain wildcard such as `https://*.netlify.app`.
pub fn cors_policy(allowed_origins: Arc<Vec<String>>) -> Cors {
    Cors::default()
        .allowed_origin_fn(move |origin, _request_head| {
            origin
                .to_str()
                .map(|origin| origin_is_allowed(origin, &allowed_origins))
                .unwrap_or(false)
        })
        .allowed_methods(ALLOWED_METHODS)
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Whether `cors_policy` grants this OPTIONS request: the origin is on the
/// allow-list and the requested method is one we serve. Anything else is
/// answered with a plain 200 and no `Access-Control-*` headers.
pub fn is_granted_preflight(headers: &HeaderMap, allowed_origins: &[String]) -> bool {
    let origin_allowed = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(|origin| origin_is_allowed(origin, allowed_origins))
        .unwrap_or(false);
    // Compared case-sensitively, the same way `actix-cors` matches methods.
    let method_allowed = headers
        .get(ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|value| value.to_str().ok())
        .map(|method| ALLOWED_METHODS.contains(&method))
        .unwrap_or(false);
    origin_allowed && method_allowed
}

pub fn origin_is_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins
        .iter()
        .any(|pattern| origin_matches(origin, pattern))
}

fn origin_matches(origin: &str, pattern: &str) -> bool {
    let origin = origin.trim_end_matches('/');
    let pattern = pattern.trim_end_matches('/');
    if pattern == "*" || origin.eq_ignore_ascii_case(pattern) {
        return true;
    }

    let Some((scheme, host_pattern)) = pattern.split_once("://*.") else {
        return false;
    };
    let Some(host) = origin
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix("://"))
    else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let suffix = format!(".{}", host_pattern.to_ascii_lowercase());
    host.len() > suffix.len() && host.ends_with(&suffix)
}
