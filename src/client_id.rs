use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

// Used when no proxy header is present (local development)
pub const FALLBACK_IDENTIFIER: &str = "local-dev";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

// Rate limit key: x-forwarded-for (first hop) > x-real-ip > cf-connecting-ip > fallback
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_value(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(|s| s.trim()).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    header_value(headers, "x-real-ip")
        .or_else(|| header_value(headers, "cf-connecting-ip"))
        .unwrap_or(FALLBACK_IDENTIFIER)
        .to_string()
}

// Short hash of an identifier so logs don't carry raw addresses
pub fn fingerprint(identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
