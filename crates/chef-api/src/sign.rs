//! Chef request signing, protocol version 1.3.
//!
//! Every request to a Chef server carries a set of `X-Ops-*` headers
//! proving possession of the client's RSA private key: a canonical
//! request string is hashed with SHA-256, signed with
//! RSASSA-PKCS1-v1_5, and the base64 signature is split across numbered
//! `X-Ops-Authorization-<n>` headers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use rsa::sha2::{Digest, Sha256};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};

/// Signing protocol advertised in `X-Ops-Sign`.
const SIGN_VERSION: &str = "1.3";

/// Chef server API version named in the canonical request and headers.
pub(crate) const SERVER_API_VERSION: &str = "1";

/// Maximum length of one `X-Ops-Authorization-<n>` header value.
const CHUNK_LEN: usize = 60;

/// Produce the ordered `X-Ops-*` headers for one request.
///
/// `path` is the URL path only (no scheme, host or query); `timestamp`
/// must be an ISO-8601 UTC instant such as `2026-08-06T12:00:00Z`.
pub(crate) fn sign_request(
    key: &RsaPrivateKey,
    user_id: &str,
    method: &str,
    path: &str,
    body: &[u8],
    timestamp: &str,
) -> Result<Vec<(String, String)>, rsa::Error> {
    let content_hash = STANDARD.encode(Sha256::digest(body));
    let canonical = canonical_request(method, path, &content_hash, timestamp, user_id);
    let digest = Sha256::digest(canonical.as_bytes());
    let signature = key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)?;
    let encoded = STANDARD.encode(signature);

    let mut headers = vec![
        (
            "X-Ops-Sign".to_string(),
            format!("algorithm=sha256;version={SIGN_VERSION}"),
        ),
        ("X-Ops-Userid".to_string(), user_id.to_string()),
        ("X-Ops-Timestamp".to_string(), timestamp.to_string()),
        ("X-Ops-Content-Hash".to_string(), content_hash),
        (
            "X-Ops-Server-API-Version".to_string(),
            SERVER_API_VERSION.to_string(),
        ),
    ];
    for (n, chunk) in chunks(&encoded, CHUNK_LEN).enumerate() {
        headers.push((format!("X-Ops-Authorization-{}", n + 1), chunk.to_string()));
    }
    Ok(headers)
}

/// The protocol 1.3 canonical request string.
fn canonical_request(
    method: &str,
    path: &str,
    content_hash: &str,
    timestamp: &str,
    user_id: &str,
) -> String {
    format!(
        "Method:{method}\n\
         Path:{path}\n\
         X-Ops-Content-Hash:{content_hash}\n\
         X-Ops-Sign:version={SIGN_VERSION}\n\
         X-Ops-Timestamp:{timestamp}\n\
         X-Ops-UserId:{user_id}\n\
         X-Ops-Server-API-Version:{SERVER_API_VERSION}"
    )
}

/// The current instant in the timestamp format Chef servers expect.
pub(crate) fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Split an ASCII string into fixed-size chunks.
fn chunks(encoded: &str, len: usize) -> impl Iterator<Item = &str> {
    encoded
        .as_bytes()
        .chunks(len)
        .map(|chunk| std::str::from_utf8(chunk).expect("base64 is ascii"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
