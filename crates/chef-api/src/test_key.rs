//! Shared RSA key for tests.
//!
//! Generating a 2048-bit key takes a noticeable amount of time in debug
//! builds, so every test module borrows this one lazily-generated key.

use once_cell::sync::Lazy;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;

static TEST_KEY: Lazy<RsaPrivateKey> =
    Lazy::new(|| RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate test key"));

/// The shared test key.
pub(crate) fn test_key() -> &'static RsaPrivateKey {
    &TEST_KEY
}

/// The shared test key as a PKCS#8 PEM string.
pub(crate) fn test_key_pem() -> String {
    TEST_KEY
        .to_pkcs8_pem(LineEnding::LF)
        .expect("encode test key")
        .to_string()
}
