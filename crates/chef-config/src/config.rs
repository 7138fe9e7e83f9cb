//! Resolved knife configuration.
//!
//! [`ChefConfig`] is the output of a successful [`crate::parse`] call and
//! the input to API construction. Hosts that persist credentials store the
//! value as-is, which is why it derives the serde traits.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ChefConfig
// ---------------------------------------------------------------------------

/// Everything needed to authenticate one client against one Chef server.
///
/// * `client` — the client (node) name registered on the server.
/// * `url` — the Chef server endpoint.
/// * `credential` — the full text of the client's private-key `.pem` file,
///   not a path to it.
///
/// All three fields are non-empty whenever the value was produced by a
/// successful parse. The value is immutable: build a new one rather than
/// mutating.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChefConfig {
    client: String,
    url: String,
    credential: String,
}

impl ChefConfig {
    /// Assemble a configuration from its parts.
    pub fn new(
        client: impl Into<String>,
        url: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            client: client.into(),
            url: url.into(),
            credential: credential.into(),
        }
    }

    /// The client (node) name.
    pub fn client(&self) -> &str {
        &self.client
    }

    /// The Chef server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The private-key contents.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Classify the target server from its URL.
    pub fn flavor(&self) -> ServerFlavor {
        if self.url.contains("/organizations/") {
            ServerFlavor::Enterprise
        } else {
            ServerFlavor::OpenSource
        }
    }
}

// ---------------------------------------------------------------------------
// ServerFlavor
// ---------------------------------------------------------------------------

/// The kind of Chef server a URL points at.
///
/// Organization-scoped endpoints (`…/organizations/<org>`) belong to an
/// Enterprise or hosted server; everything else is treated as an
/// open-source standalone server. The classification is informational
/// only — no behavior depends on it yet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerFlavor {
    /// Organization-scoped (Enterprise / hosted) server.
    Enterprise,
    /// Standalone open-source server.
    OpenSource,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
