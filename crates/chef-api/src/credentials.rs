//! Credential records and the host credential-store capability.
//!
//! A [`ChefCredential`] associates a unique id and a description with a
//! parsed [`ChefConfig`]. Records are owned and persisted by the host
//! platform; this crate only produces them and looks them up through the
//! [`CredentialStore`] capability, so everything stays testable without a
//! running host.

use std::path::Path;

use chef_config::{ChefConfig, ParseError};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ChefCredential
// ---------------------------------------------------------------------------

/// A named, persisted reference to a [`ChefConfig`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChefCredential {
    id: String,
    description: String,
    config: ChefConfig,
}

impl ChefCredential {
    /// Create a credential record.
    ///
    /// An empty `id` is replaced by a freshly generated UUID so that every
    /// stored record stays addressable.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        config: ChefConfig,
    ) -> Self {
        Self {
            id: fix_empty_id(id.into()),
            description: description.into(),
            config,
        }
    }

    /// Parse a knife.rb file and wrap the result as a credential.
    ///
    /// The description is derived from the parsed configuration as
    /// `"Client: <client>, URL: <url>"`.
    pub fn from_config_file(
        id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ParseError> {
        let config = chef_config::parse(path)?;
        let description = format!("Client: {}, URL: {}", config.client(), config.url());
        Ok(Self {
            id: fix_empty_id(id.into()),
            description,
            config,
        })
    }

    /// The unique id of this credential.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable description shown by credential pickers.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The configuration this credential stores.
    pub fn config(&self) -> &ChefConfig {
        &self.config
    }
}

fn fix_empty_id(id: String) -> String {
    if id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id
    }
}

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// The host platform's credential registry, seen as an injected capability.
///
/// Implementations are expected to be cheap to query; builders call
/// [`list`](Self::list) once per lookup and never cache the result.
pub trait CredentialStore {
    /// All credentials visible to the caller, in store order.
    fn list(&self) -> Vec<ChefCredential>;

    /// Find a credential by its unique id.
    fn find(&self, id: &str) -> Option<ChefCredential> {
        self.list()
            .into_iter()
            .find(|credential| credential.id() == id)
    }
}

// ---------------------------------------------------------------------------
// InMemoryCredentialStore
// ---------------------------------------------------------------------------

/// Ordered in-memory store for hosts without a registry of their own, and
/// for tests.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Vec<ChefCredential>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a credential. Ids are not deduplicated; lookups return the
    /// first match in insertion order.
    pub fn add(&mut self, credential: ChefCredential) {
        self.credentials.push(credential);
    }

    /// Whether the store holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn list(&self) -> Vec<ChefCredential> {
        self.credentials.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
