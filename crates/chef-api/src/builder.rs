//! Building API handles from the various configuration sources.
//!
//! [`ApiBuilder`] funnels four entry points — knife.rb file, resolved
//! [`ChefConfig`], stored credential id, raw parts — into a single
//! construction path behind the [`ApiFactory`] seam. The default factory
//! produces a [`ChefApi`]; tests substitute their own to exercise the
//! resolution logic without the network stack.
//!
//! Each call constructs a fresh handle. Nothing is cached or retried.

use std::path::Path;

use chef_config::ChefConfig;

use crate::client::ChefApi;
use crate::credentials::CredentialStore;
use crate::error::{BoxError, ConfigurationError};

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Construction seam over the underlying client library.
pub trait ApiFactory {
    /// The handle type produced.
    type Api;

    /// Build a handle from endpoint URL, client name and key contents.
    fn build(
        &self,
        url: &str,
        client: &str,
        key: &str,
        modules: &[Box<dyn TransportModule>],
    ) -> Result<Self::Api, BoxError>;
}

/// Optional extension point: reshape the HTTP client under construction
/// (timeouts, proxies, extra logging). With no modules installed, the
/// default transport and logging apply.
pub trait TransportModule: Send + Sync {
    /// Return the reshaped client builder.
    fn configure(&self, builder: reqwest::blocking::ClientBuilder)
        -> reqwest::blocking::ClientBuilder;
}

/// Default factory: a [`ChefApi`] over blocking HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpApiFactory;

impl ApiFactory for HttpApiFactory {
    type Api = ChefApi;

    fn build(
        &self,
        url: &str,
        client: &str,
        key: &str,
        modules: &[Box<dyn TransportModule>],
    ) -> Result<ChefApi, BoxError> {
        Ok(ChefApi::with_modules(url, client, key, modules)?)
    }
}

// ---------------------------------------------------------------------------
// ApiBuilder
// ---------------------------------------------------------------------------

/// Builds Chef API handles from knife.rb files, resolved configurations,
/// stored credentials or raw parts.
pub struct ApiBuilder<F = HttpApiFactory> {
    factory: F,
    modules: Vec<Box<dyn TransportModule>>,
}

impl ApiBuilder<HttpApiFactory> {
    /// Builder over the default HTTP factory.
    pub fn new() -> Self {
        Self::with_factory(HttpApiFactory)
    }
}

impl Default for ApiBuilder<HttpApiFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ApiFactory> ApiBuilder<F> {
    /// Builder over a custom factory.
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            modules: Vec::new(),
        }
    }

    /// Append a transport module.
    #[must_use]
    pub fn module(mut self, module: impl TransportModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Parse a knife.rb file and build a handle from the result.
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<F::Api, ConfigurationError> {
        let config = chef_config::parse(path)?;
        self.from_config(&config)
    }

    /// Build a handle from an already-resolved configuration.
    pub fn from_config(&self, config: &ChefConfig) -> Result<F::Api, ConfigurationError> {
        self.from_parts(config.url(), config.client(), config.credential())
    }

    /// Look up a stored credential by id and build a handle for its
    /// server.
    ///
    /// # Errors
    ///
    /// * [`ConfigurationError::NoCredentials`] — the store is empty.
    /// * [`ConfigurationError::UnknownCredential`] — nothing matches `id`.
    pub fn from_credential(
        &self,
        store: &dyn CredentialStore,
        id: &str,
    ) -> Result<F::Api, ConfigurationError> {
        let credentials = store.list();
        if credentials.is_empty() {
            return Err(ConfigurationError::NoCredentials);
        }
        let credential = credentials
            .into_iter()
            .find(|credential| credential.id() == id)
            .ok_or_else(|| ConfigurationError::UnknownCredential(id.to_string()))?;
        self.from_config(credential.config())
    }

    /// Build a handle from raw parts. Any factory failure is wrapped,
    /// cause included.
    pub fn from_parts(
        &self,
        url: &str,
        client: &str,
        key: &str,
    ) -> Result<F::Api, ConfigurationError> {
        self.factory
            .build(url, client, key, &self.modules)
            .map_err(ConfigurationError::Client)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::credentials::{ChefCredential, InMemoryCredentialStore};
    use crate::error::ApiError;
    use crate::test_key::test_key_pem;

    /// Hands the resolved parts back instead of building anything.
    struct EchoFactory;

    impl ApiFactory for EchoFactory {
        type Api = (String, String, String);

        fn build(
            &self,
            url: &str,
            client: &str,
            key: &str,
            _modules: &[Box<dyn TransportModule>],
        ) -> Result<Self::Api, BoxError> {
            Ok((url.to_string(), client.to_string(), key.to_string()))
        }
    }

    struct FailingFactory;

    impl ApiFactory for FailingFactory {
        type Api = ();

        fn build(
            &self,
            _url: &str,
            _client: &str,
            _key: &str,
            _modules: &[Box<dyn TransportModule>],
        ) -> Result<Self::Api, BoxError> {
            Err("endpoint unreachable".into())
        }
    }

    struct CountingModule(Arc<AtomicUsize>);

    impl TransportModule for CountingModule {
        fn configure(
            &self,
            builder: reqwest::blocking::ClientBuilder,
        ) -> reqwest::blocking::ClientBuilder {
            self.0.fetch_add(1, Ordering::SeqCst);
            builder
        }
    }

    fn config() -> ChefConfig {
        ChefConfig::new(
            "bob",
            "https://chef.acme.org/organizations/acme",
            "TESTKEYDATA",
        )
    }

    #[test]
    fn from_config_passes_parts_through() {
        let builder = ApiBuilder::with_factory(EchoFactory);
        let (url, client, key) = builder.from_config(&config()).unwrap();
        assert_eq!(url, "https://chef.acme.org/organizations/acme");
        assert_eq!(client, "bob");
        assert_eq!(key, "TESTKEYDATA");
    }

    #[test]
    fn from_parts_passes_parts_through() {
        let builder = ApiBuilder::with_factory(EchoFactory);
        let parts = builder
            .from_parts("https://chef.internal:4000", "alice", "KEY")
            .unwrap();
        assert_eq!(
            parts,
            (
                "https://chef.internal:4000".to_string(),
                "alice".to_string(),
                "KEY".to_string()
            )
        );
    }

    #[test]
    fn from_file_resolves_the_knife_config_first() {
        let dir = TempDir::new().unwrap();
        let knife = dir.path().join("knife.rb");
        fs::write(
            &knife,
            "node_name = \"bob\"\nchef_server_url = \"https://chef.acme.org/organizations/acme\"\nclient_key = \"/etc/chef/bob.pem\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("bob.pem"), "TESTKEYDATA").unwrap();

        let builder = ApiBuilder::with_factory(EchoFactory);
        let (url, client, key) = builder.from_file(&knife).unwrap();
        assert_eq!(url, "https://chef.acme.org/organizations/acme");
        assert_eq!(client, "bob");
        assert_eq!(key, "TESTKEYDATA");
    }

    #[test]
    fn from_file_propagates_parse_errors() {
        let dir = TempDir::new().unwrap();
        let builder = ApiBuilder::with_factory(EchoFactory);
        let err = builder.from_file(dir.path().join("absent.rb")).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse(_)));
    }

    #[test]
    fn empty_store_is_reported_as_no_credentials() {
        let store = InMemoryCredentialStore::new();
        let builder = ApiBuilder::with_factory(EchoFactory);
        let err = builder.from_credential(&store, "cred-1").unwrap_err();
        assert!(matches!(err, ConfigurationError::NoCredentials));
    }

    #[test]
    fn unmatched_id_is_distinguished_from_empty_store() {
        let mut store = InMemoryCredentialStore::new();
        store.add(ChefCredential::new("cred-1", "prod", config()));
        let builder = ApiBuilder::with_factory(EchoFactory);
        let err = builder.from_credential(&store, "cred-2").unwrap_err();
        match err {
            ConfigurationError::UnknownCredential(id) => assert_eq!(id, "cred-2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn matching_credential_builds_for_its_config() {
        let mut store = InMemoryCredentialStore::new();
        store.add(ChefCredential::new("cred-1", "prod", config()));
        let builder = ApiBuilder::with_factory(EchoFactory);
        let (url, client, _) = builder.from_credential(&store, "cred-1").unwrap();
        assert_eq!(url, "https://chef.acme.org/organizations/acme");
        assert_eq!(client, "bob");
    }

    #[test]
    fn factory_failures_are_wrapped_with_cause() {
        let builder = ApiBuilder::with_factory(FailingFactory);
        let err = builder
            .from_parts("https://chef.internal", "bob", "KEY")
            .unwrap_err();
        match &err {
            ConfigurationError::Client(source) => {
                assert_eq!(source.to_string(), "endpoint unreachable");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "cannot build Chef API client: endpoint unreachable"
        );
    }

    #[test]
    fn default_factory_builds_a_chef_api() {
        let api = ApiBuilder::new()
            .from_parts("https://chef.internal:4000", "bob", &test_key_pem())
            .unwrap();
        assert_eq!(api.client_name(), "bob");
    }

    #[test]
    fn default_factory_wraps_construction_failures() {
        let err = ApiBuilder::new()
            .from_parts("not a url", "bob", &test_key_pem())
            .unwrap_err();
        match err {
            ConfigurationError::Client(source) => {
                let api_err = source.downcast::<ApiError>().unwrap();
                assert!(matches!(*api_err, ApiError::InvalidEndpoint { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn modules_are_applied_once_per_build() {
        let calls = Arc::new(AtomicUsize::new(0));
        let builder = ApiBuilder::new().module(CountingModule(Arc::clone(&calls)));

        builder
            .from_parts("https://chef.internal:4000", "bob", &test_key_pem())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        builder
            .from_parts("https://chef.internal:4000", "bob", &test_key_pem())
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
