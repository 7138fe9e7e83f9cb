//! Blocking HTTP handle for a Chef server.
//!
//! [`ChefApi`] wraps a `reqwest` blocking client, the validated endpoint
//! URL, and the client's RSA signing key. Construction validates the
//! parts but performs no network traffic; each request is signed
//! individually (see the signing module).
//!
//! Calls are synchronous and run to completion or return an error —
//! no retries, no caching, no background tasks.

use std::collections::HashMap;
use std::fmt;

use reqwest::Url;
use rsa::pkcs1::DecodeRsaPrivateKey as _;
use rsa::pkcs8::DecodePrivateKey as _;
use rsa::RsaPrivateKey;
use serde::de::DeserializeOwned;

use crate::builder::TransportModule;
use crate::error::ApiError;
use crate::sign;

/// `User-Agent` sent with every request.
const USER_AGENT: &str = concat!("chef-api/", env!("CARGO_PKG_VERSION"));

/// Advertised client version, expected by Chef servers on every request.
const CHEF_VERSION: &str = "12.0.2";

// ---------------------------------------------------------------------------
// ChefApi
// ---------------------------------------------------------------------------

/// An authenticated Chef server client for a single (endpoint, client)
/// pair.
#[derive(Clone)]
pub struct ChefApi {
    endpoint: Url,
    client_name: String,
    key: RsaPrivateKey,
    http: reqwest::blocking::Client,
}

impl ChefApi {
    /// Validate the parts and assemble a handle with default transport.
    ///
    /// # Errors
    ///
    /// * [`ApiError::InvalidEndpoint`] — `url` does not parse.
    /// * [`ApiError::InvalidKey`] — `key_pem` is not an RSA private key in
    ///   PKCS#8 or PKCS#1 PEM form.
    /// * [`ApiError::Http`] — the HTTP client itself fails to build.
    pub fn new(url: &str, client_name: &str, key_pem: &str) -> Result<Self, ApiError> {
        Self::with_modules(url, client_name, key_pem, &[])
    }

    /// Like [`new`](Self::new), letting each module reshape the HTTP
    /// client under construction before it is built.
    pub fn with_modules(
        url: &str,
        client_name: &str,
        key_pem: &str,
        modules: &[Box<dyn TransportModule>],
    ) -> Result<Self, ApiError> {
        let endpoint = Url::parse(url).map_err(|e| ApiError::InvalidEndpoint {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let key = match RsaPrivateKey::from_pkcs8_pem(key_pem) {
            Ok(key) => key,
            Err(_) => RsaPrivateKey::from_pkcs1_pem(key_pem).map_err(|e| {
                ApiError::InvalidKey {
                    reason: e.to_string(),
                }
            })?,
        };

        let mut builder = reqwest::blocking::Client::builder().user_agent(USER_AGENT);
        for module in modules {
            builder = module.configure(builder);
        }
        let http = builder.build()?;

        Ok(Self {
            endpoint,
            client_name: client_name.to_string(),
            key,
            http,
        })
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// List the names of all environments on the server.
    ///
    /// Cheap and universally available, which makes it the conventional
    /// reachability probe after configuring a credential.
    pub fn list_environments(&self) -> Result<Vec<String>, ApiError> {
        self.get_keys("environments")
    }

    /// List the names of all nodes registered on the server.
    pub fn list_nodes(&self) -> Result<Vec<String>, ApiError> {
        self.get_keys("nodes")
    }

    /// GET an index resource and return its sorted object keys.
    ///
    /// Chef index endpoints answer with a JSON object mapping each item
    /// name to its URL.
    fn get_keys(&self, resource: &str) -> Result<Vec<String>, ApiError> {
        let body: HashMap<String, String> = self.get_json(resource)?;
        let mut names: Vec<String> = body.into_keys().collect();
        names.sort();
        Ok(names)
    }

    /// Signed GET returning the decoded JSON body.
    fn get_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ApiError> {
        let url = self.resource_url(resource);
        let path = url.path().to_string();
        let timestamp = sign::timestamp_now();
        let headers = sign::sign_request(
            &self.key,
            &self.client_name,
            "GET",
            &path,
            b"",
            &timestamp,
        )?;

        let mut request = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .header("X-Chef-Version", CHEF_VERSION);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        tracing::debug!(%url, client = %self.client_name, "GET");
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, %path, "request rejected");
            return Err(ApiError::Status { status, path });
        }
        Ok(serde_json::from_slice(&response.bytes()?)?)
    }

    /// Resolve a resource name under the endpoint, preserving any
    /// organization prefix in the endpoint path.
    fn resource_url(&self, resource: &str) -> Url {
        let mut url = self.endpoint.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), resource);
        url.set_path(&path);
        url
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The server endpoint this handle talks to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The client name requests are signed as.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }
}

impl fmt::Debug for ChefApi {
    // key material stays out of Debug output
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChefApi")
            .field("endpoint", &self.endpoint.as_str())
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
