//! # chef-api
//!
//! Client-side access to a Chef server, driven by `knife.rb`-style
//! configuration.
//!
//! The crate provides:
//!
//! * [`ApiBuilder`] — turns a knife.rb file, a [`ChefConfig`], a stored
//!   credential or raw parts into an API handle.
//! * [`ChefApi`] — the handle itself: a blocking HTTP client that signs
//!   every request with the client's RSA key.
//! * [`ChefCredential`] / [`CredentialStore`] — a persisted configuration
//!   record and the host-platform registry it lives in, seen as an
//!   injected capability.
//! * [`ConfigurationError`] / [`ApiError`] — unified error types for
//!   building and for using a client.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chef_api::ApiBuilder;
//!
//! # fn run() -> Result<(), chef_api::ConfigurationError> {
//! let api = ApiBuilder::new().from_file("/etc/chef/knife.rb")?;
//! println!("environments: {:?}", api.list_environments());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod credentials;
pub mod error;
mod sign;

#[cfg(test)]
pub(crate) mod test_key;

pub use builder::{ApiBuilder, ApiFactory, HttpApiFactory, TransportModule};
pub use client::ChefApi;
pub use credentials::{ChefCredential, CredentialStore, InMemoryCredentialStore};
pub use error::{ApiError, BoxError, ConfigurationError};

// Re-export the configuration types for ergonomic usage.
pub use chef_config::{ChefConfig, ParseError, ServerFlavor};
