//! # chef-config
//!
//! Parsing of `knife.rb`-style configuration files.
//!
//! The crate provides:
//!
//! * [`ChefConfig`] — the resolved configuration triple (server URL,
//!   client name, private-key contents).
//! * [`parse`] — reads a knife.rb file, resolves the referenced `.pem`
//!   key file, and returns a [`ChefConfig`].
//! * [`ParseError`] — unified error type for everything that can go
//!   wrong while parsing.
//!
//! A knife.rb file is treated as a flat `key = value` properties file,
//! never as a Ruby program.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chef_config::parse;
//!
//! # fn run() -> Result<(), chef_config::ParseError> {
//! let config = parse("/etc/chef/knife.rb")?;
//! println!("client {} talks to {}", config.client(), config.url());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod parser;

pub use config::{ChefConfig, ServerFlavor};
pub use error::ParseError;
pub use parser::{default_path, locate, parse};
