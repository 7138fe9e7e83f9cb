//! Error types for the `chef-config` crate.
//!
//! Every fallible operation returns a variant of [`ParseError`]. Each
//! variant carries the key name or file path needed to diagnose the
//! failure without re-running the parse.

use std::path::PathBuf;

/// Errors produced while parsing a knife.rb file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The config file itself could not be read.
    #[error("cannot read knife config {}: {source}", .path.display())]
    UnreadableConfig {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// A required setting is absent (or present but empty).
    #[error("missing required knife.rb setting: {key}")]
    MissingKey {
        /// The setting that was not found.
        key: &'static str,
    },

    /// The `client_key` value contains no `.pem`-shaped token.
    #[error("cannot extract a .pem reference from knife config file {}", .path.display())]
    PemNotReferenced {
        /// Absolute path of the config file.
        path: PathBuf,
    },

    /// The referenced `.pem` file could not be read.
    #[error("cannot load .pem {}: {source}", .path.display())]
    UnreadablePem {
        /// Path of the key file that failed to load.
        path: PathBuf,
        /// Underlying I/O cause.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_key() {
        let err = ParseError::MissingKey {
            key: "chef_server_url",
        };
        assert_eq!(
            err.to_string(),
            "missing required knife.rb setting: chef_server_url"
        );
    }

    #[test]
    fn error_display_pem_not_referenced() {
        let err = ParseError::PemNotReferenced {
            path: PathBuf::from("/etc/chef/knife.rb"),
        };
        assert_eq!(
            err.to_string(),
            "cannot extract a .pem reference from knife config file /etc/chef/knife.rb"
        );
    }

    #[test]
    fn unreadable_pem_keeps_io_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ParseError::UnreadablePem {
            path: PathBuf::from("/etc/chef/bob.pem"),
            source: io,
        };
        assert!(err.to_string().starts_with("cannot load .pem /etc/chef/bob.pem"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
