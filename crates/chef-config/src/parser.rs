//! `knife.rb` parsing.
//!
//! A knife.rb file is read as a flat properties file: one `key = value`
//! assignment per line, `#` comments and blank lines skipped, anything
//! that is not a flat assignment ignored. Multi-line Ruby expressions are
//! not supported.
//!
//! Three settings are required: `chef_server_url`, `node_name` and
//! `client_key`. The `client_key` value is expected to *reference* a
//! `.pem` file; the referenced file is resolved against the config file's
//! directory and its contents become [`ChefConfig::credential`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChefConfig;
use crate::error::ParseError;

/// Required knife.rb settings, in the order they are checked.
const URL_KEY: &str = "chef_server_url";
const CLIENT_KEY: &str = "node_name";
const CREDENTIAL_KEY: &str = "client_key";

/// Matches a `.pem` file name immediately preceded by a path separator or
/// quote. The file name itself is capture group 1.
static PEM_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\"'](\w+-?_?\w+\.pem)"#).expect("pem file pattern"));

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a knife.rb file into a [`ChefConfig`].
///
/// The returned configuration is complete: the `client_key` reference has
/// already been resolved and read, so all three fields are non-empty.
/// Parsing fails atomically — no partial configuration is ever produced.
///
/// Safe to call from any number of threads concurrently; each call owns
/// its file handles exclusively and touches no shared state.
///
/// # Errors
///
/// * [`ParseError::UnreadableConfig`] — the file cannot be read.
/// * [`ParseError::MissingKey`] — a required setting is absent or empty.
/// * [`ParseError::PemNotReferenced`] — `client_key` holds no `.pem` token.
/// * [`ParseError::UnreadablePem`] — the referenced key file cannot be read.
pub fn parse(path: impl AsRef<Path>) -> Result<ChefConfig, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::UnreadableConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = parse_settings(&text);
    let url = dequoted(&settings, URL_KEY)?;
    let client = dequoted(&settings, CLIENT_KEY)?;
    let credential_ref = required(&settings, CREDENTIAL_KEY)?;
    let credential = read_client_key(path, credential_ref)?;

    Ok(ChefConfig::new(client, url, credential))
}

/// Split the text into `key = value` settings. Last assignment wins.
fn parse_settings(text: &str) -> HashMap<&str, &str> {
    let mut settings = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            // not a flat assignment
            continue;
        };
        settings.insert(key.trim(), value.trim());
    }
    settings
}

/// Fetch a required setting, rejecting empty values.
fn required<'a>(settings: &HashMap<&str, &'a str>, key: &'static str) -> Result<&'a str, ParseError> {
    match settings.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ParseError::MissingKey { key }),
    }
}

/// Fetch a required setting and strip every literal `"` from it.
///
/// Quote stripping is the only normalization performed; embedded quotes
/// are removed wherever they occur, not just at the ends.
fn dequoted(settings: &HashMap<&str, &str>, key: &'static str) -> Result<String, ParseError> {
    let value = required(settings, key)?.replace('"', "");
    if value.is_empty() {
        return Err(ParseError::MissingKey { key });
    }
    Ok(value)
}

/// Resolve the `.pem` reference inside a `client_key` value and read it.
///
/// The first `.pem`-shaped token wins; the file name is resolved relative
/// to the config file's directory.
fn read_client_key(config_path: &Path, value: &str) -> Result<String, ParseError> {
    let Some(captures) = PEM_FILE.captures(value) else {
        return Err(ParseError::PemNotReferenced {
            path: absolute(config_path),
        });
    };
    let parent = config_path.parent().unwrap_or_else(|| Path::new("."));
    let pem_path = parent.join(&captures[1]);
    fs::read_to_string(&pem_path).map_err(|source| ParseError::UnreadablePem {
        path: pem_path,
        source,
    })
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ---------------------------------------------------------------------------
// Conventional locations
// ---------------------------------------------------------------------------

/// The platform's conventional knife.rb location.
pub fn default_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\chef\knife.rb")
    } else {
        PathBuf::from("/etc/chef/knife.rb")
    }
}

/// Search knife's own lookup order and return the first existing file:
/// `./.chef/knife.rb`, then `~/.chef/knife.rb`, then [`default_path`].
pub fn locate() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(".chef/knife.rb")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".chef").join("knife.rb"));
    }
    candidates.push(default_path());
    candidates.into_iter().find(|path| path.is_file())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
