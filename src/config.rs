//! Plugin options parsed from the protoc parameter string.
//!
//! protoc passes everything after `--jspb_out=` and before `:` as a single
//! string of comma-separated `key` or `key=value` tokens:
//!
//! ```text
//! protoc --jspb_out=pkg_prefix=com.example:out/ foo.proto
//! ```
//!
//! Tokens are collected into a key/value map and deserialized into
//! [`Options`]. Unrecognised keys are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;

/// Options controlling generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Dotted prefix prepended to every namespace declaration and reference.
    pub pkg_prefix: String,
}

impl Options {
    /// Parse a protoc parameter string.
    ///
    /// - `""` → defaults
    /// - `"pkg_prefix=com.acme,verbose"` → `pkg_prefix = "com.acme"`
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let params = parse_parameter(parameter);
        let value = serde_json::to_value(params)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Split `a=1,b,c=x=y` into `{a: "1", b: "", c: "x=y"}`.
///
/// Later tokens override earlier ones; empty tokens are dropped.
pub fn parse_parameter(parameter: &str) -> BTreeMap<String, String> {
    parameter
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (token.to_string(), String::new()),
        })
        .collect()
}
