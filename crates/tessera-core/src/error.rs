// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tessera deployment engine.

use std::fmt;

use semver::Version;
use thiserror::Error;

use crate::urn::Urn;

/// The primary error type used across the engine's provider traits and the
/// registry.
#[derive(Debug, Error)]
pub enum TesseraError {
    /// A plugin binary is not installed on this machine. The plugin loader
    /// treats this as an invitation to download and install the plugin on
    /// demand rather than a hard failure.
    #[error("no resource plugin '{name}' found")]
    MissingPlugin {
        name: String,
        version: Option<Version>,
    },

    /// An error reported by a provider plugin over its RPC surface. The
    /// message is surfaced to the engine unchanged.
    #[error("{message}")]
    Plugin {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Automatic download or install of a plugin failed.
    #[error(transparent)]
    Install(#[from] Box<InstallProviderError>),

    /// An error with deployment context prepended, preserving the chain.
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<TesseraError>,
    },

    /// A reserved provider property had the wrong shape.
    #[error("'{key}' must be a string")]
    PropertyType { key: String },

    /// A provider version string did not parse, even tolerantly.
    #[error("could not parse provider version: {0}")]
    InvalidVersion(String),

    /// Recorded provider state from the previous deployment lacks an ID.
    #[error("provider '{urn}' has an unknown ID")]
    UnknownProviderId { urn: Urn },

    /// Recorded provider state from the previous deployment contains two
    /// resources with the same reference.
    #[error("duplicate provider found in old state: '{reference}'")]
    DuplicateProvider { reference: String },

    /// A provider reference string or component failed validation.
    #[error("could not parse provider reference: {0}")]
    InvalidReference(String),

    /// The operation is not supported by the resource it was invoked on.
    #[error("{0}")]
    Unsupported(&'static str),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TesseraError {
    /// Wraps this error with a context message, matching how the engine
    /// reports nested failures (`"<context>: <cause>"`).
    pub fn context(self, context: impl Into<String>) -> TesseraError {
        TesseraError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if this error (at the top level) reports a missing
    /// plugin binary that an install could remedy.
    pub fn is_missing_plugin(&self) -> bool {
        matches!(self, TesseraError::MissingPlugin { .. })
    }
}

/// Returned by the plugin loader when a provider could not be found or
/// installed automatically. The message directs the user at the literal
/// install command, including the `--server` flag when a download URL was
/// requested.
#[derive(Debug)]
pub struct InstallProviderError {
    /// The name of the provider package.
    pub name: String,
    /// The requested version of the plugin, if any.
    pub version: Option<Version>,
    /// The plugin download server URL, if any.
    pub plugin_download_url: Option<String>,
    /// The underlying download or install failure.
    pub source: Box<TesseraError>,
}

impl fmt::Display for InstallProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let server = match self.plugin_download_url.as_deref() {
            Some(url) if !url.is_empty() => format!(" --server {url}"),
            _ => String::new(),
        };

        match &self.version {
            Some(version) => write!(
                f,
                "Could not automatically download and install resource plugin \
                 'pulumi-resource-{name}' at version v{version}, install the plugin \
                 using `pulumi plugin install resource {name} v{version}{server}`: {source}",
                name = self.name,
                source = self.source,
            ),
            None => write!(
                f,
                "Could not automatically download and install resource plugin \
                 'pulumi-resource-{name}', install the plugin using \
                 `pulumi plugin install resource {name}{server}`: {source}",
                name = self.name,
                source = self.source,
            ),
        }
    }
}

impl std::error::Error for InstallProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl From<InstallProviderError> for TesseraError {
    fn from(err: InstallProviderError) -> Self {
        TesseraError::Install(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_error_message_with_version() {
        let err = InstallProviderError {
            name: "aws".to_string(),
            version: Some(Version::new(2, 0, 0)),
            plugin_download_url: None,
            source: Box::new(TesseraError::Internal("403 forbidden".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("'pulumi-resource-aws' at version v2.0.0"));
        assert!(message.contains("`pulumi plugin install resource aws v2.0.0`"));
        assert!(message.ends_with("403 forbidden"));
    }

    #[test]
    fn install_error_message_with_server() {
        let err = InstallProviderError {
            name: "aws".to_string(),
            version: Some(Version::new(2, 0, 0)),
            plugin_download_url: Some("https://example.com/plugins".to_string()),
            source: Box::new(TesseraError::Internal("boom".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains(
            "`pulumi plugin install resource aws v2.0.0 --server https://example.com/plugins`"
        ));
    }

    #[test]
    fn install_error_message_without_version() {
        let err = InstallProviderError {
            name: "gcp".to_string(),
            version: None,
            plugin_download_url: None,
            source: Box::new(TesseraError::Internal("boom".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("'pulumi-resource-gcp', install the plugin"));
        assert!(message.contains("`pulumi plugin install resource gcp`"));
        assert!(!message.contains("at version"));
    }

    #[test]
    fn context_preserves_chain() {
        let inner = TesseraError::Internal("oops".to_string());
        let wrapped = inner.context("could not load plugin");
        assert_eq!(
            wrapped.to_string(),
            "could not load plugin: internal error: oops"
        );
        assert!(std::error::Error::source(&wrapped).is_some());
    }

    #[test]
    fn missing_plugin_is_classifiable() {
        let err = TesseraError::MissingPlugin {
            name: "aws".to_string(),
            version: None,
        };
        assert!(err.is_missing_plugin());
        assert!(!TesseraError::Internal("x".to_string()).is_missing_plugin());
    }
}
