// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform resource names and the provider type-token grammar.
//!
//! A URN has the form `urn:pulumi:<stack>::<project>::<type>::<name>`.
//! Provider resources use a type token of `pulumi:providers:<package>`,
//! where the package is the last colon-separated segment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every provider resource type token.
const PROVIDERS_TYPE_PREFIX: &str = "pulumi:providers:";

/// Number of `::`-separated segments in a well-formed URN.
const URN_SEGMENTS: usize = 4;

/// A hierarchical name identifying a resource within a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Urn(String);

impl Urn {
    pub fn new(urn: impl Into<String>) -> Self {
        Urn(urn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The resource type token (third `::` segment), or `""` when malformed.
    pub fn type_token(&self) -> &str {
        self.0.splitn(URN_SEGMENTS, "::").nth(2).unwrap_or("")
    }

    /// The resource name (fourth `::` segment), or `""` when malformed.
    pub fn name(&self) -> &str {
        self.0.splitn(URN_SEGMENTS, "::").nth(3).unwrap_or("")
    }

    /// Returns true if this URN names a provider resource.
    pub fn is_provider_type(&self) -> bool {
        is_provider_type(self.type_token())
    }

    /// The provider package implemented by this URN's type, if it is a
    /// provider type.
    pub fn provider_package(&self) -> Option<PackageName> {
        provider_package(self.type_token())
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Urn {
    fn from(urn: &str) -> Self {
        Urn(urn.to_string())
    }
}

impl From<String> for Urn {
    fn from(urn: String) -> Self {
        Urn(urn)
    }
}

/// The namespace of resource types implemented by a single plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        PackageName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(name: &str) -> Self {
        PackageName(name.to_string())
    }
}

impl From<String> for PackageName {
    fn from(name: String) -> Self {
        PackageName(name)
    }
}

/// Returns true if the given type token names a provider resource: it lives
/// in the providers namespace and carries a non-empty package name.
pub fn is_provider_type(type_token: &str) -> bool {
    provider_package(type_token).is_some()
}

/// Extracts the package name from a provider type token, taking the last
/// colon-separated segment after the providers namespace.
pub fn provider_package(type_token: &str) -> Option<PackageName> {
    let rest = type_token.strip_prefix(PROVIDERS_TYPE_PREFIX)?;
    let package = rest.rsplit(':').next().unwrap_or("");
    if package.is_empty() {
        return None;
    }
    Some(PackageName::from(package))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urn_segments() {
        let urn = Urn::from("urn:pulumi:dev::proj::pulumi:providers:aws::a");
        assert_eq!(urn.type_token(), "pulumi:providers:aws");
        assert_eq!(urn.name(), "a");
    }

    #[test]
    fn provider_type_detection() {
        assert!(is_provider_type("pulumi:providers:aws"));
        assert!(is_provider_type("pulumi:providers:kubernetes"));
        assert!(!is_provider_type("pulumi:providers:"));
        assert!(!is_provider_type("aws:s3/bucket:Bucket"));
        assert!(!is_provider_type(""));
    }

    #[test]
    fn package_is_last_colon_segment() {
        assert_eq!(
            provider_package("pulumi:providers:aws"),
            Some(PackageName::from("aws"))
        );
        assert_eq!(provider_package("aws:s3/bucket:Bucket"), None);
    }

    #[test]
    fn malformed_urn_has_empty_components() {
        let urn = Urn::from("not-a-urn");
        assert_eq!(urn.type_token(), "");
        assert_eq!(urn.name(), "");
        assert!(!urn.is_provider_type());
    }

    #[test]
    fn urn_display_round_trips() {
        let raw = "urn:pulumi:dev::proj::pulumi:providers:aws::a";
        assert_eq!(Urn::from(raw).to_string(), raw);
    }
}
