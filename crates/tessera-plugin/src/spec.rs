// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin specs: everything the workspace needs to fetch and install one
//! plugin.

use std::collections::HashMap;

use semver::Version;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The kind of a plugin binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// A resource provider plugin.
    Resource,
    /// A static analyzer plugin.
    Analyzer,
    /// A language runtime plugin.
    Language,
}

/// Describes one plugin to download and install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub kind: PluginKind,
    pub name: String,
    /// The version to fetch; resolved to the latest published version when
    /// absent.
    pub version: Option<Version>,
    /// A plugin download server overriding the default registry.
    pub plugin_download_url: Option<String>,
    /// Expected artifact checksums, keyed by platform triple.
    pub checksums: Option<HashMap<String, Vec<u8>>>,
}

impl PluginSpec {
    /// The spec for a resource provider plugin.
    pub fn resource(
        name: impl Into<String>,
        version: Option<Version>,
        plugin_download_url: Option<String>,
        checksums: Option<HashMap<String, Vec<u8>>>,
    ) -> Self {
        PluginSpec {
            kind: PluginKind::Resource,
            name: name.into(),
            version,
            plugin_download_url,
            checksums,
        }
    }

    /// The conventional binary name, e.g. `pulumi-resource-aws`.
    pub fn binary_name(&self) -> String {
        format!("pulumi-{}-{}", self.kind, self.name)
    }
}
