// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the provider traits and the engine.

use std::fmt;
use std::path::PathBuf;

use semver::Version;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::urn::Urn;

/// A bag of resource properties, as recorded in state and exchanged with
/// provider plugins. Deep equality is plain `==`.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// The identifier a provider assigns to a live resource. Empty until the
/// resource has been created outside of a preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId(id)
    }
}

/// A single validation failure reported by a provider's check phase,
/// attached to the offending property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub property: String,
    pub reason: String,
}

/// The result of checking resource inputs: either the checked inputs, or
/// the validation failures that reject them.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub inputs: Option<PropertyMap>,
    pub failures: Vec<CheckFailure>,
}

impl CheckResult {
    pub fn inputs(inputs: PropertyMap) -> Self {
        CheckResult {
            inputs: Some(inputs),
            failures: Vec::new(),
        }
    }

    pub fn failures(failures: Vec<CheckFailure>) -> Self {
        CheckResult {
            inputs: None,
            failures,
        }
    }
}

/// Whether a diff detected changes. Plugins may report `Unknown`, which the
/// engine normalizes by comparing old and new inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
pub enum DiffChanges {
    #[default]
    Unknown,
    None,
    Some,
}

/// The outcome of diffing a resource's properties.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub changes: DiffChanges,
    /// Properties whose change forces a replacement of the resource.
    pub replace_keys: Vec<String>,
    /// Properties guaranteed not to change.
    pub stable_keys: Vec<String>,
    /// Properties that changed, replacement-forcing or not.
    pub changed_keys: Vec<String>,
    /// Whether the replacement must delete the old resource first.
    pub delete_before_replace: bool,
}

impl DiffResult {
    /// Returns true if this diff requires the resource to be replaced.
    pub fn replace(&self) -> bool {
        !self.replace_keys.is_empty() || self.delete_before_replace
    }
}

/// Completion status of a resource operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Status {
    Ok,
    Unknown,
    PartialFailure,
}

/// The result of creating a resource.
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub id: ResourceId,
    pub outputs: PropertyMap,
    pub status: Status,
}

/// The result of reading a live resource's state.
#[derive(Debug, Clone, Default)]
pub struct ReadResult {
    pub id: ResourceId,
    pub inputs: Option<PropertyMap>,
    pub outputs: Option<PropertyMap>,
}

/// The result of a provider function invocation.
#[derive(Debug, Clone, Default)]
pub struct InvokeResult {
    pub outputs: PropertyMap,
    pub failures: Vec<CheckFailure>,
}

/// Deployment context for a component construction.
#[derive(Debug, Clone, Default)]
pub struct ConstructInfo {
    pub project: String,
    pub stack: String,
    pub dry_run: bool,
    pub parallel: u32,
}

/// Options governing a component construction.
#[derive(Debug, Clone, Default)]
pub struct ConstructOptions {
    pub parent: Option<Urn>,
    pub protect: bool,
    pub aliases: Vec<Urn>,
}

/// The result of constructing a component resource.
#[derive(Debug, Clone, Default)]
pub struct ConstructResult {
    pub urn: Option<Urn>,
    pub outputs: PropertyMap,
}

/// Deployment context for a provider method call.
#[derive(Debug, Clone, Default)]
pub struct CallInfo {
    pub project: String,
    pub stack: String,
    pub dry_run: bool,
}

/// Options governing a provider method call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub arg_dependencies: Vec<Urn>,
}

/// The result of a provider method call.
#[derive(Debug, Clone, Default)]
pub struct CallResult {
    pub outputs: PropertyMap,
    pub failures: Vec<CheckFailure>,
}

/// Metadata a plugin reports about itself.
#[derive(Debug, Clone, Default)]
pub struct PluginInfo {
    pub name: String,
    pub version: Option<Version>,
    pub path: Option<PathBuf>,
}

/// Severity of a diagnostic message routed through the plugin host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum LogSeverity {
    Debug,
    Info,
    Warning,
    Error,
}
