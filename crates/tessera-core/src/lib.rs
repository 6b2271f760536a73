// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tessera deployment engine.
//!
//! This crate provides the foundational trait definitions, error types,
//! and common types shared across the Tessera workspace: the resource
//! provider contract implemented by plugins (and by the provider registry
//! itself), the plugin host seam, URNs and the provider type grammar, and
//! tolerant version parsing.

pub mod error;
pub mod traits;
pub mod types;
pub mod urn;
pub mod version;

// Re-export key items at crate root for ergonomic imports.
pub use error::{InstallProviderError, TesseraError};
pub use traits::{PluginHost, ResourceProvider};
pub use types::{
    CheckFailure, CheckResult, CreateResult, DiffChanges, DiffResult, LogSeverity, PropertyMap,
    ResourceId, Status,
};
pub use urn::{PackageName, Urn};
