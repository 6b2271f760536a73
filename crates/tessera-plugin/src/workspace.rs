// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The package workspace contract consumed by the plugin loader.
//!
//! The workspace knows how to talk to plugin registries: resolve latest
//! versions, download artifacts (with its own retry schedule), and install
//! them into the local plugin cache. It is injected into the registry so
//! tests can script it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use semver::Version;

use tessera_core::TesseraError;

use crate::spec::PluginSpec;

/// Invoked once when the download stream begins, with the payload size in
/// bytes when the server reports one.
pub type DownloadBeginObserver<'a> = &'a (dyn Fn(Option<u64>) + Send + Sync);

/// Invoked between download attempts with the failure, the attempt number,
/// the attempt limit, and the delay before the next try.
pub type DownloadRetryObserver<'a> = &'a (dyn Fn(&TesseraError, u32, u32, Duration) + Send + Sync);

#[async_trait]
pub trait PluginWorkspace: Send + Sync {
    /// Downloads the plugin artifact to a local file, reporting progress
    /// through the observers. The retry schedule is the workspace's.
    async fn download_to_file(
        &self,
        spec: &PluginSpec,
        on_begin: DownloadBeginObserver<'_>,
        on_retry: DownloadRetryObserver<'_>,
    ) -> Result<PathBuf, TesseraError>;

    /// Installs a downloaded artifact into the plugin cache.
    async fn install(
        &self,
        spec: &PluginSpec,
        path: &Path,
        reinstall: bool,
    ) -> Result<(), TesseraError>;

    /// Resolves the latest published version matching the spec.
    async fn get_latest_version(&self, spec: &PluginSpec) -> Result<Version, TesseraError>;
}
