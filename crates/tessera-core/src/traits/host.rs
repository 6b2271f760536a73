// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin host contract consumed by the provider registry.
//!
//! The host owns plugin processes: it can spawn a provider plugin for a
//! package, hand back a CRUD handle, and tear the process down again. The
//! registry never manages OS processes itself.

use std::sync::Arc;

use async_trait::async_trait;
use semver::Version;

use crate::error::TesseraError;
use crate::traits::provider::ResourceProvider;
use crate::types::LogSeverity;
use crate::urn::PackageName;

#[async_trait]
pub trait PluginHost: Send + Sync {
    /// Spawns (or reuses) the provider plugin for the given package. A
    /// [`TesseraError::MissingPlugin`] failure signals that an on-demand
    /// install is worth attempting.
    async fn provider(
        &self,
        pkg: &PackageName,
        version: Option<&Version>,
    ) -> Result<Arc<dyn ResourceProvider>, TesseraError>;

    /// Shuts down the plugin process behind the given provider handle.
    /// Safe to call on a handle whose process already exited.
    async fn close_provider(
        &self,
        provider: &Arc<dyn ResourceProvider>,
    ) -> Result<(), TesseraError>;

    /// Emits a diagnostic message to the user. Non-blocking; delivery is
    /// best-effort.
    fn log(&self, severity: LogSeverity, message: &str, stream_id: i32);
}
