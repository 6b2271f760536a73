// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin machinery for the Tessera deployment engine.
//!
//! This crate defines plugin specs, the workspace seam that downloads and
//! installs plugin artifacts, and the loader that obtains a live provider
//! for a package, installing its plugin on demand when the host reports it
//! missing.

pub mod loader;
pub mod spec;
pub mod workspace;

pub use loader::load_provider;
pub use spec::{PluginKind, PluginSpec};
pub use workspace::{DownloadBeginObserver, DownloadRetryObserver, PluginWorkspace};
