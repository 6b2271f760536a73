// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams between the engine and its collaborators.

pub mod host;
pub mod provider;

pub use host::PluginHost;
pub use provider::ResourceProvider;
