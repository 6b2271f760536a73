// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider resource management for the Tessera deployment engine.
//!
//! Providers are first-class resources: they have URNs, IDs, inputs, and
//! lifecycles, and may be replaced by configuration changes. This crate
//! implements the registry that mediates between the deployment engine and
//! provider plugins: it loads plugins on demand, configures them, tracks
//! every live `(URN, ID)` reference, and presents itself to the engine as
//! just another provider whose resource type happens to be "provider".

pub mod properties;
pub mod reference;
pub mod registry;

pub use properties::{
    provider_download_url, provider_version, set_provider_download_url, set_provider_version,
    PLUGIN_DOWNLOAD_URL_KEY, VERSION_KEY,
};
pub use reference::{Reference, UNKNOWN_ID};
pub use registry::{PriorProviderState, Registry};
