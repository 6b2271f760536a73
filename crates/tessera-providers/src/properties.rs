// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reserved input properties on provider resources.
//!
//! Every provider resource's property map may carry a `"version"` (a
//! tolerant semver string) and a `"pluginDownloadURL"` (a download server
//! URL). The registry reads them to decide which plugin to load.

use semver::Version;
use serde_json::Value;

use tessera_core::types::PropertyMap;
use tessera_core::version::parse_tolerant;
use tessera_core::TesseraError;

/// Property key naming the provider plugin version.
pub const VERSION_KEY: &str = "version";

/// Property key naming the plugin download server URL.
pub const PLUGIN_DOWNLOAD_URL_KEY: &str = "pluginDownloadURL";

/// Fetches and parses the provider version recorded in the given property
/// map, or `None` when the property is absent.
pub fn provider_version(inputs: &PropertyMap) -> Result<Option<Version>, TesseraError> {
    let Some(value) = inputs.get(VERSION_KEY) else {
        return Ok(None);
    };
    let version = value.as_str().ok_or_else(|| TesseraError::PropertyType {
        key: VERSION_KEY.to_string(),
    })?;
    parse_tolerant(version).map(Some)
}

/// Records a provider version in the given property map.
pub fn set_provider_version(inputs: &mut PropertyMap, version: &Version) {
    inputs.insert(VERSION_KEY.to_string(), Value::String(version.to_string()));
}

/// Fetches the plugin download server URL recorded in the given property
/// map, or `None` when the property is absent.
pub fn provider_download_url(inputs: &PropertyMap) -> Result<Option<String>, TesseraError> {
    let Some(value) = inputs.get(PLUGIN_DOWNLOAD_URL_KEY) else {
        return Ok(None);
    };
    let url = value.as_str().ok_or_else(|| TesseraError::PropertyType {
        key: PLUGIN_DOWNLOAD_URL_KEY.to_string(),
    })?;
    Ok(Some(url.to_string()))
}

/// Records a plugin download server URL in the given property map.
pub fn set_provider_download_url(inputs: &mut PropertyMap, url: &str) {
    inputs.insert(
        PLUGIN_DOWNLOAD_URL_KEY.to_string(),
        Value::String(url.to_string()),
    );
}
