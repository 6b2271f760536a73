// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-demand provider loading.
//!
//! The loader asks the plugin host for a provider and, when the plugin
//! binary is missing, falls back to downloading and installing it through
//! the workspace before asking the host a second time. Any other host
//! failure is returned unchanged.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use semver::Version;
use tracing::debug;

use tessera_core::{
    InstallProviderError, LogSeverity, PackageName, PluginHost, ResourceProvider, TesseraError,
};

use crate::spec::PluginSpec;
use crate::workspace::PluginWorkspace;

/// Obtains a live provider for the given package, downloading and
/// installing the plugin on demand.
///
/// A builtin provider whose `pkg()` matches shadows any installed plugin
/// of the same name. Only a missing-plugin failure from the host triggers
/// the install fallback; every other failure propagates unchanged.
pub async fn load_provider(
    pkg: &PackageName,
    version: Option<&Version>,
    download_url: Option<&str>,
    checksums: Option<&HashMap<String, Vec<u8>>>,
    host: &dyn PluginHost,
    workspace: &dyn PluginWorkspace,
    builtins: Option<&Arc<dyn ResourceProvider>>,
) -> Result<Arc<dyn ResourceProvider>, TesseraError> {
    if let Some(builtins) = builtins {
        if *pkg == builtins.pkg() {
            return Ok(Arc::clone(builtins));
        }
    }

    let err = match host.provider(pkg, version).await {
        Ok(provider) => return Ok(provider),
        Err(err) => err,
    };

    // The host may report a missing plugin when a transitively required
    // version was not picked up by the initial pass of required-plugin
    // installation. Instead of surfacing that, install the plugin now while
    // we still know the download URL and checksums, and only fail if the
    // install does.
    if !err.is_missing_plugin() {
        return Err(err);
    }

    let mut spec = PluginSpec::resource(
        pkg.as_str(),
        version.cloned(),
        download_url.map(str::to_string),
        checksums.cloned(),
    );

    if spec.version.is_none() {
        let latest = workspace.get_latest_version(&spec).await.map_err(|err| {
            err.context(format!(
                "could not find latest version for provider {}",
                spec.name
            ))
        })?;
        spec.version = Some(latest);
    }

    let name = spec.name.clone();
    let on_begin = move |_size: Option<u64>| {
        host.log(
            LogSeverity::Info,
            &format!("Downloading provider: {name}"),
            0,
        );
    };
    let on_retry = move |err: &TesseraError, attempt: u32, limit: u32, delay: Duration| {
        host.log(
            LogSeverity::Warning,
            &format!("error downloading provider: {err}\nWill retry in {delay:?} [{attempt}/{limit}]"),
            0,
        );
    };

    debug!("automatically downloading provider {}", spec.name);
    let downloaded = workspace
        .download_to_file(&spec, &on_begin, &on_retry)
        .await
        .map_err(|err| {
            install_error(
                pkg,
                version,
                download_url,
                err.context(format!("error downloading provider {pkg} to file")),
            )
        })?;

    debug!("automatically installing provider {}", spec.name);
    workspace
        .install(&spec, &downloaded, false)
        .await
        .map_err(|err| {
            install_error(
                pkg,
                version,
                download_url,
                err.context(format!("error installing provider {pkg}")),
            )
        })?;

    // The plugin is in place now; this second attempt should succeed.
    host.provider(pkg, version).await
}

fn install_error(
    pkg: &PackageName,
    version: Option<&Version>,
    download_url: Option<&str>,
    cause: TesseraError,
) -> TesseraError {
    InstallProviderError {
        name: pkg.to_string(),
        version: version.cloned(),
        plugin_download_url: download_url.map(str::to_string),
        source: Box::new(cause),
    }
    .into()
}

