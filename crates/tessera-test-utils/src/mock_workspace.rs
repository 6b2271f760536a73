// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A scriptable package workspace.
//!
//! `MockPluginWorkspace` downloads into a temp directory (cleaned up on
//! drop), records every download and install, and can be scripted to fail
//! either step or to report retry attempts through the observers.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use semver::Version;

use tessera_core::TesseraError;
use tessera_plugin::spec::PluginSpec;
use tessera_plugin::workspace::{DownloadBeginObserver, DownloadRetryObserver, PluginWorkspace};

fn workspace_error(message: &str) -> TesseraError {
    TesseraError::Plugin {
        message: message.to_string(),
        source: None,
    }
}

/// A mock workspace with scriptable download/install/latest outcomes.
pub struct MockPluginWorkspace {
    latest_version: Option<Version>,
    download_error: Option<String>,
    install_error: Option<String>,
    download_retries: u32,
    downloads: Mutex<Vec<PluginSpec>>,
    installs: Mutex<Vec<(PluginSpec, PathBuf)>>,
    temp: tempfile::TempDir,
}

impl MockPluginWorkspace {
    pub fn new() -> Self {
        MockPluginWorkspace {
            latest_version: None,
            download_error: None,
            install_error: None,
            download_retries: 0,
            downloads: Mutex::new(Vec::new()),
            installs: Mutex::new(Vec::new()),
            temp: tempfile::TempDir::new().expect("temp dir for mock workspace"),
        }
    }

    /// Scripts the latest published version of every plugin.
    pub fn with_latest_version(mut self, version: Version) -> Self {
        self.latest_version = Some(version);
        self
    }

    /// Scripts downloads to fail with the given message.
    pub fn with_download_error(mut self, message: &str) -> Self {
        self.download_error = Some(message.to_string());
        self
    }

    /// Scripts installs to fail with the given message.
    pub fn with_install_error(mut self, message: &str) -> Self {
        self.install_error = Some(message.to_string());
        self
    }

    /// Scripts downloads to report the given number of retry attempts
    /// through the retry observer before resolving.
    pub fn with_download_retries(mut self, retries: u32) -> Self {
        self.download_retries = retries;
        self
    }

    /// Every spec a download was requested for, in order.
    pub fn downloads(&self) -> Vec<PluginSpec> {
        self.downloads
            .lock()
            .expect("mock workspace lock poisoned")
            .clone()
    }

    /// Every spec installed, in order.
    pub fn installs(&self) -> Vec<PluginSpec> {
        self.installs
            .lock()
            .expect("mock workspace lock poisoned")
            .iter()
            .map(|(spec, _)| spec.clone())
            .collect()
    }
}

impl Default for MockPluginWorkspace {
    fn default() -> Self {
        MockPluginWorkspace::new()
    }
}

#[async_trait]
impl PluginWorkspace for MockPluginWorkspace {
    async fn download_to_file(
        &self,
        spec: &PluginSpec,
        on_begin: DownloadBeginObserver<'_>,
        on_retry: DownloadRetryObserver<'_>,
    ) -> Result<PathBuf, TesseraError> {
        self.downloads
            .lock()
            .expect("mock workspace lock poisoned")
            .push(spec.clone());

        let attempts = self.download_retries + 1;
        for attempt in 1..=self.download_retries {
            on_retry(
                &workspace_error("connection reset by peer"),
                attempt,
                attempts,
                Duration::from_millis(500),
            );
        }

        if let Some(message) = &self.download_error {
            return Err(workspace_error(message));
        }

        on_begin(Some(0));
        let path = self.temp.path().join(format!("{}.tar.gz", spec.binary_name()));
        std::fs::write(&path, b"").map_err(|err| {
            TesseraError::Internal(format!("could not write downloaded artifact: {err}"))
        })?;
        Ok(path)
    }

    async fn install(
        &self,
        spec: &PluginSpec,
        path: &Path,
        _reinstall: bool,
    ) -> Result<(), TesseraError> {
        self.installs
            .lock()
            .expect("mock workspace lock poisoned")
            .push((spec.clone(), path.to_path_buf()));
        match &self.install_error {
            Some(message) => Err(workspace_error(message)),
            None => Ok(()),
        }
    }

    async fn get_latest_version(&self, spec: &PluginSpec) -> Result<Version, TesseraError> {
        self.latest_version.clone().ok_or_else(|| {
            workspace_error(&format!("no released versions found for plugin {}", spec.name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aws_spec() -> PluginSpec {
        PluginSpec::resource("aws", Some(Version::new(2, 0, 0)), None, None)
    }

    #[tokio::test]
    async fn download_writes_a_real_file_and_fires_begin() {
        let workspace = MockPluginWorkspace::new();
        let begun = Mutex::new(0u32);
        let on_begin = |_size: Option<u64>| {
            *begun.lock().unwrap() += 1;
        };
        let on_retry = |_: &TesseraError, _: u32, _: u32, _: Duration| {};

        let path = workspace
            .download_to_file(&aws_spec(), &on_begin, &on_retry)
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(*begun.lock().unwrap(), 1);
        assert_eq!(workspace.downloads().len(), 1);
    }

    #[tokio::test]
    async fn scripted_retries_fire_observer() {
        let workspace = MockPluginWorkspace::new().with_download_retries(3);
        let retries = Mutex::new(0u32);
        let on_begin = |_size: Option<u64>| {};
        let on_retry = |_: &TesseraError, _: u32, _: u32, _: Duration| {
            *retries.lock().unwrap() += 1;
        };

        workspace
            .download_to_file(&aws_spec(), &on_begin, &on_retry)
            .await
            .unwrap();

        assert_eq!(*retries.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn scripted_download_error_skips_begin() {
        let workspace = MockPluginWorkspace::new().with_download_error("403 forbidden");
        let begun = Mutex::new(0u32);
        let on_begin = |_size: Option<u64>| {
            *begun.lock().unwrap() += 1;
        };
        let on_retry = |_: &TesseraError, _: u32, _: u32, _: Duration| {};

        let err = workspace
            .download_to_file(&aws_spec(), &on_begin, &on_retry)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "403 forbidden");
        assert_eq!(*begun.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn latest_version_defaults_to_an_error() {
        let workspace = MockPluginWorkspace::new();
        assert!(workspace.get_latest_version(&aws_spec()).await.is_err());

        let scripted = MockPluginWorkspace::new().with_latest_version(Version::new(3, 0, 0));
        assert_eq!(
            scripted.get_latest_version(&aws_spec()).await.unwrap(),
            Version::new(3, 0, 0)
        );
    }
}
