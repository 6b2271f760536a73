// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A counting mock plugin host.
//!
//! `MockPluginHost` serves scripted providers per package, records every
//! provider request and close call (so tests can assert close-exactly-once),
//! and captures diagnostic log lines.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use semver::Version;

use tessera_core::types::LogSeverity;
use tessera_core::urn::PackageName;
use tessera_core::{PluginHost, ResourceProvider, TesseraError};

enum ScriptedResponse {
    Missing,
    Error(String),
    Provider(Arc<dyn ResourceProvider>),
}

/// A mock plugin host with scripted per-package responses.
///
/// `provider` first drains any scripted responses for the package, then
/// falls back to the persistently served provider, then reports the plugin
/// missing.
#[derive(Default)]
pub struct MockPluginHost {
    served: Mutex<HashMap<PackageName, Arc<dyn ResourceProvider>>>,
    scripted: Mutex<HashMap<PackageName, VecDeque<ScriptedResponse>>>,
    requests: Mutex<Vec<(PackageName, Option<Version>)>>,
    closed: Mutex<Vec<Arc<dyn ResourceProvider>>>,
    close_error: Mutex<Option<String>>,
    logs: Mutex<Vec<(LogSeverity, String)>>,
}

impl MockPluginHost {
    pub fn new() -> Self {
        MockPluginHost::default()
    }

    /// Persistently serves the given provider for a package.
    pub fn serve(&self, pkg: &str, provider: Arc<dyn ResourceProvider>) {
        self.served
            .lock()
            .expect("mock host lock poisoned")
            .insert(PackageName::from(pkg), provider);
    }

    /// Scripts the next `provider` call for the package to report the
    /// plugin missing.
    pub fn enqueue_missing(&self, pkg: &str) {
        self.enqueue(pkg, ScriptedResponse::Missing);
    }

    /// Scripts the next `provider` call for the package to fail.
    pub fn enqueue_error(&self, pkg: &str, message: &str) {
        self.enqueue(pkg, ScriptedResponse::Error(message.to_string()));
    }

    /// Scripts the next `provider` call for the package to return the
    /// given provider.
    pub fn enqueue_provider(&self, pkg: &str, provider: Arc<dyn ResourceProvider>) {
        self.enqueue(pkg, ScriptedResponse::Provider(provider));
    }

    /// Makes every `close_provider` call fail with the given message while
    /// still counting it.
    pub fn fail_closes_with(&self, message: &str) {
        *self.close_error.lock().expect("mock host lock poisoned") = Some(message.to_string());
    }

    fn enqueue(&self, pkg: &str, response: ScriptedResponse) {
        self.scripted
            .lock()
            .expect("mock host lock poisoned")
            .entry(PackageName::from(pkg))
            .or_default()
            .push_back(response);
    }

    /// Every `(package, version)` pair `provider` has been asked for.
    pub fn provider_requests(&self) -> Vec<(PackageName, Option<Version>)> {
        self.requests
            .lock()
            .expect("mock host lock poisoned")
            .clone()
    }

    /// How many times `close_provider` was called with the given handle.
    pub fn close_count(&self, provider: &Arc<dyn ResourceProvider>) -> usize {
        self.closed
            .lock()
            .expect("mock host lock poisoned")
            .iter()
            .filter(|closed| Arc::ptr_eq(closed, provider))
            .count()
    }

    /// Total number of `close_provider` calls across all handles.
    pub fn total_closes(&self) -> usize {
        self.closed.lock().expect("mock host lock poisoned").len()
    }

    /// Every log line emitted through the host, in order.
    pub fn logs(&self) -> Vec<(LogSeverity, String)> {
        self.logs.lock().expect("mock host lock poisoned").clone()
    }

    /// Returns true if any captured log line contains the given fragment.
    pub fn has_log(&self, fragment: &str) -> bool {
        self.logs()
            .iter()
            .any(|(_, message)| message.contains(fragment))
    }
}

#[async_trait]
impl PluginHost for MockPluginHost {
    async fn provider(
        &self,
        pkg: &PackageName,
        version: Option<&Version>,
    ) -> Result<Arc<dyn ResourceProvider>, TesseraError> {
        self.requests
            .lock()
            .expect("mock host lock poisoned")
            .push((pkg.clone(), version.cloned()));

        let scripted = self
            .scripted
            .lock()
            .expect("mock host lock poisoned")
            .get_mut(pkg)
            .and_then(VecDeque::pop_front);
        if let Some(response) = scripted {
            return match response {
                ScriptedResponse::Missing => Err(TesseraError::MissingPlugin {
                    name: pkg.to_string(),
                    version: version.cloned(),
                }),
                ScriptedResponse::Error(message) => Err(TesseraError::Plugin {
                    message,
                    source: None,
                }),
                ScriptedResponse::Provider(provider) => Ok(provider),
            };
        }

        match self
            .served
            .lock()
            .expect("mock host lock poisoned")
            .get(pkg)
        {
            Some(provider) => Ok(Arc::clone(provider)),
            None => Err(TesseraError::MissingPlugin {
                name: pkg.to_string(),
                version: version.cloned(),
            }),
        }
    }

    async fn close_provider(
        &self,
        provider: &Arc<dyn ResourceProvider>,
    ) -> Result<(), TesseraError> {
        self.closed
            .lock()
            .expect("mock host lock poisoned")
            .push(Arc::clone(provider));
        match &*self.close_error.lock().expect("mock host lock poisoned") {
            Some(message) => Err(TesseraError::Plugin {
                message: message.clone(),
                source: None,
            }),
            None => Ok(()),
        }
    }

    fn log(&self, severity: LogSeverity, message: &str, _stream_id: i32) {
        self.logs
            .lock()
            .expect("mock host lock poisoned")
            .push((severity, message.to_string()));
    }
}
