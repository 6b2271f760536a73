// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A scriptable resource provider for deterministic testing.
//!
//! `MockResourceProvider` implements the configuration surface the
//! registry exercises (`check_config`, `diff_config`, `configure`) with
//! pre-configured outcomes, and records every configuration it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use tessera_core::types::{
    CheckFailure, CheckResult, CreateResult, DiffResult, PropertyMap, ReadResult, ResourceId,
    Status,
};
use tessera_core::urn::{PackageName, Urn};
use tessera_core::{ResourceProvider, TesseraError};

fn plugin_error(message: &str) -> TesseraError {
    TesseraError::Plugin {
        message: message.to_string(),
        source: None,
    }
}

/// A mock provider plugin with scriptable check/diff/configure outcomes.
///
/// By default `check_config` echoes the new inputs, `diff_config` reports
/// an unknown diff, and `configure` succeeds.
pub struct MockResourceProvider {
    pkg: PackageName,
    check_failures: Vec<CheckFailure>,
    check_error: Option<String>,
    diff_result: Option<DiffResult>,
    diff_error: Option<String>,
    configure_error: Option<String>,
    configure_inputs: Mutex<Vec<PropertyMap>>,
}

impl MockResourceProvider {
    pub fn new(pkg: &str) -> Self {
        MockResourceProvider {
            pkg: PackageName::from(pkg),
            check_failures: Vec::new(),
            check_error: None,
            diff_result: None,
            diff_error: None,
            configure_error: None,
            configure_inputs: Mutex::new(Vec::new()),
        }
    }

    /// Scripts `check_config` to reject its inputs with the given failure.
    pub fn with_check_failure(mut self, property: &str, reason: &str) -> Self {
        self.check_failures.push(CheckFailure {
            property: property.to_string(),
            reason: reason.to_string(),
        });
        self
    }

    /// Scripts `check_config` to fail outright.
    pub fn with_check_error(mut self, message: &str) -> Self {
        self.check_error = Some(message.to_string());
        self
    }

    /// Scripts the diff `diff_config` reports.
    pub fn with_diff(mut self, diff: DiffResult) -> Self {
        self.diff_result = Some(diff);
        self
    }

    /// Scripts `diff_config` to fail outright.
    pub fn with_diff_error(mut self, message: &str) -> Self {
        self.diff_error = Some(message.to_string());
        self
    }

    /// Scripts `configure` to reject its inputs.
    pub fn with_configure_error(mut self, message: &str) -> Self {
        self.configure_error = Some(message.to_string());
        self
    }

    /// Every property map this provider has been configured with, in order.
    pub fn configure_calls(&self) -> Vec<PropertyMap> {
        self.configure_inputs
            .lock()
            .expect("mock provider lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ResourceProvider for MockResourceProvider {
    fn pkg(&self) -> PackageName {
        self.pkg.clone()
    }

    async fn check_config(
        &self,
        _urn: &Urn,
        _olds: &PropertyMap,
        news: &PropertyMap,
        _allow_unknowns: bool,
    ) -> Result<CheckResult, TesseraError> {
        if let Some(message) = &self.check_error {
            return Err(plugin_error(message));
        }
        if !self.check_failures.is_empty() {
            return Ok(CheckResult::failures(self.check_failures.clone()));
        }
        Ok(CheckResult::inputs(news.clone()))
    }

    async fn diff_config(
        &self,
        _urn: &Urn,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _allow_unknowns: bool,
        _ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError> {
        if let Some(message) = &self.diff_error {
            return Err(plugin_error(message));
        }
        Ok(self.diff_result.clone().unwrap_or_default())
    }

    async fn configure(&self, inputs: &PropertyMap) -> Result<(), TesseraError> {
        self.configure_inputs
            .lock()
            .expect("mock provider lock poisoned")
            .push(inputs.clone());
        match &self.configure_error {
            Some(message) => Err(plugin_error(message)),
            None => Ok(()),
        }
    }

    async fn check(
        &self,
        _urn: &Urn,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _allow_unknowns: bool,
        _random_seed: Option<&[u8]>,
    ) -> Result<CheckResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }

    async fn diff(
        &self,
        _urn: &Urn,
        _id: &ResourceId,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _allow_unknowns: bool,
        _ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }

    async fn create(
        &self,
        _urn: &Urn,
        _news: &PropertyMap,
        _timeout: f64,
        _preview: bool,
    ) -> Result<CreateResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }

    async fn read(
        &self,
        _urn: &Urn,
        _id: &ResourceId,
        _inputs: &PropertyMap,
        _state: &PropertyMap,
    ) -> Result<(ReadResult, Status), TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }

    async fn update(
        &self,
        _urn: &Urn,
        _id: &ResourceId,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _timeout: f64,
        _ignore_changes: &[String],
        _preview: bool,
    ) -> Result<(PropertyMap, Status), TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }

    async fn delete(
        &self,
        _urn: &Urn,
        _id: &ResourceId,
        _props: &PropertyMap,
        _timeout: f64,
    ) -> Result<Status, TesseraError> {
        Err(TesseraError::Unsupported(
            "the mock provider does not implement resource operations",
        ))
    }
}
