// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resource provider contract.
//!
//! Every provider plugin exposes this capability set, and so does the
//! provider registry itself: a caller holding a `dyn ResourceProvider`
//! never needs to know whether it is talking to a real plugin or to the
//! registry brokering many of them.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::TesseraError;
use crate::types::{
    CallInfo, CallOptions, CallResult, CheckResult, ConstructInfo, ConstructOptions,
    ConstructResult, CreateResult, DiffResult, InvokeResult, PluginInfo, PropertyMap, ReadResult,
    ResourceId, Status,
};
use crate::urn::{PackageName, Urn};

/// A configured instance of a provider plugin.
///
/// Lifecycle: a provider is created by the plugin loader, configured at
/// most once before any CRUD method runs, and closed exactly once. The
/// registry owns enforcement of that discipline; implementations may
/// assume it.
///
/// Surfaces not every provider exposes (`get_schema`, `construct`,
/// `invoke`, ...) default to an unsupported-operation error.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// The package of resource types this provider implements.
    fn pkg(&self) -> PackageName;

    /// Returns the JSON-serialized schema for this provider's package.
    async fn get_schema(&self, _version: i32) -> Result<Vec<u8>, TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not expose a schema",
        ))
    }

    /// Returns the mapping data for the named conversion key, along with
    /// the provider the mapping belongs to.
    async fn get_mapping(&self, _key: &str) -> Result<(Vec<u8>, String), TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not expose mappings",
        ))
    }

    /// Validates the configuration this provider would be configured with.
    async fn check_config(
        &self,
        urn: &Urn,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
    ) -> Result<CheckResult, TesseraError>;

    /// Reports what impact a hypothetical configuration change would have
    /// on this provider.
    async fn diff_config(
        &self,
        urn: &Urn,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
        ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError>;

    /// Configures this provider. Must be called at most once, before any
    /// resource CRUD method.
    async fn configure(&self, inputs: &PropertyMap) -> Result<(), TesseraError>;

    /// Validates inputs for a resource of one of this provider's types.
    async fn check(
        &self,
        urn: &Urn,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
        random_seed: Option<&[u8]>,
    ) -> Result<CheckResult, TesseraError>;

    /// Diffs a resource's recorded inputs against its new inputs.
    async fn diff(
        &self,
        urn: &Urn,
        id: &ResourceId,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
        ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError>;

    /// Creates a resource from the given inputs.
    async fn create(
        &self,
        urn: &Urn,
        news: &PropertyMap,
        timeout: f64,
        preview: bool,
    ) -> Result<CreateResult, TesseraError>;

    /// Reads the live state of an existing resource.
    async fn read(
        &self,
        urn: &Urn,
        id: &ResourceId,
        inputs: &PropertyMap,
        state: &PropertyMap,
    ) -> Result<(ReadResult, Status), TesseraError>;

    /// Updates an existing resource to match the given inputs.
    async fn update(
        &self,
        urn: &Urn,
        id: &ResourceId,
        olds: &PropertyMap,
        news: &PropertyMap,
        timeout: f64,
        ignore_changes: &[String],
        preview: bool,
    ) -> Result<(PropertyMap, Status), TesseraError>;

    /// Deletes an existing resource.
    async fn delete(
        &self,
        urn: &Urn,
        id: &ResourceId,
        props: &PropertyMap,
        timeout: f64,
    ) -> Result<Status, TesseraError>;

    /// Constructs a component resource.
    async fn construct(
        &self,
        _info: &ConstructInfo,
        _type_token: &str,
        _name: &str,
        _parent: Option<&Urn>,
        _inputs: &PropertyMap,
        _options: &ConstructOptions,
    ) -> Result<ConstructResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not support component construction",
        ))
    }

    /// Invokes a provider function.
    async fn invoke(&self, _token: &str, _args: &PropertyMap) -> Result<InvokeResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not support invokes",
        ))
    }

    /// Invokes a provider function whose results arrive as a stream.
    async fn stream_invoke(
        &self,
        _token: &str,
        _args: &PropertyMap,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<PropertyMap, TesseraError>> + Send>>, TesseraError>
    {
        Err(TesseraError::Unsupported(
            "this provider does not support streaming invokes",
        ))
    }

    /// Calls a method on a provider-managed resource.
    async fn call(
        &self,
        _token: &str,
        _args: &PropertyMap,
        _info: &CallInfo,
        _options: &CallOptions,
    ) -> Result<CallResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not support calls",
        ))
    }

    /// Metadata about the plugin backing this provider.
    async fn get_plugin_info(&self) -> Result<PluginInfo, TesseraError> {
        Err(TesseraError::Unsupported(
            "this provider does not report plugin info",
        ))
    }

    /// Asks the provider to gracefully cancel in-flight operations.
    async fn signal_cancellation(&self) -> Result<(), TesseraError> {
        Ok(())
    }

    /// Shuts the provider down, releasing its plugin process.
    async fn close(&self) -> Result<(), TesseraError> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn ResourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceProvider")
            .field("pkg", &self.pkg())
            .finish()
    }
}
