// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The provider registry.
//!
//! The registry manages the lifecycle of provider resources and their
//! plugins, and resolves provider references to loaded plugins. When a
//! registry is created it is handed the surviving provider resources from
//! the previous deployment; each is loaded, configured per its recorded
//! inputs, and registered under the reference formed from its URN and ID.
//! From then on the registry manages those providers and any new ones
//! requested through its CRUD operations.
//!
//! To fit the engine's uniform resource machinery, the registry itself
//! implements [`ResourceProvider`]: to the step executor a provider
//! resource is just another resource, whose provider happens to be the
//! registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use tessera_core::types::{
    CheckFailure, CheckResult, CreateResult, DiffChanges, DiffResult, PluginInfo, PropertyMap,
    ReadResult, ResourceId, Status,
};
use tessera_core::urn::{PackageName, Urn};
use tessera_core::{PluginHost, ResourceProvider, TesseraError};
use tessera_plugin::loader::load_provider;
use tessera_plugin::workspace::PluginWorkspace;

use crate::properties::{
    provider_download_url, provider_version, PLUGIN_DOWNLOAD_URL_KEY, VERSION_KEY,
};
use crate::reference::{Reference, UNKNOWN_ID};

const LABEL: &str = "ProviderRegistry";

/// A provider resource surviving from the previous deployment, as recorded
/// in its state.
#[derive(Debug, Clone)]
pub struct PriorProviderState {
    pub urn: Urn,
    pub id: ResourceId,
    pub inputs: PropertyMap,
}

/// The maps behind the registry. Guarded by a single readers-writer lock
/// whose guard never crosses an await: handles are cloned out and used
/// unlocked, which is safe because plugins serialize their own RPCs and
/// the step executor never targets the same `(urn, id)` concurrently.
struct RegistryState {
    providers: HashMap<Reference, Arc<dyn ResourceProvider>>,
    /// New URN to old URN, for rename continuity.
    aliases: HashMap<Urn, Urn>,
}

/// The provider registry. See the module docs for the lifecycle it
/// enforces.
pub struct Registry {
    host: Arc<dyn PluginHost>,
    workspace: Arc<dyn PluginWorkspace>,
    builtins: Option<Arc<dyn ResourceProvider>>,
    is_preview: bool,
    state: RwLock<RegistryState>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

impl Registry {
    /// Creates a registry over the given host and prior provider states.
    ///
    /// Every provider present in `prev` is loaded, configured, and
    /// registered under its reference. A provider that cannot be loaded or
    /// configured, lacks a known ID, or appears twice fails construction.
    pub async fn new(
        host: Arc<dyn PluginHost>,
        workspace: Arc<dyn PluginWorkspace>,
        prev: Vec<PriorProviderState>,
        is_preview: bool,
        builtins: Option<Arc<dyn ResourceProvider>>,
    ) -> Result<Registry, TesseraError> {
        let mut providers: HashMap<Reference, Arc<dyn ResourceProvider>> = HashMap::new();

        for res in prev {
            if !res.urn.is_provider_type() {
                debug!("ignoring non-provider resource '{}'", res.urn);
                continue;
            }

            if res.id.is_empty() || res.id.as_str() == UNKNOWN_ID {
                return Err(TesseraError::UnknownProviderId { urn: res.urn });
            }

            let reference = Reference::must_new(res.urn.clone(), res.id.clone());
            if providers.contains_key(&reference) {
                return Err(TesseraError::DuplicateProvider {
                    reference: reference.to_string(),
                });
            }

            let pkg = res
                .urn
                .provider_package()
                .expect("provider type token must carry a package");

            // Parse the provider version, then load, configure, and
            // register the provider.
            let version = provider_version(&res.inputs).map_err(|err| {
                err.context(format!(
                    "could not parse version for {pkg} provider '{}'",
                    res.urn
                ))
            })?;
            let download_url = provider_download_url(&res.inputs).map_err(|err| {
                err.context(format!(
                    "could not parse download URL for {pkg} provider '{}'",
                    res.urn
                ))
            })?;
            // Prior state does not record checksums yet; threaded as None.
            let provider = load_provider(
                &pkg,
                version.as_ref(),
                download_url.as_deref(),
                None,
                host.as_ref(),
                workspace.as_ref(),
                builtins.as_ref(),
            )
            .await
            .map_err(|err| {
                err.context(format!(
                    "could not load plugin for {pkg} provider '{}'",
                    res.urn
                ))
            })?;

            if let Err(err) = provider.configure(&res.inputs).await {
                if let Err(close_err) = host.close_provider(&provider).await {
                    debug!("ignoring close failure for provider '{}': {close_err}", res.urn);
                }
                return Err(err.context(format!("could not configure provider '{}'", res.urn)));
            }

            debug!("loaded provider {reference}");
            providers.insert(reference, provider);
        }

        Ok(Registry {
            host,
            workspace,
            builtins,
            is_preview,
            state: RwLock::new(RegistryState {
                providers,
                aliases: HashMap::new(),
            }),
        })
    }

    /// Returns the provider currently registered under the given
    /// reference, if any.
    pub fn get_provider(&self, reference: &Reference) -> Option<Arc<dyn ResourceProvider>> {
        let state = self.state_read();
        debug!("GetProvider({reference})");
        state.providers.get(reference).cloned()
    }

    /// Informs the registry that the provider with the given URN is a
    /// rename of the provider previously known by `alias`. Lookups by the
    /// old URN keep resolving once the new provider registers.
    pub fn register_alias(&self, provider_urn: Urn, alias: Urn) {
        if provider_urn != alias {
            self.state_write().aliases.insert(provider_urn, alias);
        }
    }

    /// Executes as part of the engine's Same step for a provider that did
    /// not change: if the provider is a rename, the handle registered under
    /// the old reference is indexed under the new one too.
    pub fn same(&self, reference: &Reference) {
        let mut state = self.state_write();
        debug!("Same({reference})");

        if let Some(alias) = state.aliases.get(reference.urn()).cloned() {
            let alias_ref = Reference::must_new(alias, reference.id().clone());
            if let Some(provider) = state.providers.get(&alias_ref).cloned() {
                state.providers.insert(reference.clone(), provider);
            }
        }
    }

    fn set_provider(&self, reference: Reference, provider: Arc<dyn ResourceProvider>) {
        let mut state = self.state_write();
        debug!("setProvider({reference})");

        if let Some(alias) = state.aliases.get(reference.urn()).cloned() {
            let alias_ref = Reference::must_new(alias, reference.id().clone());
            state.providers.insert(alias_ref, Arc::clone(&provider));
        }

        state.providers.insert(reference, provider);
    }

    fn delete_provider(&self, reference: &Reference) -> Option<Arc<dyn ResourceProvider>> {
        self.state_write().providers.remove(reference)
    }

    async fn close_ignoring_error(&self, provider: &Arc<dyn ResourceProvider>) {
        if let Err(err) = self.host.close_provider(provider).await {
            debug!("ignoring provider close failure: {err}");
        }
    }

    fn state_read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().expect("registry state lock poisoned")
    }

    fn state_write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().expect("registry state lock poisoned")
    }
}

#[async_trait]
impl ResourceProvider for Registry {
    fn pkg(&self) -> PackageName {
        PackageName::from("pulumi")
    }

    async fn get_schema(&self, _version: i32) -> Result<Vec<u8>, TesseraError> {
        panic!("GetSchema must not be called on the provider registry");
    }

    async fn get_mapping(&self, _key: &str) -> Result<(Vec<u8>, String), TesseraError> {
        panic!("GetMapping must not be called on the provider registry");
    }

    async fn check_config(
        &self,
        _urn: &Urn,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _allow_unknowns: bool,
    ) -> Result<CheckResult, TesseraError> {
        panic!("CheckConfig must not be called on the provider registry");
    }

    async fn diff_config(
        &self,
        _urn: &Urn,
        _olds: &PropertyMap,
        _news: &PropertyMap,
        _allow_unknowns: bool,
        _ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError> {
        panic!("DiffConfig must not be called on the provider registry");
    }

    async fn configure(&self, _inputs: &PropertyMap) -> Result<(), TesseraError> {
        panic!("Configure must not be called on the provider registry");
    }

    /// Validates the configuration of a provider resource.
    ///
    /// Check loads the plugin for the package named by the URN's type so
    /// that its config can be checked, and keeps the loaded provider around
    /// under the unknown ID in case the engine diffs its config next. A
    /// plugin that rejects the config is unloaded again.
    async fn check(
        &self,
        urn: &Urn,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
        _random_seed: Option<&[u8]>,
    ) -> Result<CheckResult, TesseraError> {
        assert!(
            urn.is_provider_type(),
            "urn must be a provider type, got '{}'",
            urn.type_token()
        );
        debug!(
            "{LABEL}.Check({urn}): executing (#olds={},#news={})",
            olds.len(),
            news.len()
        );

        // Parse the version and download URL from the provider properties;
        // a malformed property is a check failure, not an error.
        let version = match provider_version(news) {
            Ok(version) => version,
            Err(err) => {
                return Ok(CheckResult::failures(vec![CheckFailure {
                    property: VERSION_KEY.to_string(),
                    reason: err.to_string(),
                }]))
            }
        };
        let download_url = match provider_download_url(news) {
            Ok(url) => url,
            Err(err) => {
                return Ok(CheckResult::failures(vec![CheckFailure {
                    property: PLUGIN_DOWNLOAD_URL_KEY.to_string(),
                    reason: err.to_string(),
                }]))
            }
        };

        let pkg = urn
            .provider_package()
            .expect("provider type token must carry a package");
        // Checked inputs do not carry checksums yet; threaded as None.
        let provider = load_provider(
            &pkg,
            version.as_ref(),
            download_url.as_deref(),
            None,
            self.host.as_ref(),
            self.workspace.as_ref(),
            self.builtins.as_ref(),
        )
        .await?;

        // Check the provider's config. If the check fails, unload it.
        match provider.check_config(urn, olds, news, allow_unknowns).await {
            Ok(checked) if checked.failures.is_empty() => {
                self.set_provider(Reference::unknown(urn.clone()), provider);
                Ok(checked)
            }
            Ok(checked) => {
                self.close_ignoring_error(&provider).await;
                Ok(CheckResult::failures(checked.failures))
            }
            Err(err) => {
                self.close_ignoring_error(&provider).await;
                Err(err)
            }
        }
    }

    /// Diffs the configuration of a provider resource previously loaded by
    /// [`check`](Self::check).
    async fn diff(
        &self,
        urn: &Urn,
        id: &ResourceId,
        olds: &PropertyMap,
        news: &PropertyMap,
        allow_unknowns: bool,
        ignore_changes: &[String],
    ) -> Result<DiffResult, TesseraError> {
        assert!(!id.is_empty(), "id must not be empty");
        debug!(
            "{LABEL}.Diff({urn},{id}): executing (#olds={},#news={})",
            olds.len(),
            news.len()
        );

        let unknown_ref = Reference::unknown(urn.clone());
        let Some(provider) = self.get_provider(&unknown_ref) else {
            // No preceding Check registered this provider, which happens
            // when the engine diffs a provider's inputs to evaluate the
            // fanout of a delete-before-replace. Use the provider loaded
            // from the previous state, and do not unload it: the old state
            // still references it.
            let prior_ref = Reference::must_new(urn.clone(), id.clone());
            let provider = self.get_provider(&prior_ref).unwrap_or_else(|| {
                panic!(
                    "provider must have been registered at construction for \
                     delete-before-replace diff ({prior_ref})"
                )
            });
            return provider
                .diff_config(urn, olds, news, allow_unknowns, ignore_changes)
                .await;
        };

        let mut diff = provider
            .diff_config(urn, olds, news, allow_unknowns, ignore_changes)
            .await?;
        if diff.changes == DiffChanges::Unknown {
            diff.changes = if olds == news {
                DiffChanges::None
            } else {
                DiffChanges::Some
            };
        }

        // A replacement unloads the provider; the engine re-issues Check
        // for the replacement, which loads it afresh.
        if diff.replace() {
            self.delete_provider(&unknown_ref);
            self.close_ignoring_error(&provider).await;
        }

        debug!(
            "{LABEL}.Diff({urn},{id}): executed ({}, {:?})",
            diff.changes, diff.replace_keys
        );
        Ok(diff)
    }

    /// Configures the provider loaded by a preceding
    /// [`check`](Self::check), assigns it an ID, and registers it under
    /// the `(urn, id)` reference.
    async fn create(
        &self,
        urn: &Urn,
        news: &PropertyMap,
        _timeout: f64,
        preview: bool,
    ) -> Result<CreateResult, TesseraError> {
        debug!("{LABEL}.Create({urn}): executing (#news={})", news.len());

        let provider = self
            .get_provider(&Reference::unknown(urn.clone()))
            .unwrap_or_else(|| panic!("'Check' must be called before 'Create' ({urn})"));

        // A configure failure leaves the provider registered under the
        // unknown ID, so a retried step reuses the loaded plugin.
        provider.configure(news).await?;

        let id = if preview {
            // The engine tolerates unknown IDs during previews; the
            // unknown-ID registration from Check stays the only entry.
            ResourceId::default()
        } else {
            ResourceId::from(Uuid::new_v4().to_string())
        };
        assert!(id.as_str() != UNKNOWN_ID, "resource ID must not be unknown");

        if !id.is_empty() {
            self.set_provider(Reference::must_new(urn.clone(), id.clone()), provider);
        }

        Ok(CreateResult {
            id,
            outputs: news.clone(),
            status: Status::Ok,
        })
    }

    async fn read(
        &self,
        _urn: &Urn,
        _id: &ResourceId,
        _inputs: &PropertyMap,
        _state: &PropertyMap,
    ) -> Result<(ReadResult, Status), TesseraError> {
        Err(TesseraError::Unsupported(
            "provider resources may not be read",
        ))
    }

    /// Reconfigures the provider loaded by a preceding
    /// [`check`](Self::check) and registers it under the `(urn, id)`
    /// reference.
    async fn update(
        &self,
        urn: &Urn,
        id: &ResourceId,
        olds: &PropertyMap,
        news: &PropertyMap,
        _timeout: f64,
        _ignore_changes: &[String],
        _preview: bool,
    ) -> Result<(PropertyMap, Status), TesseraError> {
        debug!(
            "{LABEL}.Update({urn},{id}): executing (#olds={},#news={})",
            olds.len(),
            news.len()
        );

        let provider = self
            .get_provider(&Reference::unknown(urn.clone()))
            .unwrap_or_else(|| panic!("'Check' and 'Diff' must be called before 'Update' ({urn})"));

        provider.configure(news).await?;

        self.set_provider(Reference::must_new(urn.clone(), id.clone()), provider);
        Ok((news.clone(), Status::Ok))
    }

    /// Unregisters and unloads the provider with the given URN and ID. The
    /// provider must have been registered when the registry was created.
    async fn delete(
        &self,
        urn: &Urn,
        id: &ResourceId,
        _props: &PropertyMap,
        _timeout: f64,
    ) -> Result<Status, TesseraError> {
        assert!(!self.is_preview, "Delete must not be called during preview");

        let reference = Reference::must_new(urn.clone(), id.clone());
        let provider = self
            .delete_provider(&reference)
            .unwrap_or_else(|| panic!("could not find provider to delete ({reference})"));

        self.close_ignoring_error(&provider).await;
        Ok(Status::Ok)
    }

    async fn invoke(
        &self,
        _token: &str,
        _args: &PropertyMap,
    ) -> Result<tessera_core::types::InvokeResult, TesseraError> {
        // The eval source must never route an invoke at the registry.
        panic!("Invoke must not be called on the provider registry");
    }

    async fn stream_invoke(
        &self,
        _token: &str,
        _args: &PropertyMap,
    ) -> Result<
        std::pin::Pin<Box<dyn futures::Stream<Item = Result<PropertyMap, TesseraError>> + Send>>,
        TesseraError,
    > {
        Err(TesseraError::Unsupported(
            "the provider registry does not implement streaming invokes",
        ))
    }

    async fn call(
        &self,
        _token: &str,
        _args: &PropertyMap,
        _info: &tessera_core::types::CallInfo,
        _options: &tessera_core::types::CallOptions,
    ) -> Result<tessera_core::types::CallResult, TesseraError> {
        // The eval source must never route a call at the registry.
        panic!("Call must not be called on the provider registry");
    }

    async fn construct(
        &self,
        _info: &tessera_core::types::ConstructInfo,
        _type_token: &str,
        _name: &str,
        _parent: Option<&Urn>,
        _inputs: &PropertyMap,
        _options: &tessera_core::types::ConstructOptions,
    ) -> Result<tessera_core::types::ConstructResult, TesseraError> {
        Err(TesseraError::Unsupported(
            "provider resources may not be constructed",
        ))
    }

    async fn get_plugin_info(&self) -> Result<PluginInfo, TesseraError> {
        Err(TesseraError::Unsupported(
            "the provider registry does not report plugin info",
        ))
    }

    /// A no-op: in-flight plugin loads cannot be cancelled yet. Engine
    /// cancellation tears down the host instead, failing subsequent RPCs.
    async fn signal_cancellation(&self) -> Result<(), TesseraError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TesseraError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tessera_test_utils::{MockPluginHost, MockPluginWorkspace, MockResourceProvider};

    fn provider_urn(name: &str) -> Urn {
        Urn::from(format!(
            "urn:pulumi:dev::proj::pulumi:providers:aws::{name}"
        ))
    }

    fn props(json: &str) -> PropertyMap {
        serde_json::from_str(json).expect("valid json")
    }

    async fn empty_registry() -> Registry {
        Registry::new(
            Arc::new(MockPluginHost::new()),
            Arc::new(MockPluginWorkspace::new()),
            Vec::new(),
            false,
            None,
        )
        .await
        .expect("empty registry")
    }

    #[tokio::test]
    async fn set_and_get_provider() {
        let registry = empty_registry().await;
        let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
        let reference = Reference::unknown(provider_urn("a"));

        assert!(registry.get_provider(&reference).is_none());
        registry.set_provider(reference.clone(), Arc::clone(&provider));
        assert!(Arc::ptr_eq(
            &registry.get_provider(&reference).unwrap(),
            &provider
        ));
    }

    #[tokio::test]
    async fn delete_provider_removes_the_entry() {
        let registry = empty_registry().await;
        let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
        let reference = Reference::unknown(provider_urn("a"));

        registry.set_provider(reference.clone(), provider);
        assert!(registry.delete_provider(&reference).is_some());
        assert!(registry.get_provider(&reference).is_none());
        assert!(registry.delete_provider(&reference).is_none());
    }

    #[tokio::test]
    async fn set_provider_mirrors_aliased_urn() {
        let registry = empty_registry().await;
        let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
        let new_urn = provider_urn("renamed");
        let old_urn = provider_urn("original");
        registry.register_alias(new_urn.clone(), old_urn.clone());

        let id = ResourceId::from("8d4f6a2e-7b31-4b68-a86a-616bf09ec9b4");
        registry.set_provider(
            Reference::must_new(new_urn, id.clone()),
            Arc::clone(&provider),
        );

        let old_ref = Reference::must_new(old_urn, id);
        assert!(Arc::ptr_eq(
            &registry.get_provider(&old_ref).unwrap(),
            &provider
        ));
    }

    #[tokio::test]
    async fn register_alias_ignores_self_alias() {
        let registry = empty_registry().await;
        let urn = provider_urn("same");
        registry.register_alias(urn.clone(), urn.clone());
        assert!(registry.state_read().aliases.is_empty());
    }

    #[tokio::test]
    async fn same_copies_handle_from_aliased_reference() {
        let registry = empty_registry().await;
        let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
        let new_urn = provider_urn("renamed");
        let old_urn = provider_urn("original");
        let id = ResourceId::from("8d4f6a2e-7b31-4b68-a86a-616bf09ec9b4");

        // The old provider is registered under the old reference only, as
        // it would be after construction from prior state.
        registry.set_provider(
            Reference::must_new(old_urn.clone(), id.clone()),
            Arc::clone(&provider),
        );
        registry.register_alias(new_urn.clone(), old_urn);

        let new_ref = Reference::must_new(new_urn, id);
        assert!(registry.get_provider(&new_ref).is_none());
        registry.same(&new_ref);
        assert!(Arc::ptr_eq(
            &registry.get_provider(&new_ref).unwrap(),
            &provider
        ));
    }

    #[tokio::test]
    async fn same_without_alias_is_a_no_op() {
        let registry = empty_registry().await;
        let reference = Reference::must_new(
            provider_urn("plain"),
            ResourceId::from("8d4f6a2e-7b31-4b68-a86a-616bf09ec9b4"),
        );
        registry.same(&reference);
        assert!(registry.get_provider(&reference).is_none());
    }

    #[tokio::test]
    async fn registry_pkg_is_pulumi() {
        let registry = empty_registry().await;
        assert_eq!(registry.pkg(), PackageName::from("pulumi"));
    }

    #[tokio::test]
    #[should_panic(expected = "Configure must not be called on the provider registry")]
    async fn configure_on_registry_is_a_contract_violation() {
        let registry = empty_registry().await;
        let _ = registry.configure(&PropertyMap::new()).await;
    }

    #[tokio::test]
    #[should_panic(expected = "CheckConfig must not be called on the provider registry")]
    async fn check_config_on_registry_is_a_contract_violation() {
        let registry = empty_registry().await;
        let _ = registry
            .check_config(
                &provider_urn("a"),
                &PropertyMap::new(),
                &PropertyMap::new(),
                false,
            )
            .await;
    }

    #[tokio::test]
    async fn read_and_construct_are_benign_refusals() {
        let registry = empty_registry().await;
        let urn = provider_urn("a");
        let id = ResourceId::from("8d4f6a2e-7b31-4b68-a86a-616bf09ec9b4");

        let read_err = registry
            .read(&urn, &id, &PropertyMap::new(), &PropertyMap::new())
            .await
            .unwrap_err();
        assert_eq!(read_err.to_string(), "provider resources may not be read");

        let stream_err = registry
            .stream_invoke("pkg:index:fn", &PropertyMap::new())
            .await
            .map(|_| ())
            .unwrap_err();
        assert_eq!(
            stream_err.to_string(),
            "the provider registry does not implement streaming invokes"
        );
    }

    #[tokio::test]
    async fn close_and_cancellation_are_no_ops() {
        let registry = empty_registry().await;
        registry.close().await.unwrap();
        registry.signal_cancellation().await.unwrap();
    }

    #[tokio::test]
    async fn check_rejects_malformed_version_before_loading() {
        let host = Arc::new(MockPluginHost::new());
        let registry = Registry::new(
            Arc::clone(&host) as Arc<dyn PluginHost>,
            Arc::new(MockPluginWorkspace::new()),
            Vec::new(),
            false,
            None,
        )
        .await
        .unwrap();

        let result = registry
            .check(
                &provider_urn("a"),
                &PropertyMap::new(),
                &props(r#"{"version":"not-a-semver"}"#),
                false,
                None,
            )
            .await
            .unwrap();

        assert!(result.inputs.is_none());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].property, "version");
        assert!(result.failures[0]
            .reason
            .starts_with("could not parse provider version:"));
        // The loader was never consulted.
        assert!(host.provider_requests().is_empty());
    }
}
