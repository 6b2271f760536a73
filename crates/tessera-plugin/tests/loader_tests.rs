// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use semver::Version;
use tessera_core::{PackageName, ResourceProvider};
use tessera_plugin::load_provider;

use tessera_test_utils::{MockPluginHost, MockPluginWorkspace, MockResourceProvider};

fn aws() -> PackageName {
    PackageName::from("aws")
}

#[tokio::test]
async fn returns_builtin_for_matching_package() {
    let host = MockPluginHost::new();
    let workspace = MockPluginWorkspace::new();
    let builtin: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("pulumi"));

    let loaded = load_provider(
        &PackageName::from("pulumi"),
        None,
        None,
        None,
        &host,
        &workspace,
        Some(&builtin),
    )
    .await
    .unwrap();

    assert!(Arc::ptr_eq(&loaded, &builtin));
    assert!(host.provider_requests().is_empty());
}

#[tokio::test]
async fn returns_installed_provider_without_touching_workspace() {
    let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
    let host = MockPluginHost::new();
    host.serve("aws", Arc::clone(&provider));
    let workspace = MockPluginWorkspace::new();

    let loaded = load_provider(&aws(), None, None, None, &host, &workspace, None)
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&loaded, &provider));
    assert!(workspace.downloads().is_empty());
}

#[tokio::test]
async fn non_missing_host_error_propagates_unchanged() {
    let host = MockPluginHost::new();
    host.enqueue_error("aws", "plugin crashed on startup");
    let workspace = MockPluginWorkspace::new();

    let err = load_provider(&aws(), None, None, None, &host, &workspace, None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "plugin crashed on startup");
    assert!(workspace.downloads().is_empty());
}

#[tokio::test]
async fn missing_plugin_installs_and_retries() {
    let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    host.serve("aws", Arc::clone(&provider));
    let workspace = MockPluginWorkspace::new();
    let version = Version::new(2, 0, 0);

    let loaded = load_provider(&aws(), Some(&version), None, None, &host, &workspace, None)
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&loaded, &provider));
    assert_eq!(workspace.downloads().len(), 1);
    assert_eq!(workspace.installs().len(), 1);
    assert_eq!(workspace.downloads()[0].version, Some(version));
    assert!(host.has_log("Downloading provider: aws"));
}

#[tokio::test]
async fn resolves_latest_version_when_absent() {
    let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    host.serve("aws", Arc::clone(&provider));
    let workspace = MockPluginWorkspace::new().with_latest_version(Version::new(3, 1, 0));

    load_provider(&aws(), None, None, None, &host, &workspace, None)
        .await
        .unwrap();

    assert_eq!(workspace.downloads()[0].version, Some(Version::new(3, 1, 0)));
}

#[tokio::test]
async fn latest_version_failure_is_contextualized() {
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    let workspace = MockPluginWorkspace::new();

    let err = load_provider(&aws(), None, None, None, &host, &workspace, None)
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .starts_with("could not find latest version for provider aws:"));
}

#[tokio::test]
async fn download_failure_wraps_into_install_error() {
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    let workspace = MockPluginWorkspace::new().with_download_error("403 forbidden");
    let version = Version::new(2, 0, 0);

    let err = load_provider(&aws(), Some(&version), None, None, &host, &workspace, None)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("`pulumi plugin install resource aws v2.0.0`"));
    assert!(message.contains("error downloading provider aws to file"));
    assert!(message.contains("403 forbidden"));
}

#[tokio::test]
async fn install_failure_wraps_into_install_error() {
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    let workspace = MockPluginWorkspace::new().with_install_error("disk full");
    let version = Version::new(2, 0, 0);

    let err = load_provider(&aws(), Some(&version), None, None, &host, &workspace, None)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("error installing provider aws"));
    assert!(message.contains("disk full"));
}

#[tokio::test]
async fn install_error_names_download_server() {
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    let workspace = MockPluginWorkspace::new().with_download_error("403 forbidden");
    let version = Version::new(2, 0, 0);

    let err = load_provider(
        &aws(),
        Some(&version),
        Some("https://example.com/plugins"),
        None,
        &host,
        &workspace,
        None,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains(
        "`pulumi plugin install resource aws v2.0.0 --server https://example.com/plugins`"
    ));
}

#[tokio::test]
async fn retry_attempts_are_logged_through_the_host() {
    let provider: Arc<dyn ResourceProvider> = Arc::new(MockResourceProvider::new("aws"));
    let host = MockPluginHost::new();
    host.enqueue_missing("aws");
    host.serve("aws", Arc::clone(&provider));
    let workspace = MockPluginWorkspace::new().with_download_retries(2);
    let version = Version::new(2, 0, 0);

    load_provider(&aws(), Some(&version), None, None, &host, &workspace, None)
        .await
        .unwrap();

    assert!(host.has_log("error downloading provider:"));
    assert!(host.has_log("Will retry in"));
}
