// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters for deterministic engine testing.
//!
//! The mocks implement the host, provider, and workspace seams with
//! scripted outcomes and call recording, enabling fast CI-runnable tests
//! without plugin processes or network access.

pub mod mock_host;
pub mod mock_provider;
pub mod mock_workspace;

pub use mock_host::MockPluginHost;
pub use mock_provider::MockResourceProvider;
pub use mock_workspace::MockPluginWorkspace;
