// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider references: the canonical identity of a configured provider.

use std::fmt;

use uuid::Uuid;

use tessera_core::types::ResourceId;
use tessera_core::urn::Urn;
use tessera_core::TesseraError;

/// The distinguished id of a provider that has been checked but not yet
/// created, and of any provider during a preview.
pub const UNKNOWN_ID: &str = "unknown";

/// The identity of a configured provider: a `(URN, id)` pair with the
/// canonical string form `"<urn>::<id>"`. Equality and hashing are by
/// exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    urn: Urn,
    id: ResourceId,
}

impl Reference {
    /// Creates a reference, validating that the URN names a provider type
    /// and that the id is a well-formed UUID or [`UNKNOWN_ID`].
    pub fn new(urn: Urn, id: ResourceId) -> Result<Self, TesseraError> {
        if !urn.is_provider_type() {
            return Err(TesseraError::InvalidReference(format!(
                "URN '{urn}' is not a valid provider URN"
            )));
        }
        if id.as_str() != UNKNOWN_ID && Uuid::parse_str(id.as_str()).is_err() {
            return Err(TesseraError::InvalidReference(format!(
                "'{id}' is not a valid provider ID"
            )));
        }
        Ok(Reference { urn, id })
    }

    /// Creates a reference from components validated earlier.
    ///
    /// Panics on violation; reserved for paths where the inputs have
    /// already been checked.
    pub fn must_new(urn: Urn, id: ResourceId) -> Self {
        match Reference::new(urn, id) {
            Ok(reference) => reference,
            Err(err) => panic!("invalid provider reference: {err}"),
        }
    }

    /// The reference of a provider whose identity is not yet assigned.
    pub fn unknown(urn: Urn) -> Self {
        Reference::must_new(urn, ResourceId::from(UNKNOWN_ID))
    }

    /// Parses the canonical `"<urn>::<id>"` form. The URN must name a
    /// provider type; any id, including [`UNKNOWN_ID`], is accepted.
    pub fn parse(reference: &str) -> Result<Self, TesseraError> {
        // URNs contain "::" themselves, so the id starts after the last one.
        let Some((urn, id)) = reference.rsplit_once("::") else {
            return Err(TesseraError::InvalidReference(format!(
                "'{reference}' does not contain an ID"
            )));
        };
        let urn = Urn::from(urn);
        if !urn.is_provider_type() {
            return Err(TesseraError::InvalidReference(format!(
                "URN '{urn}' is not a valid provider URN"
            )));
        }
        Ok(Reference {
            urn,
            id: ResourceId::from(id),
        })
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.urn, self.id)
    }
}
