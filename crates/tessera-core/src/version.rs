// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant semantic-version parsing for provider version properties.

use semver::Version;

use crate::error::TesseraError;

/// Parses a version string tolerantly: a leading `v` is stripped and
/// partial versions (`1`, `1.2`) are padded with zeroes before strict
/// semver parsing. Pre-release and build metadata pass through unchanged.
pub fn parse_tolerant(version: &str) -> Result<Version, TesseraError> {
    let trimmed = version.trim();
    let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);

    // Pad only the numeric core; "1-alpha" becomes "1.0.0-alpha".
    let (numeric, rest) = match stripped.find(['-', '+']) {
        Some(at) => stripped.split_at(at),
        None => (stripped, ""),
    };
    let padded = match numeric.matches('.').count() {
        0 => format!("{numeric}.0.0{rest}"),
        1 => format!("{numeric}.0{rest}"),
        _ => stripped.to_string(),
    };

    Version::parse(&padded).map_err(|err| TesseraError::InvalidVersion(err.to_string()))
}
