// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared material table.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

/// Minimum similarity for a known tag to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    density: f64,
    radiation_length: f64,
    interaction_length: f64,
}

impl MaterialProperties {
    /// `density` in g/cm³; both lengths in g/cm².
    pub fn new(density: f64, radiation_length: f64, interaction_length: f64) -> Self {
        Self { density, radiation_length, interaction_length }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn radiation_length(&self) -> f64 {
        self.radiation_length
    }

    pub fn interaction_length(&self) -> f64 {
        self.interaction_length
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialLookupError {
    Missing { tag: SmolStr, suggestion: Option<SmolStr> },
}

impl fmt::Display for MaterialLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { tag, suggestion: Some(suggestion) } => {
                write!(f, "unknown material {tag:?} (did you mean {suggestion:?}?)")
            }
            Self::Missing { tag, suggestion: None } => write!(f, "unknown material {tag:?}"),
        }
    }
}

impl std::error::Error for MaterialLookupError {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    entries: BTreeMap<SmolStr, MaterialProperties>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a material, returning the previous properties.
    pub fn insert(
        &mut self,
        tag: impl Into<SmolStr>,
        properties: MaterialProperties,
    ) -> Option<MaterialProperties> {
        self.entries.insert(tag.into(), properties)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &MaterialProperties)> + '_ {
        self.entries.iter()
    }

    pub fn get(&self, tag: &str) -> Result<&MaterialProperties, MaterialLookupError> {
        self.entries.get(tag).ok_or_else(|| MaterialLookupError::Missing {
            tag: SmolStr::new(tag),
            suggestion: self.closest(tag),
        })
    }

    /// The known tag most similar to `tag`, if any is close enough.
    pub fn closest(&self, tag: &str) -> Option<SmolStr> {
        let needle = tag.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &SmolStr)> = None;
        for known in self.entries.keys() {
            let score = rapidfuzz::fuzz::ratio(needle.chars(), known.to_lowercase().chars());
            if score < SUGGESTION_THRESHOLD {
                continue;
            }
            // Keys iterate in order, so a strict comparison keeps the first of equal scores.
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, known));
            }
        }
        best.map(|(_, known)| known.clone())
    }
}
