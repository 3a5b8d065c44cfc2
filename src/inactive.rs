// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inactive-material export.
//!
//! Every section that received material becomes one inactive element: a tube for horizontal
//! sections, a ring for vertical ones. Routing runs on the positive-z half, so each element is
//! followed by its mirror image on the negative side.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use schemars::JsonSchema;
use serde::Serialize;
use smol_str::SmolStr;

use crate::grid::undiscretize;
use crate::material::MaterialTable;
use crate::materialway::{Direction, MaterialLedger, Materialway, Section};
use crate::model::ids::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InactiveShape {
    Tube,
    Ring,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InactiveElement {
    section: SectionId,
    shape: InactiveShape,
    mirrored: bool,
    z_offset: f64,
    z_length: f64,
    inner_radius: f64,
    outer_radius: f64,
    materials: BTreeMap<SmolStr, f64>,
    radiation_length: f64,
    interaction_length: f64,
}

impl InactiveElement {
    pub fn section(&self) -> SectionId {
        self.section
    }

    pub fn shape(&self) -> InactiveShape {
        self.shape
    }

    /// True for the copy on the negative-z side.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Lowest z, in millimetres.
    pub fn z_offset(&self) -> f64 {
        self.z_offset
    }

    pub fn z_length(&self) -> f64 {
        self.z_length
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn materials(&self) -> &BTreeMap<SmolStr, f64> {
        &self.materials
    }

    pub fn total_grams(&self) -> f64 {
        self.materials.values().sum()
    }

    /// Thickness in fractions of a radiation length.
    pub fn radiation_length(&self) -> f64 {
        self.radiation_length
    }

    /// Thickness in fractions of an interaction length.
    pub fn interaction_length(&self) -> f64 {
        self.interaction_length
    }

    fn mirror(&self) -> Self {
        Self { mirrored: true, z_offset: -(self.z_offset + self.z_length), ..self.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "inactive element index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for InventoryError {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InactiveInventory {
    services: Vec<InactiveElement>,
}

impl InactiveInventory {
    pub fn from_ledger(
        materialway: &Materialway,
        ledger: &MaterialLedger,
        materials: &MaterialTable,
    ) -> Self {
        let mut services = Vec::new();
        for (id, deposits) in ledger.sections() {
            let Some(section) = materialway.sections().get(id) else {
                warn!("ledger books material on unknown section {id}; skipping");
                continue;
            };
            let element = element(id, section, deposits, materials);
            let mirror = element.mirror();
            services.push(element);
            services.push(mirror);
        }
        Self { services }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn services(&self) -> &[InactiveElement] {
        &self.services
    }

    pub fn service(&self, index: usize) -> Result<&InactiveElement, InventoryError> {
        self.services
            .get(index)
            .ok_or(InventoryError::IndexOutOfRange { index, len: self.services.len() })
    }

    pub fn total_grams(&self) -> f64 {
        self.services.iter().map(InactiveElement::total_grams).sum()
    }
}

fn element(
    id: SectionId,
    section: &Section,
    deposits: &BTreeMap<SmolStr, f64>,
    materials: &MaterialTable,
) -> InactiveElement {
    let rect = section.rect();
    let shape = match section.bearing() {
        Direction::Horizontal => InactiveShape::Tube,
        Direction::Vertical => InactiveShape::Ring,
    };

    // g/cm² over the crossed surface
    let surface_cm2 = section.surface_mm2() / 100.0;
    let mut radiation_length = 0.0;
    let mut interaction_length = 0.0;
    for (material, grams) in deposits {
        match materials.get(material) {
            Ok(properties) if surface_cm2 > 0.0 => {
                let areal = grams / surface_cm2;
                radiation_length += areal / properties.radiation_length();
                interaction_length += areal / properties.interaction_length();
            }
            Ok(_) => {}
            Err(err) => warn!("section {id}: {err}; left out of radiation and interaction length"),
        }
    }

    InactiveElement {
        section: id,
        shape,
        mirrored: false,
        z_offset: undiscretize(rect.min_z),
        z_length: undiscretize(rect.width_z()),
        inner_radius: undiscretize(rect.min_r),
        outer_radius: undiscretize(rect.max_r),
        materials: deposits.clone(),
        radiation_length,
        interaction_length,
    }
}
