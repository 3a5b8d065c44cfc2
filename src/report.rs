// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serializable summaries of a built materialway and one accumulation pass.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::grid::undiscretize;
use crate::inactive::InactiveInventory;
use crate::materialway::{MaterialLedger, Materialway};
use crate::model::ids::BoundaryId;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlobalEdgeSummary {
    pub max_z_mm: f64,
    pub max_r_mm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BoundarySummary {
    pub boundary_id: String,
    pub substructure_id: String,
    pub kind: String,
    pub min_z_mm: f64,
    pub min_r_mm: f64,
    pub max_z_mm: f64,
    pub max_r_mm: f64,
    pub outgoing_section_id: Option<String>,
    pub station_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StationSummary {
    pub section_id: String,
    pub label: String,
    pub direction: String,
    pub z_mm: f64,
    pub r_mm: f64,
    pub rules: u64,
    pub materials: BTreeMap<String, f64>,
    pub total_grams: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModuleSummary {
    pub bound: u64,
    pub detached: u64,
    pub groups: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InactiveSummary {
    pub elements: u64,
    pub total_grams: f64,
    pub max_radiation_length: f64,
    pub max_interaction_length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MaterialwayReport {
    pub global_edge: GlobalEdgeSummary,
    pub boundaries: Vec<BoundarySummary>,
    pub sections: u64,
    pub modules: ModuleSummary,
    pub stations: Vec<StationSummary>,
    pub total_grams: f64,
    pub inactive: Option<InactiveSummary>,
}

impl MaterialwayReport {
    pub fn new(materialway: &Materialway, ledger: &MaterialLedger) -> Self {
        let network = materialway.sections();
        let edge = materialway.global_edge();

        let boundaries = materialway
            .boundaries()
            .iter()
            .enumerate()
            .map(|(idx, boundary)| {
                let rect = boundary.rect();
                let outgoing = boundary.outgoing();
                let station = outgoing
                    .and_then(|start| network.chain_from(start).last())
                    .filter(|(_, section)| section.is_station())
                    .map(|(id, _)| id.to_string());
                BoundarySummary {
                    boundary_id: BoundaryId::from_index(idx).to_string(),
                    substructure_id: boundary.substructure().to_string(),
                    kind: boundary.kind().to_string(),
                    min_z_mm: undiscretize(rect.min_z),
                    min_r_mm: undiscretize(rect.min_r),
                    max_z_mm: undiscretize(rect.max_z),
                    max_r_mm: undiscretize(rect.max_r),
                    outgoing_section_id: outgoing.map(|id| id.to_string()),
                    station_id: station,
                }
            })
            .collect::<Vec<_>>();

        let stations = materialway
            .stations()
            .map(|(id, station)| {
                let rect = network.get(id).map(|section| *section.rect());
                let direction = network.get(id).map(|section| section.bearing().to_string());
                let materials = ledger
                    .station_totals(id)
                    .map(|totals| {
                        totals
                            .iter()
                            .map(|(tag, grams)| (tag.to_string(), *grams))
                            .collect::<BTreeMap<_, _>>()
                    })
                    .unwrap_or_default();
                let total_grams = materials.values().sum();
                StationSummary {
                    section_id: id.to_string(),
                    label: station.label().to_string(),
                    direction: direction.unwrap_or_default(),
                    z_mm: rect.map_or(0.0, |rect| undiscretize(rect.min_z)),
                    r_mm: rect.map_or(0.0, |rect| undiscretize(rect.min_r)),
                    rules: station.rules().len() as u64,
                    materials,
                    total_grams,
                }
            })
            .collect::<Vec<_>>();

        let (bound, detached) =
            materialway.modules().fold((0, 0), |(bound, detached), (_, binding)| {
                if binding.is_attached() {
                    (bound + 1, detached)
                } else {
                    (bound, detached + 1)
                }
            });

        Self {
            global_edge: GlobalEdgeSummary {
                max_z_mm: undiscretize(edge.max_z),
                max_r_mm: undiscretize(edge.max_r),
            },
            boundaries,
            sections: network.len() as u64,
            modules: ModuleSummary { bound, detached, groups: materialway.groups().len() as u64 },
            total_grams: stations.iter().map(|station| station.total_grams).sum(),
            stations,
            inactive: None,
        }
    }

    pub fn with_inactive(mut self, inventory: &InactiveInventory) -> Self {
        let max = |value: fn(&crate::inactive::InactiveElement) -> f64| {
            inventory.services().iter().map(value).fold(0.0, f64::max)
        };
        self.inactive = Some(InactiveSummary {
            elements: inventory.len() as u64,
            total_grams: inventory.total_grams(),
            max_radiation_length: max(|element| element.radiation_length()),
            max_interaction_length: max(|element| element.interaction_length()),
        });
        self
    }
}
