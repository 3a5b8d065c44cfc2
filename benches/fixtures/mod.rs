// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use materialway::materialway::WagonKind;
use materialway::model::{
    Envelope, ModuleId, ModulePlacement, ServiceCatalog, ServiceElement, Substructure,
    SubstructureId, SubstructureKind, Tracker,
};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Layers, disks, and modules per layer ring or disk.
    fn params(self) -> (usize, usize, usize) {
        match self {
            Self::Small => (3, 3, 4),
            Self::Medium => (6, 5, 24),
            Self::Large => (10, 7, 96),
        }
    }
}

fn module(id: String, envelope: Envelope) -> ModulePlacement {
    ModulePlacement::new(ModuleId::new(id).expect("module id"), envelope)
}

/// A barrel with `layers` layers and one endcap with `disks` disks beyond it.
pub fn tracker(case: Case) -> Tracker {
    let (layers, disks, per_group) = case.params();
    let half_length = 800.0;
    let step = 2.0 * half_length / per_group as f64;

    let barrel = (0..layers)
        .flat_map(|layer| {
            let r = 220.0 + 100.0 * layer as f64;
            (0..per_group).map(move |idx| {
                let min_z = -half_length + step * idx as f64;
                module(format!("TB_L{layer}_{idx}"), Envelope::new(min_z, r, min_z + step, r + 5.0))
            })
        })
        .collect::<Vec<_>>();

    let outer_r = 220.0 + 100.0 * layers as f64;
    let ring = (outer_r - 220.0) / per_group as f64;
    let endcap = (0..disks)
        .flat_map(|disk| {
            let z = half_length + 150.0 + 180.0 * disk as f64;
            (0..per_group).map(move |idx| {
                let min_r = 220.0 + ring * idx as f64;
                module(format!("TE_D{disk}_{idx}"), Envelope::new(z, min_r, z + 5.0, min_r + ring))
            })
        })
        .collect::<Vec<_>>();

    Tracker::new(vec![
        Substructure::new(
            SubstructureId::new("TB").expect("substructure id"),
            SubstructureKind::Barrel,
            barrel,
        ),
        Substructure::new(
            SubstructureId::new("TE").expect("substructure id"),
            SubstructureKind::Endcap,
            endcap,
        ),
    ])
}

pub fn services() -> ServiceCatalog {
    let mut services = ServiceCatalog::new();
    services.push_default(ServiceElement::new(WagonKind::GramsPerMeter, "Cu", 2.5));
    services.push_default(ServiceElement::new(WagonKind::GramsPerMeter, "PE", 1.1));
    services.push_default(ServiceElement::new(WagonKind::Grams, "connector", 0.8));
    services
}
