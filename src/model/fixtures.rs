// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::geometry::{Envelope, ModulePlacement, Substructure, SubstructureKind, Tracker};
use super::ids::{ModuleId, SubstructureId};

fn module(name: &str, min_z: f64, min_r: f64, max_z: f64, max_r: f64) -> ModulePlacement {
    ModulePlacement::new(
        ModuleId::new(name).expect("module id"),
        Envelope::new(min_z, min_r, max_z, max_r),
    )
}

fn sid(name: &str) -> SubstructureId {
    SubstructureId::new(name).expect("substructure id")
}

/// One barrel with a single layer of one module: `z in [0, 500]`, `r in [100, 105]` mm.
pub(crate) fn single_barrel() -> Tracker {
    Tracker::new(vec![Substructure::new(
        sid("TB"),
        SubstructureKind::Barrel,
        vec![module("M1", 0.0, 100.0, 500.0, 105.0)],
    )])
}

/// A three-layer barrel spanning both halves in z plus a three-disk endcap on the positive side.
pub(crate) fn barrel_and_endcaps() -> Tracker {
    let mut barrel_modules = Vec::new();
    for (layer, r) in [(1, 250.0), (2, 350.0), (3, 450.0)] {
        barrel_modules.push(module(&format!("TB_L{layer}_neg"), -700.0, r, 0.0, r + 5.0));
        barrel_modules.push(module(&format!("TB_L{layer}_pos"), 0.0, r, 700.0, r + 5.0));
    }

    let mut endcap_modules = Vec::new();
    for (disk, z) in [(1, 900.0), (2, 1100.0), (3, 1300.0)] {
        endcap_modules.push(module(&format!("TE_D{disk}_inner"), z, 250.0, z + 5.0, 350.0));
        endcap_modules.push(module(&format!("TE_D{disk}_outer"), z, 350.0, z + 5.0, 455.0));
    }

    Tracker::new(vec![
        Substructure::new(sid("TB"), SubstructureKind::Barrel, barrel_modules),
        Substructure::new(sid("TE"), SubstructureKind::Endcap, endcap_modules),
    ])
}
