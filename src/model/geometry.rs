// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::grid::{discretize, GridRect, SECTION_TOLERANCE};

use super::ids::{ModuleId, SubstructureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubstructureKind {
    Barrel,
    Endcap,
}

impl fmt::Display for SubstructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Barrel => f.write_str("barrel"),
            Self::Endcap => f.write_str("endcap"),
        }
    }
}

/// A rectangle in the (z, r) plane, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min_z: f64,
    min_r: f64,
    max_z: f64,
    max_r: f64,
}

impl Envelope {
    pub fn new(min_z: f64, min_r: f64, max_z: f64, max_r: f64) -> Self {
        Self {
            min_z: min_z.min(max_z),
            min_r: min_r.min(max_r),
            max_z: min_z.max(max_z),
            max_r: min_r.max(max_r),
        }
    }

    pub fn min_z(&self) -> f64 {
        self.min_z
    }

    pub fn min_r(&self) -> f64 {
        self.min_r
    }

    pub fn max_z(&self) -> f64 {
        self.max_z
    }

    pub fn max_r(&self) -> f64 {
        self.max_r
    }

    /// Mirrors the envelope onto the positive-z half plane.
    ///
    /// An envelope straddling `z = 0` folds to `[0, max(|min_z|, |max_z|)]`.
    pub fn folded(&self) -> Envelope {
        let (min_z, max_z) = if self.min_z >= 0.0 {
            (self.min_z, self.max_z)
        } else if self.max_z <= 0.0 {
            (-self.max_z, -self.min_z)
        } else {
            (0.0, (-self.min_z).max(self.max_z))
        };
        Envelope { min_z, min_r: self.min_r, max_z, max_r: self.max_r }
    }

    pub fn to_grid(&self) -> GridRect {
        GridRect::new(
            discretize(self.min_z),
            discretize(self.min_r),
            discretize(self.max_z),
            discretize(self.max_r),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModulePlacement {
    id: ModuleId,
    envelope: Envelope,
}

impl ModulePlacement {
    pub fn new(id: ModuleId, envelope: Envelope) -> Self {
        Self { id, envelope }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The folded envelope on the routing grid.
    pub fn grid_rect(&self) -> GridRect {
        self.envelope.folded().to_grid()
    }
}

/// A barrel or endcap: the unit that gets one routing boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Substructure {
    id: SubstructureId,
    kind: SubstructureKind,
    modules: Vec<ModulePlacement>,
}

impl Substructure {
    pub fn new(id: SubstructureId, kind: SubstructureKind, modules: Vec<ModulePlacement>) -> Self {
        Self { id, kind, modules }
    }

    pub fn id(&self) -> &SubstructureId {
        &self.id
    }

    pub fn kind(&self) -> SubstructureKind {
        self.kind
    }

    pub fn modules(&self) -> &[ModulePlacement] {
        &self.modules
    }

    /// Bounding rectangle of all folded module envelopes, or `None` without modules.
    pub fn grid_envelope(&self) -> Option<GridRect> {
        self.modules.iter().map(ModulePlacement::grid_rect).reduce(|acc, rect| acc.union(&rect))
    }

    /// Clusters modules into layers (barrels, by radius) or disks (endcaps, by z).
    ///
    /// Groups are returned innermost first; modules inside a group keep their input order.
    pub fn module_groups(&self) -> Vec<ModuleGroup> {
        let axis = |rect: &GridRect| match self.kind {
            SubstructureKind::Barrel => (rect.min_r, rect.max_r),
            SubstructureKind::Endcap => (rect.min_z, rect.max_z),
        };

        let mut order = self
            .modules
            .iter()
            .enumerate()
            .map(|(idx, module)| (idx, module.grid_rect()))
            .collect::<Vec<_>>();
        order.sort_by(|(idx_a, rect_a), (idx_b, rect_b)| {
            axis(rect_a).cmp(&axis(rect_b)).then_with(|| idx_a.cmp(idx_b))
        });

        let mut groups = Vec::<ModuleGroup>::new();
        let mut reach = i32::MIN;
        for (idx, rect) in order {
            let (lo, hi) = axis(&rect);
            match groups.last_mut() {
                Some(group) if lo <= reach.saturating_add(SECTION_TOLERANCE) => {
                    group.rect = group.rect.union(&rect);
                    group.members.push(idx);
                    reach = reach.max(hi);
                }
                _ => {
                    groups.push(ModuleGroup { index: groups.len(), rect, members: vec![idx] });
                    reach = hi;
                }
            }
        }

        for group in &mut groups {
            group.members.sort_unstable();
        }
        groups
    }
}

/// Modules of one substructure that share a collection section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroup {
    index: usize,
    rect: GridRect,
    members: Vec<usize>,
}

impl ModuleGroup {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Union of the members' folded envelopes.
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Positions of the members in [`Substructure::modules`].
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Detector envelope geometry consumed read-only by the router.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tracker {
    substructures: Vec<Substructure>,
}

impl Tracker {
    pub fn new(substructures: Vec<Substructure>) -> Self {
        Self { substructures }
    }

    pub fn substructures(&self) -> &[Substructure] {
        &self.substructures
    }

    pub fn substructure(&self, id: &SubstructureId) -> Option<&Substructure> {
        self.substructures.iter().find(|sub| sub.id() == id)
    }

    pub fn module_count(&self) -> usize {
        self.substructures.iter().map(|sub| sub.modules().len()).sum()
    }

    /// Bounding rectangle of every folded module, or `None` for an empty tracker.
    pub fn grid_envelope(&self) -> Option<GridRect> {
        self.substructures
            .iter()
            .filter_map(Substructure::grid_envelope)
            .reduce(|acc, rect| acc.union(&rect))
    }
}
