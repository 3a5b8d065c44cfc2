// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use log::debug;

use crate::grid::{GridRect, DISK_SECTION_MARGIN, LAYER_SECTION_MARGIN, SECTION_WIDTH};
use crate::model::geometry::{ModuleGroup, SubstructureKind, Tracker};
use crate::model::ids::{BoundaryId, ModuleId, SectionId};

use super::boundary::Boundary;
use super::section::{Direction, Section, SectionNetwork};
use super::MaterialwayError;

/// Where a module sends its services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBinding {
    section: SectionId,
    group: usize,
    attached: bool,
}

impl ModuleBinding {
    /// The collection section of the module's layer or disk.
    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Position of the module's group in [`super::Materialway::groups`].
    pub fn group(&self) -> usize {
        self.group
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
    }
}

/// One layer (barrel) or disk (endcap) and its collection section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionGroup {
    boundary: BoundaryId,
    index: usize,
    section: SectionId,
    modules: usize,
}

impl CollectionGroup {
    pub fn boundary(&self) -> BoundaryId {
        self.boundary
    }

    /// Layer or disk number inside its substructure, innermost first.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn section(&self) -> SectionId {
        self.section
    }

    /// Modules still sending services through this group.
    pub fn modules(&self) -> usize {
        self.modules
    }

    pub(crate) fn decrement(&mut self) {
        self.modules = self.modules.saturating_sub(1);
    }
}

#[derive(Debug, Default)]
pub(crate) struct Binding {
    pub groups: Vec<CollectionGroup>,
    pub modules: BTreeMap<ModuleId, ModuleBinding>,
}

pub(crate) struct InnerUsher<'a> {
    tracker: &'a Tracker,
    boundaries: &'a [Boundary],
    network: &'a mut SectionNetwork,
}

impl<'a> InnerUsher<'a> {
    pub fn new(
        tracker: &'a Tracker,
        boundaries: &'a [Boundary],
        network: &'a mut SectionNetwork,
    ) -> Self {
        Self { tracker, boundaries, network }
    }

    /// Binds every module of every substructure to a collection section joined to its boundary's
    /// principal section.
    pub fn go(&mut self) -> Result<Binding, MaterialwayError> {
        let (tracker, boundaries) = (self.tracker, self.boundaries);
        let mut binding = Binding::default();
        for (idx, boundary) in boundaries.iter().enumerate() {
            let id = BoundaryId::from_index(idx);
            let substructure = tracker.substructure(boundary.substructure()).ok_or_else(|| {
                MaterialwayError::UnknownSubstructure {
                    substructure: boundary.substructure().clone(),
                }
            })?;
            let principal = boundary
                .outgoing()
                .ok_or_else(|| MaterialwayError::UnroutedBoundary { boundary: id })?;

            let groups = substructure.module_groups();
            let mut group_of = vec![0; substructure.modules().len()];
            for (group_idx, group) in groups.iter().enumerate() {
                for member in group.members() {
                    group_of[*member] = group_idx;
                }
            }

            let mut slots: Vec<Option<usize>> = vec![None; groups.len()];
            for (module_idx, module) in substructure.modules().iter().enumerate() {
                let group_idx = group_of[module_idx];
                let slot = match slots[group_idx] {
                    Some(slot) => slot,
                    None => {
                        let section = self.collect(id, boundary, principal, &groups[group_idx]);
                        binding.groups.push(CollectionGroup {
                            boundary: id,
                            index: group_idx,
                            section,
                            modules: 0,
                        });
                        let slot = binding.groups.len() - 1;
                        slots[group_idx] = Some(slot);
                        slot
                    }
                };

                let entry = ModuleBinding {
                    section: binding.groups[slot].section,
                    group: slot,
                    attached: true,
                };
                if binding.modules.insert(module.id().clone(), entry).is_some() {
                    return Err(MaterialwayError::DuplicateModule { module: module.id().clone() });
                }
                binding.groups[slot].modules += 1;
            }
        }
        Ok(binding)
    }

    /// Creates the collection section of `group` and T-joins it onto the principal section.
    fn collect(
        &mut self,
        id: BoundaryId,
        boundary: &Boundary,
        principal: SectionId,
        group: &ModuleGroup,
    ) -> SectionId {
        let lane = boundary.principal_rect();
        let rect = group.rect();
        let (section, join) = match boundary.kind() {
            SubstructureKind::Barrel => {
                let r = rect.max_r + LAYER_SECTION_MARGIN;
                let rect = GridRect::new(rect.min_z, r, lane.min_z, r + SECTION_WIDTH);
                (Section::passthrough(rect, Direction::Horizontal, Some(id)), r)
            }
            SubstructureKind::Endcap => {
                let z = rect.max_z + DISK_SECTION_MARGIN;
                let rect = GridRect::new(z, rect.min_r, z + SECTION_WIDTH, lane.min_r);
                (Section::passthrough(rect, Direction::Vertical, Some(id)), z)
            }
        };

        let collection = self.network.push(section);
        let piece = self.network.locate(principal, join);
        let joined = self.network.split(piece, join);
        self.network.link(collection, joined);
        debug!(
            "boundary {id}: group {} collects into {collection} joined at {joined}",
            group.index()
        );
        collection
    }
}

#[cfg(test)]
mod tests {
    use crate::materialway::Materialway;
    use crate::model::fixtures;
    use crate::model::ids::{BoundaryId, ModuleId};
    use crate::model::SubstructureKind;

    #[test]
    fn modules_of_one_layer_share_a_collection_section() {
        let tracker = fixtures::barrel_and_endcaps();
        let materialway = Materialway::build(&tracker).expect("build");

        let a = materialway.module_section(&ModuleId::new("TB_L1_neg").unwrap());
        let b = materialway.module_section(&ModuleId::new("TB_L1_pos").unwrap());
        let c = materialway.module_section(&ModuleId::new("TB_L2_pos").unwrap());
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(materialway.group_module_count(&ModuleId::new("TB_L1_neg").unwrap()), Some(2));
    }

    #[test]
    fn collection_sections_join_the_principal_of_their_boundary() {
        let tracker = fixtures::barrel_and_endcaps();
        let materialway = Materialway::build(&tracker).expect("build");
        let network = materialway.sections();

        for group in materialway.groups() {
            let boundary = materialway.boundary(group.boundary()).expect("boundary");
            let collection = network.get(group.section()).expect("collection");
            assert_eq!(collection.owner(), Some(group.boundary()));

            let joined = network.get(collection.next().expect("joined")).expect("principal piece");
            assert_eq!(joined.owner(), Some(group.boundary()));
            assert_ne!(joined.bearing(), collection.bearing());
            match boundary.kind() {
                SubstructureKind::Barrel => {
                    assert_eq!(joined.rect().min_r, collection.rect().min_r)
                }
                SubstructureKind::Endcap => {
                    assert_eq!(joined.rect().min_z, collection.rect().min_z)
                }
            }
            assert!(collection.rect().overlaps(boundary.rect()));
        }
    }

    #[test]
    fn splitting_the_principal_keeps_its_chain_intact() {
        let tracker = fixtures::barrel_and_endcaps();
        let materialway = Materialway::build(&tracker).expect("build");
        let network = materialway.sections();

        for (idx, boundary) in materialway.boundaries().iter().enumerate() {
            let id = BoundaryId::from_index(idx);
            let principal = boundary.outgoing().expect("principal");
            let pieces = network
                .chain_from(principal)
                .take_while(|(_, section)| section.owner() == Some(id))
                .map(|(_, section)| section.length())
                .sum::<i32>();
            let (lo, hi) = boundary.exit_direction().span(boundary.rect());
            assert_eq!(pieces, hi - lo);
        }
    }
}
