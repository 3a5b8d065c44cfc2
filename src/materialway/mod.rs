// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The routing graph.
//!
//! [`Materialway::build`] runs the build phases in order: boundaries around every substructure,
//! outer chains from each boundary to the global edge, then collection sections binding every
//! module. The result is read-only apart from conversion rules and module detachment.

use std::collections::BTreeMap;
use std::fmt;

use log::info;

use crate::model::geometry::Tracker;
use crate::model::ids::{BoundaryId, ModuleId, SectionId, SubstructureId};

pub mod boundary;
pub mod inner_usher;
pub mod outer_usher;
pub mod section;
pub mod station;
pub mod train;

pub use boundary::Boundary;
pub use inner_usher::{CollectionGroup, ModuleBinding};
pub use outer_usher::GlobalEdge;
pub use section::{Chain, Direction, Section, SectionKind, SectionNetwork};
pub use station::{ConversionRule, Station};
pub use train::{Delivery, MaterialLedger, RouteError, Train, Wagon, WagonKind};

use inner_usher::InnerUsher;
use outer_usher::OuterUsher;

#[derive(Debug)]
pub enum MaterialwayError {
    EmptyTracker,
    EmptySubstructure {
        substructure: SubstructureId,
    },
    OutOfRange {
        substructure: SubstructureId,
    },
    DuplicateSubstructure {
        substructure: SubstructureId,
    },
    OverlappingBoundaries {
        first: SubstructureId,
        second: SubstructureId,
    },
    NoProgress {
        boundary: BoundaryId,
        substructure: SubstructureId,
        blocker: SubstructureId,
        direction: Direction,
        z: i32,
        r: i32,
    },
    UnknownSubstructure {
        substructure: SubstructureId,
    },
    UnroutedBoundary {
        boundary: BoundaryId,
    },
    DuplicateModule {
        module: ModuleId,
    },
    UnknownModule {
        module: ModuleId,
    },
    ModuleAlreadyDetached {
        module: ModuleId,
    },
    UnknownSection {
        section: SectionId,
    },
    NotAStation {
        section: SectionId,
    },
    UnknownStation {
        label: String,
    },
}

impl fmt::Display for MaterialwayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTracker => write!(f, "tracker has no substructures"),
            Self::EmptySubstructure { substructure } => {
                write!(f, "substructure {substructure} has no modules")
            }
            Self::OutOfRange { substructure } => {
                write!(f, "substructure {substructure} extends beyond the routable range")
            }
            Self::DuplicateSubstructure { substructure } => {
                write!(f, "substructure {substructure} is declared twice")
            }
            Self::OverlappingBoundaries { first, second } => {
                write!(f, "boundaries of {first} and {second} overlap")
            }
            Self::NoProgress { boundary, substructure, blocker, direction, z, r } => write!(
                f,
                "cannot route boundary {boundary} ({substructure}) past {blocker}: \
                 no room to move {direction} from z={z} r={r}"
            ),
            Self::UnknownSubstructure { substructure } => {
                write!(f, "unknown substructure {substructure}")
            }
            Self::UnroutedBoundary { boundary } => {
                write!(f, "boundary {boundary} has no outgoing section")
            }
            Self::DuplicateModule { module } => write!(f, "module {module} is declared twice"),
            Self::UnknownModule { module } => write!(f, "unknown module {module}"),
            Self::ModuleAlreadyDetached { module } => {
                write!(f, "module {module} is already detached")
            }
            Self::UnknownSection { section } => write!(f, "unknown section {section}"),
            Self::NotAStation { section } => write!(f, "section {section} is not a station"),
            Self::UnknownStation { label } => write!(f, "no station labelled {label:?}"),
        }
    }
}

impl std::error::Error for MaterialwayError {}

/// Boundaries, sections and module bindings of one tracker.
#[derive(Debug, Clone)]
pub struct Materialway {
    boundaries: Vec<Boundary>,
    network: SectionNetwork,
    groups: Vec<CollectionGroup>,
    modules: BTreeMap<ModuleId, ModuleBinding>,
    edge: GlobalEdge,
}

impl Materialway {
    pub fn build(tracker: &Tracker) -> Result<Self, MaterialwayError> {
        let envelope = tracker.grid_envelope().ok_or(MaterialwayError::EmptyTracker)?;
        let mut boundaries = boundary::build_boundaries(tracker)?;
        check_boundaries(&boundaries)?;
        let edge = GlobalEdge::around(&envelope);
        info!("built {} boundaries", boundaries.len());

        let mut network = SectionNetwork::default();
        OuterUsher::new(&mut boundaries, &mut network, edge).go_all()?;
        info!(
            "routed outer chains: {} sections, {} stations",
            network.len(),
            network.stations().count()
        );

        let binding = InnerUsher::new(tracker, &boundaries, &mut network).go()?;
        info!(
            "bound {} modules to {} collection sections",
            binding.modules.len(),
            binding.groups.len()
        );

        Ok(Self { boundaries, network, groups: binding.groups, modules: binding.modules, edge })
    }

    /// Boundaries, outermost first. A [`BoundaryId`] is a position in this slice.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn boundary(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(id.index())
    }

    pub fn sections(&self) -> &SectionNetwork {
        &self.network
    }

    pub fn global_edge(&self) -> GlobalEdge {
        self.edge
    }

    pub fn groups(&self) -> &[CollectionGroup] {
        &self.groups
    }

    pub fn stations(&self) -> impl Iterator<Item = (SectionId, &Station)> + '_ {
        self.network.stations()
    }

    pub fn station_by_label(&self, label: &str) -> Option<SectionId> {
        self.network.stations().find(|(_, station)| station.label() == label).map(|(id, _)| id)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleId, &ModuleBinding)> + '_ {
        self.modules.iter()
    }

    pub fn module_binding(&self, module: &ModuleId) -> Option<&ModuleBinding> {
        self.modules.get(module)
    }

    /// The section a module emits into, or `None` for unknown or detached modules.
    pub fn module_section(&self, module: &ModuleId) -> Option<SectionId> {
        self.modules.get(module).filter(|binding| binding.is_attached()).map(ModuleBinding::section)
    }

    /// Number of attached modules in the module's layer or disk.
    pub fn group_module_count(&self, module: &ModuleId) -> Option<usize> {
        let binding = self.modules.get(module)?;
        self.groups.get(binding.group()).map(CollectionGroup::modules)
    }

    /// Adds a conversion rule to one station, or to every station when `station` is `None`.
    pub fn add_conversion_rule(
        &mut self,
        station: Option<SectionId>,
        rule: ConversionRule,
    ) -> Result<(), MaterialwayError> {
        let Some(id) = station else {
            let ids = self.network.stations().map(|(id, _)| id).collect::<Vec<_>>();
            for id in ids {
                if let Some(station) = self.network.get_mut(id).and_then(Section::as_station_mut) {
                    station.push_rule(rule.clone());
                }
            }
            return Ok(());
        };

        let section = self
            .network
            .get_mut(id)
            .ok_or(MaterialwayError::UnknownSection { section: id })?;
        let station =
            section.as_station_mut().ok_or(MaterialwayError::NotAStation { section: id })?;
        station.push_rule(rule);
        Ok(())
    }

    /// Stops a module from emitting services and decrements its group's module count.
    ///
    /// Returns the number of modules left in the group.
    pub fn detach_module(&mut self, module: &ModuleId) -> Result<usize, MaterialwayError> {
        let binding = self
            .modules
            .get_mut(module)
            .ok_or_else(|| MaterialwayError::UnknownModule { module: module.clone() })?;
        if !binding.is_attached() {
            return Err(MaterialwayError::ModuleAlreadyDetached { module: module.clone() });
        }
        binding.detach();

        let group = &mut self.groups[binding.group()];
        group.decrement();
        Ok(group.modules())
    }
}

fn check_boundaries(boundaries: &[Boundary]) -> Result<(), MaterialwayError> {
    for (idx, first) in boundaries.iter().enumerate() {
        for second in &boundaries[idx + 1..] {
            if first.substructure() == second.substructure() {
                return Err(MaterialwayError::DuplicateSubstructure {
                    substructure: first.substructure().clone(),
                });
            }
            if first.rect().overlaps(second.rect()) {
                return Err(MaterialwayError::OverlappingBoundaries {
                    first: first.substructure().clone(),
                    second: second.substructure().clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ConversionRule, Materialway, MaterialwayError};
    use crate::model::fixtures;
    use crate::model::geometry::{
        Envelope, ModulePlacement, Substructure, SubstructureKind, Tracker,
    };
    use crate::model::ids::{ModuleId, SectionId, SubstructureId};

    fn mid(name: &str) -> ModuleId {
        ModuleId::new(name).expect("module id")
    }

    #[test]
    fn every_module_is_bound_and_every_chain_ends_in_a_station() {
        let tracker = fixtures::barrel_and_endcaps();
        let materialway = Materialway::build(&tracker).expect("build");

        assert_eq!(materialway.boundaries().len(), 2);
        assert_eq!(materialway.modules().count(), tracker.module_count());
        assert_eq!(materialway.groups().len(), 6);

        let network = materialway.sections();
        for (module, binding) in materialway.modules() {
            let (_, last) = network.chain_from(binding.section()).last().expect("chain");
            assert!(last.is_station(), "module {module} does not reach a station");
        }
    }

    #[test]
    fn detaching_decrements_the_group_once() {
        let tracker = fixtures::barrel_and_endcaps();
        let mut materialway = Materialway::build(&tracker).expect("build");

        let module = mid("TE_D2_outer");
        assert_eq!(materialway.group_module_count(&module), Some(2));
        assert_eq!(materialway.detach_module(&module).expect("detach"), 1);
        assert_eq!(materialway.module_section(&module), None);
        assert_eq!(materialway.group_module_count(&mid("TE_D2_inner")), Some(1));

        let err = materialway.detach_module(&module).unwrap_err();
        assert!(matches!(err, MaterialwayError::ModuleAlreadyDetached { .. }), "{err}");
        let err = materialway.detach_module(&mid("nope")).unwrap_err();
        assert!(matches!(err, MaterialwayError::UnknownModule { .. }), "{err}");
    }

    #[test]
    fn conversion_rules_target_stations_only() {
        let tracker = fixtures::barrel_and_endcaps();
        let mut materialway = Materialway::build(&tracker).expect("build");

        materialway
            .add_conversion_rule(None, ConversionRule::new("cable", "Cu", 0.5))
            .expect("all stations");
        assert!(materialway.stations().all(|(_, station)| station.rules().len() == 1));

        let (station, _) = materialway.stations().next().expect("a station");
        materialway
            .add_conversion_rule(Some(station), ConversionRule::new("pipe", "Ti", 1.0))
            .expect("one station");

        let err = materialway
            .add_conversion_rule(Some(SectionId::from_index(0)), ConversionRule::new("a", "b", 1.0))
            .unwrap_err();
        assert!(matches!(err, MaterialwayError::NotAStation { .. }), "{err}");
    }

    #[test]
    fn overlapping_substructures_are_rejected() {
        let placement = |name: &str, min_z: f64| {
            ModulePlacement::new(mid(name), Envelope::new(min_z, 100.0, min_z + 100.0, 110.0))
        };
        let tracker = Tracker::new(vec![
            Substructure::new(
                SubstructureId::new("a").unwrap(),
                SubstructureKind::Barrel,
                vec![placement("a1", 0.0)],
            ),
            Substructure::new(
                SubstructureId::new("b").unwrap(),
                SubstructureKind::Barrel,
                vec![placement("b1", 50.0)],
            ),
        ]);
        let err = Materialway::build(&tracker).unwrap_err();
        assert!(matches!(err, MaterialwayError::OverlappingBoundaries { .. }), "{err}");

        let err = Materialway::build(&Tracker::default()).unwrap_err();
        assert!(matches!(err, MaterialwayError::EmptyTracker), "{err}");
    }

    #[test]
    fn coordinates_near_the_grid_limit_are_rejected_before_padding() {
        let far = |max_z: f64| {
            Tracker::new(vec![Substructure::new(
                SubstructureId::new("far").unwrap(),
                SubstructureKind::Barrel,
                vec![ModulePlacement::new(mid("m"), Envelope::new(0.0, 100.0, max_z, 110.0))],
            )])
        };

        let err = Materialway::build(&far(2_147_450.0)).unwrap_err();
        assert!(
            matches!(
                &err,
                MaterialwayError::OutOfRange { substructure } if substructure.as_str() == "far"
            ),
            "{err}"
        );
        assert!(Materialway::build(&far(-2_147_450.0)).is_err());
        assert!(Materialway::build(&far(900_000.0)).is_ok());
    }
}
