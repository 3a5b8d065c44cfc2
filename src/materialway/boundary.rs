// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::grid::{
    GridRect, BOUNDARY_PADDING, BOUNDARY_PRINCIPAL_PADDING, DISK_SECTION_MARGIN,
    LAYER_SECTION_MARGIN, MAX_COORDINATE, SAFETY_SPACE, SECTION_WIDTH,
};
use crate::model::geometry::{SubstructureKind, Tracker};
use crate::model::ids::{SectionId, SubstructureId};

use super::section::{Direction, Ray};
use super::MaterialwayError;

/// Padded keep-out rectangle around one substructure.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    rect: GridRect,
    substructure: SubstructureId,
    kind: SubstructureKind,
    outgoing: Option<SectionId>,
}

impl Boundary {
    pub(crate) fn new(
        rect: GridRect,
        substructure: SubstructureId,
        kind: SubstructureKind,
    ) -> Self {
        Self { rect, substructure, kind, outgoing: None }
    }

    /// Pads a substructure envelope: principal padding on the exit edge, regular padding elsewhere.
    pub(crate) fn around(
        envelope: GridRect,
        substructure: SubstructureId,
        kind: SubstructureKind,
    ) -> Self {
        let (pad_z, pad_r) = match kind {
            SubstructureKind::Barrel => (BOUNDARY_PRINCIPAL_PADDING, BOUNDARY_PADDING),
            SubstructureKind::Endcap => (BOUNDARY_PADDING, BOUNDARY_PRINCIPAL_PADDING),
        };
        let rect = GridRect::new(
            envelope.min_z - BOUNDARY_PADDING,
            envelope.min_r - BOUNDARY_PADDING,
            envelope.max_z + pad_z,
            envelope.max_r + pad_r,
        );
        Self::new(rect, substructure, kind)
    }

    pub fn rect(&self) -> &GridRect {
        &self.rect
    }

    pub fn substructure(&self) -> &SubstructureId {
        &self.substructure
    }

    pub fn kind(&self) -> SubstructureKind {
        self.kind
    }

    /// The principal section every chain leaving this boundary starts from.
    pub fn outgoing(&self) -> Option<SectionId> {
        self.outgoing
    }

    pub(crate) fn set_outgoing(&mut self, section: SectionId) {
        debug_assert!(
            self.outgoing.is_none(),
            "outgoing section of {} set twice",
            self.substructure
        );
        self.outgoing = Some(section);
    }

    /// Barrels exit radially, endcaps along z.
    pub fn exit_direction(&self) -> Direction {
        match self.kind {
            SubstructureKind::Barrel => Direction::Vertical,
            SubstructureKind::Endcap => Direction::Horizontal,
        }
    }

    /// Clearance kept when a chain skirts this boundary.
    pub fn skirt_margin(&self) -> i32 {
        match self.kind {
            SubstructureKind::Barrel => LAYER_SECTION_MARGIN,
            SubstructureKind::Endcap => DISK_SECTION_MARGIN,
        }
    }

    /// The lane of the principal section, inside the padding of the exit edge.
    pub(crate) fn principal_rect(&self) -> GridRect {
        let rect = &self.rect;
        match self.kind {
            SubstructureKind::Barrel => GridRect::new(
                rect.max_z - SAFETY_SPACE - SECTION_WIDTH,
                rect.min_r,
                rect.max_z - SAFETY_SPACE,
                rect.max_r,
            ),
            SubstructureKind::Endcap => GridRect::new(
                rect.min_z,
                rect.max_r - SAFETY_SPACE - SECTION_WIDTH,
                rect.max_z,
                rect.max_r - SAFETY_SPACE,
            ),
        }
    }

    /// Where the outward chain leaves the principal lane.
    pub(crate) fn exit_ray(&self, end: i32) -> Ray {
        let lane = self.principal_rect();
        match self.kind {
            SubstructureKind::Barrel => {
                Ray { z: lane.min_z, r: self.rect.max_r, direction: Direction::Vertical, end }
            }
            SubstructureKind::Endcap => {
                Ray { z: self.rect.max_z, r: lane.min_r, direction: Direction::Horizontal, end }
            }
        }
    }

    /// Tests whether `ray` runs into this boundary strictly before `ray.end`.
    pub(crate) fn hit(&self, ray: &Ray) -> Option<BoundaryHit> {
        let coord = ray.entry(&self.rect)?;
        if coord >= ray.end {
            return None;
        }
        let (_, border) = ray.direction.cross_span(&self.rect);
        Some(BoundaryHit { coord, border })
    }
}

/// Where a ray meets a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoundaryHit {
    /// Coordinate along the ray.
    pub coord: i32,
    /// Far edge across the ray that a detour has to clear.
    pub border: i32,
}

/// Builds one boundary per substructure, outermost first.
///
/// Ordering is descending by `(max_z, max_r)`; equal keys keep input order. Ids are positions in
/// the returned vector.
pub(crate) fn build_boundaries(tracker: &Tracker) -> Result<Vec<Boundary>, MaterialwayError> {
    let mut boundaries = Vec::with_capacity(tracker.substructures().len());
    for substructure in tracker.substructures() {
        let envelope = substructure.grid_envelope().ok_or_else(|| {
            MaterialwayError::EmptySubstructure { substructure: substructure.id().clone() }
        })?;
        if !envelope.within(MAX_COORDINATE) {
            return Err(MaterialwayError::OutOfRange { substructure: substructure.id().clone() });
        }
        boundaries.push(Boundary::around(envelope, substructure.id().clone(), substructure.kind()));
    }
    sort_outermost_first(&mut boundaries);
    Ok(boundaries)
}

pub(crate) fn sort_outermost_first(boundaries: &mut [Boundary]) {
    // Stable sort keeps input order on ties.
    boundaries.sort_by(|a, b| (b.rect.max_z, b.rect.max_r).cmp(&(a.rect.max_z, a.rect.max_r)));
}
