// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Builds the chains leading from every boundary's exit out to the global edge.
//!
//! A chain is walked as a ray: a lane of [`SECTION_WIDTH`] that advances in the boundary's exit
//! direction until it hits something. Boundaries in the way are skirted with a detour leg in the
//! perpendicular direction; an existing section in the way is joined (splitting it when the hit
//! lands mid-section). A ray that reaches the global edge ends in a new station.
//!
//! Boundaries are processed outermost first, so inner chains converge onto the chains already
//! built for the outer ones.

use log::debug;
use smallvec::{smallvec, SmallVec};
use smol_str::SmolStr;

use crate::grid::{
    GridRect, GLOBAL_MAX_R_PADDING, GLOBAL_MAX_Z_PADDING, SAFETY_SPACE, SECTION_WIDTH,
    STATION_LENGTH,
};
use crate::model::ids::{BoundaryId, SectionId};

use super::boundary::{Boundary, BoundaryHit};
use super::section::{Direction, Ray, Section, SectionHit, SectionNetwork};
use super::station::Station;
use super::MaterialwayError;

/// Outer limit of the routing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEdge {
    pub max_z: i32,
    pub max_r: i32,
}

impl GlobalEdge {
    /// Pads the folded tracker envelope.
    pub fn around(envelope: &GridRect) -> Self {
        Self {
            max_z: envelope.max_z + GLOBAL_MAX_Z_PADDING,
            max_r: envelope.max_r + GLOBAL_MAX_R_PADDING,
        }
    }

    pub fn along(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Horizontal => self.max_z,
            Direction::Vertical => self.max_r,
        }
    }
}

impl Ray {
    /// The same lane, moved forward so that it starts at `along`.
    fn advanced(self, along: i32) -> Ray {
        match self.direction {
            Direction::Horizontal => Ray { z: along, ..self },
            Direction::Vertical => Ray { r: along, ..self },
        }
    }

    /// The perpendicular lane leaving the far corner of a leg that stops at `end`.
    fn turned(self, end: i32) -> Ray {
        match self.direction {
            Direction::Horizontal => Ray {
                z: end - SECTION_WIDTH,
                r: self.r + SECTION_WIDTH,
                direction: Direction::Vertical,
                end: self.end,
            },
            Direction::Vertical => Ray {
                z: self.z + SECTION_WIDTH,
                r: end - SECTION_WIDTH,
                direction: Direction::Horizontal,
                end: self.end,
            },
        }
    }
}

pub(crate) struct OuterUsher<'a> {
    boundaries: &'a mut [Boundary],
    network: &'a mut SectionNetwork,
    edge: GlobalEdge,
    stations: usize,
}

impl<'a> OuterUsher<'a> {
    /// `boundaries` must already be ordered outermost first.
    pub fn new(
        boundaries: &'a mut [Boundary],
        network: &'a mut SectionNetwork,
        edge: GlobalEdge,
    ) -> Self {
        let stations = network.stations().count();
        Self { boundaries, network, edge, stations }
    }

    pub fn go_all(&mut self) -> Result<(), MaterialwayError> {
        for idx in 0..self.boundaries.len() {
            self.go(BoundaryId::from_index(idx))?;
        }
        Ok(())
    }

    /// Creates the principal section of `id` and routes its chain outward. Returns the principal.
    pub fn go(&mut self, id: BoundaryId) -> Result<SectionId, MaterialwayError> {
        let boundary = &self.boundaries[id.index()];
        let main = boundary.exit_direction();
        let principal =
            self.network.push(Section::passthrough(boundary.principal_rect(), main, Some(id)));
        let mut ray = boundary.exit_ray(self.edge.along(main));
        self.boundaries[id.index()].set_outgoing(principal);

        let mut chain: SmallVec<[SectionId; 8]> = smallvec![principal];
        let mut detour_target: Option<i32> = None;
        let mut skirted: Option<BoundaryId> = None;
        loop {
            let limit = self.edge.along(ray.direction);
            ray.end = detour_target.map_or(limit, |target| target.min(limit));

            let blocker = self.nearest_boundary(&ray);
            let joint = self.nearest_section(&ray, &chain);
            match (joint, blocker) {
                (Some((target, hit)), blocker)
                    if blocker.map_or(true, |(_, b)| hit.coord <= b.coord) =>
                {
                    if hit.coord > ray.along() {
                        self.extend(&mut chain, &ray, hit.coord);
                    }
                    let joined = self.network.split(target, hit.join);
                    let tail = chain[chain.len() - 1];
                    self.network.link(tail, joined);
                    debug!(
                        "boundary {id}: joined {joined} at {} ({} legs)",
                        hit.join,
                        chain.len() - 1
                    );
                    return Ok(principal);
                }
                (_, Some((blocker, hit))) => {
                    let stop = hit.coord - SAFETY_SPACE;
                    if stop <= ray.along() {
                        // a short leg turns back into its own boundary: blame what it skirted
                        let culprit = match skirted {
                            Some(skirted) if blocker == id => skirted,
                            _ => blocker,
                        };
                        return Err(MaterialwayError::NoProgress {
                            boundary: id,
                            substructure: self.boundaries[id.index()].substructure().clone(),
                            blocker: self.boundaries[culprit.index()].substructure().clone(),
                            direction: ray.direction,
                            z: ray.z,
                            r: ray.r,
                        });
                    }
                    self.extend(&mut chain, &ray, stop);
                    detour_target = match detour_target {
                        Some(_) => None,
                        None => {
                            let margin = self.boundaries[blocker.index()].skirt_margin();
                            Some(hit.border + margin + SECTION_WIDTH)
                        }
                    };
                    debug!("boundary {id}: skirting {blocker} from {stop}");
                    skirted = Some(blocker);
                    ray = ray.turned(stop);
                }
                _ => {
                    let end = ray.end.max(ray.along());
                    if end > ray.along() {
                        self.extend(&mut chain, &ray, end);
                    }
                    if detour_target.is_some() && end < limit {
                        detour_target = None;
                        ray = ray.turned(end);
                        continue;
                    }
                    let station = self.place_station(ray.advanced(end));
                    let tail = chain[chain.len() - 1];
                    self.network.link(tail, station);
                    debug!("boundary {id}: new station {station} ({} legs)", chain.len() - 1);
                    return Ok(principal);
                }
            }
        }
    }

    fn extend(&mut self, chain: &mut SmallVec<[SectionId; 8]>, ray: &Ray, end: i32) {
        let rect = Section::lane(ray.z, ray.r, ray.direction, end);
        let leg = self.network.push(Section::passthrough(rect, ray.direction, None));
        let tail = chain[chain.len() - 1];
        self.network.link(tail, leg);
        chain.push(leg);
    }

    fn place_station(&mut self, ray: Ray) -> SectionId {
        self.stations += 1;
        let label = SmolStr::new(format!("PP{}", self.stations));
        let rect = Section::lane(ray.z, ray.r, ray.direction, ray.along() + STATION_LENGTH);
        self.network.push(Section::station(rect, ray.direction, Station::new(label)))
    }

    /// Nearest boundary on the ray. Equal hits prefer the furthest border, then the lowest id.
    fn nearest_boundary(&self, ray: &Ray) -> Option<(BoundaryId, BoundaryHit)> {
        self.boundaries
            .iter()
            .enumerate()
            .filter_map(|(idx, boundary)| {
                boundary.hit(ray).map(|hit| (BoundaryId::from_index(idx), hit))
            })
            .min_by(|(id_a, a), (id_b, b)| {
                a.coord
                    .cmp(&b.coord)
                    .then_with(|| b.border.cmp(&a.border))
                    .then_with(|| id_a.cmp(id_b))
            })
    }

    /// Nearest section on the ray, ignoring the chain being built. Equal hits prefer the lowest id.
    fn nearest_section(&self, ray: &Ray, chain: &[SectionId]) -> Option<(SectionId, SectionHit)> {
        self.network
            .iter()
            .filter(|(id, _)| !chain.contains(id))
            .filter_map(|(id, section)| section.hit(ray).map(|hit| (id, hit)))
            .min_by(|(id_a, a), (id_b, b)| a.coord.cmp(&b.coord).then_with(|| id_a.cmp(id_b)))
    }
}
