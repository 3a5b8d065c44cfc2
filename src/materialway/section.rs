// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::f64::consts::PI;
use std::fmt;

use crate::grid::{undiscretize, GridRect, SECTION_WIDTH};
use crate::model::ids::{BoundaryId, SectionId};

use super::station::Station;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Along z.
    Horizontal,
    /// Along r.
    Vertical,
}

impl Direction {
    pub fn inverse(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Extent of `rect` along this direction.
    pub fn span(self, rect: &GridRect) -> (i32, i32) {
        match self {
            Self::Horizontal => (rect.min_z, rect.max_z),
            Self::Vertical => (rect.min_r, rect.max_r),
        }
    }

    /// Extent of `rect` across this direction.
    pub fn cross_span(self, rect: &GridRect) -> (i32, i32) {
        self.inverse().span(rect)
    }

    fn with_span(self, rect: &GridRect, lo: i32, hi: i32) -> GridRect {
        match self {
            Self::Horizontal => GridRect { min_z: lo, max_z: hi, ..*rect },
            Self::Vertical => GridRect { min_r: lo, max_r: hi, ..*rect },
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionKind {
    /// Deposits along its length and forwards to its successor.
    Passthrough,
    /// Terminal sink applying conversion rules.
    Station(Station),
}

/// A rectangular strip of the materialway.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    rect: GridRect,
    bearing: Direction,
    next: Option<SectionId>,
    owner: Option<BoundaryId>,
    kind: SectionKind,
}

impl Section {
    pub(crate) fn passthrough(
        rect: GridRect,
        bearing: Direction,
        owner: Option<BoundaryId>,
    ) -> Self {
        Self { rect, bearing, next: None, owner, kind: SectionKind::Passthrough }
    }

    pub(crate) fn station(rect: GridRect, bearing: Direction, station: Station) -> Self {
        Self { rect, bearing, next: None, owner: None, kind: SectionKind::Station(station) }
    }

    /// A straight run of width [`SECTION_WIDTH`] whose lane starts at `(z, r)`.
    pub(crate) fn lane(z: i32, r: i32, bearing: Direction, end: i32) -> GridRect {
        match bearing {
            Direction::Horizontal => GridRect::new(z, r, end, r + SECTION_WIDTH),
            Direction::Vertical => GridRect::new(z, r, z + SECTION_WIDTH, end),
        }
    }

    pub fn rect(&self) -> &GridRect {
        &self.rect
    }

    pub fn bearing(&self) -> Direction {
        self.bearing
    }

    pub fn next(&self) -> Option<SectionId> {
        self.next
    }

    /// The boundary whose interior this section may occupy, if any.
    pub fn owner(&self) -> Option<BoundaryId> {
        self.owner
    }

    pub fn kind(&self) -> &SectionKind {
        &self.kind
    }

    pub fn is_station(&self) -> bool {
        matches!(self.kind, SectionKind::Station(_))
    }

    pub fn as_station(&self) -> Option<&Station> {
        match &self.kind {
            SectionKind::Station(station) => Some(station),
            SectionKind::Passthrough => None,
        }
    }

    pub(crate) fn as_station_mut(&mut self) -> Option<&mut Station> {
        match &mut self.kind {
            SectionKind::Station(station) => Some(station),
            SectionKind::Passthrough => None,
        }
    }

    /// Length along the bearing, in grid units.
    pub fn length(&self) -> i32 {
        let (lo, hi) = self.bearing.span(&self.rect);
        hi - lo
    }

    pub fn length_mm(&self) -> f64 {
        undiscretize(self.length())
    }

    /// Surface crossed by a straight track: the tube wall of a horizontal section, the annulus of a
    /// vertical one. Square millimetres.
    pub fn surface_mm2(&self) -> f64 {
        let min_r = undiscretize(self.rect.min_r);
        let max_r = undiscretize(self.rect.max_r);
        match self.bearing {
            Direction::Horizontal => 2.0 * PI * (min_r + max_r) / 2.0 * self.length_mm(),
            Direction::Vertical => PI * (max_r * max_r - min_r * min_r),
        }
    }

    /// Tests whether `ray` runs into this section before `ray.end`.
    pub(crate) fn hit(&self, ray: &Ray) -> Option<SectionHit> {
        let coord = ray.entry(&self.rect)?;
        if self.bearing == ray.direction {
            return Some(SectionHit { coord, join: coord });
        }
        let (cross_lo, _) = ray.direction.cross_span(&self.rect);
        Some(SectionHit { coord, join: cross_lo.max(ray.across()) })
    }
}

/// Where a ray meets a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionHit {
    /// Coordinate along the ray.
    pub coord: i32,
    /// Coordinate along the hit section's bearing where the new chain attaches.
    pub join: i32,
}

/// A lane of width [`SECTION_WIDTH`] starting at `(z, r)` and walking toward `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ray {
    pub z: i32,
    pub r: i32,
    pub direction: Direction,
    pub end: i32,
}

impl Ray {
    pub fn along(&self) -> i32 {
        match self.direction {
            Direction::Horizontal => self.z,
            Direction::Vertical => self.r,
        }
    }

    pub fn across(&self) -> i32 {
        match self.direction {
            Direction::Horizontal => self.r,
            Direction::Vertical => self.z,
        }
    }

    /// True when the lane shares interior with the open interval `(lo, hi)` across the ray.
    pub fn lane_overlaps(&self, lo: i32, hi: i32) -> bool {
        self.across() < hi && self.across() + SECTION_WIDTH > lo
    }

    /// First coordinate along the ray at which the lane enters `rect`, if it does so by `end`.
    ///
    /// A rect the lane already sits in enters at the ray's start.
    pub fn entry(&self, rect: &GridRect) -> Option<i32> {
        let (along_lo, along_hi) = self.direction.span(rect);
        let (cross_lo, cross_hi) = self.direction.cross_span(rect);
        if !self.lane_overlaps(cross_lo, cross_hi)
            || along_hi <= self.along()
            || along_lo > self.end
        {
            return None;
        }
        Some(along_lo.max(self.along()))
    }
}

/// Arena of all sections; handles are stable [`SectionId`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionNetwork {
    sections: Vec<Section>,
}

impl SectionNetwork {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &Section)> + '_ {
        self.sections.iter().enumerate().map(|(idx, section)| (SectionId::from_index(idx), section))
    }

    pub fn stations(&self) -> impl Iterator<Item = (SectionId, &Station)> + '_ {
        self.iter().filter_map(|(id, section)| section.as_station().map(|station| (id, station)))
    }

    /// Follows successors starting at `start` (inclusive).
    ///
    /// Stops after visiting as many sections as the network holds, so a malformed cycle cannot
    /// hang the caller.
    pub fn chain_from(&self, start: SectionId) -> Chain<'_> {
        Chain { network: self, cursor: Some(start), remaining: self.sections.len() }
    }

    pub(crate) fn push(&mut self, section: Section) -> SectionId {
        let id = SectionId::from_index(self.sections.len());
        self.sections.push(section);
        id
    }

    pub(crate) fn link(&mut self, from: SectionId, to: SectionId) {
        debug_assert_ne!(from, to, "self loop");
        if let Some(section) = self.sections.get_mut(from.index()) {
            debug_assert!(section.next.is_none(), "section {from} already has a successor");
            section.next = Some(to);
        }
    }

    /// Splits `id` at `at` (a coordinate along its bearing) and returns the piece starting there.
    ///
    /// The original handle keeps the lower piece, which now forwards into the new upper piece, so
    /// chains already joined at the section's start are unaffected. Stations are never split, and
    /// a split point outside the open interior returns `id` unchanged.
    pub(crate) fn split(&mut self, id: SectionId, at: i32) -> SectionId {
        let Some(section) = self.sections.get(id.index()) else {
            return id;
        };
        if section.is_station() {
            return id;
        }
        let (lo, hi) = section.bearing.span(&section.rect);
        if at <= lo || at >= hi {
            return id;
        }

        let bearing = section.bearing;
        let upper = Section {
            rect: bearing.with_span(&section.rect, at, hi),
            bearing,
            next: section.next,
            owner: section.owner,
            kind: SectionKind::Passthrough,
        };
        let upper_id = self.push(upper);

        let lower = &mut self.sections[id.index()];
        lower.rect = bearing.with_span(&lower.rect, lo, at);
        lower.next = Some(upper_id);
        upper_id
    }

    /// Walks the collinear continuation of `start` to the piece whose extent contains `at`.
    pub(crate) fn locate(&self, start: SectionId, at: i32) -> SectionId {
        let mut cursor = start;
        for _ in 0..self.sections.len() {
            let section = &self.sections[cursor.index()];
            let (_, hi) = section.bearing.span(&section.rect);
            let Some(next_id) = section.next else {
                break;
            };
            let next = &self.sections[next_id.index()];
            let collinear = next.bearing == section.bearing
                && next.bearing.cross_span(&next.rect) == section.bearing.cross_span(&section.rect);
            if at < hi || !collinear {
                break;
            }
            cursor = next_id;
        }
        cursor
    }
}

pub struct Chain<'a> {
    network: &'a SectionNetwork,
    cursor: Option<SectionId>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (SectionId, &'a Section);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        let section = self.network.get(id)?;
        self.remaining -= 1;
        self.cursor = section.next;
        Some((id, section))
    }
}
