// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Integer routing grid.
//!
//! All routing geometry lives on a micron grid so that collision tests reduce to integer
//! comparisons. Millimetre inputs are converted with [`discretize`] and converted back for
//! reporting with [`undiscretize`].

/// Grid units per millimetre (one unit is one micron).
pub const GRID_FACTOR: f64 = 1000.0;

/// Width of every routing section, across its direction of travel.
pub const SECTION_WIDTH: i32 = 2_000;
/// Gap left between a section and the boundary it stops in front of.
pub const SAFETY_SPACE: i32 = 1_000;
/// Clearance added around every substructure envelope.
pub const BOUNDARY_PADDING: i32 = 10_000;
/// Clearance added on the exit edge of a substructure; the principal lane runs inside it.
pub const BOUNDARY_PRINCIPAL_PADDING: i32 = 15_000;
/// Distance between the outermost module and the global z edge.
pub const GLOBAL_MAX_Z_PADDING: i32 = 100_000;
/// Distance between the outermost module and the global r edge.
pub const GLOBAL_MAX_R_PADDING: i32 = 30_000;
/// Clearance when skirting a barrel boundary, and between a layer and its collection lane.
pub const LAYER_SECTION_MARGIN: i32 = 2_000;
/// Clearance when skirting an endcap boundary, and between a disk and its collection lane.
pub const DISK_SECTION_MARGIN: i32 = 2_000;
/// Module intervals closer than this belong to the same layer or disk.
pub const SECTION_TOLERANCE: i32 = 1_000;
/// Length of the terminal station tile placed at the global edge.
pub const STATION_LENGTH: i32 = 10_000;
/// Largest coordinate magnitude routed on the grid (one kilometre). Paddings, detours and
/// stations are added on top of it without leaving `i32`.
pub const MAX_COORDINATE: i32 = 1_000_000_000;

/// Converts millimetres to grid units, truncating toward zero.
///
/// Values within float noise of a grid line snap onto it, so that
/// `discretize(undiscretize(x)) == x` holds for every grid-aligned `x`.
pub fn discretize(mm: f64) -> i32 {
    let scaled = mm * GRID_FACTOR;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        return nearest as i32;
    }
    scaled.trunc() as i32
}

/// Converts grid units back to millimetres.
pub fn undiscretize(units: i32) -> f64 {
    f64::from(units) / GRID_FACTOR
}

/// An axis-aligned rectangle in the (z, r) half plane, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub min_z: i32,
    pub min_r: i32,
    pub max_z: i32,
    pub max_r: i32,
}

impl GridRect {
    pub fn new(min_z: i32, min_r: i32, max_z: i32, max_r: i32) -> Self {
        debug_assert!(min_z <= max_z && min_r <= max_r, "inverted rect");
        Self { min_z, min_r, max_z, max_r }
    }

    /// True when no corner lies further than `limit` from the origin along either axis.
    pub fn within(&self, limit: i32) -> bool {
        [self.min_z, self.min_r, self.max_z, self.max_r]
            .iter()
            .all(|value| value.unsigned_abs() <= limit.unsigned_abs())
    }

    /// True when the interiors intersect. Rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.min_z < other.max_z
            && other.min_z < self.max_z
            && self.min_r < other.max_r
            && other.min_r < self.max_r
    }

    pub fn union(&self, other: &GridRect) -> GridRect {
        GridRect {
            min_z: self.min_z.min(other.min_z),
            min_r: self.min_r.min(other.min_r),
            max_z: self.max_z.max(other.max_z),
            max_r: self.max_r.max(other.max_r),
        }
    }

    pub fn width_z(&self) -> i32 {
        self.max_z - self.min_z
    }

    pub fn width_r(&self) -> i32 {
        self.max_r - self.min_r
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{discretize, undiscretize, GridRect, GRID_FACTOR};

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(-7)]
    #[case(999)]
    #[case(123_457)]
    #[case(2_900_001)]
    #[case(-1_234_567)]
    fn grid_aligned_values_survive_a_round_trip(#[case] units: i32) {
        assert_eq!(discretize(undiscretize(units)), units);
    }

    #[rstest]
    #[case(0.0004, 0)]
    #[case(1.2349, 1234)]
    #[case(-1.2349, -1234)]
    #[case(150.0, 150_000)]
    fn discretize_truncates_toward_zero(#[case] mm: f64, #[case] units: i32) {
        assert_eq!(discretize(mm), units);
    }

    #[test]
    fn arbitrary_reals_round_trip_within_one_grid_unit() {
        let mut mm = -523.137_f64;
        while mm < 523.0 {
            let back = undiscretize(discretize(mm));
            assert!(
                (back - mm).abs() * GRID_FACTOR < 1.0,
                "round trip drifted more than one unit: {mm} -> {back}"
            );
            mm += 0.731_9;
        }
    }

    #[test]
    fn rects_sharing_an_edge_do_not_overlap() {
        let below = GridRect::new(0, 100, 500, 200);
        let above = GridRect::new(0, 200, 500, 210);
        assert!(!below.overlaps(&above));
        assert!(!above.overlaps(&below));

        let crossing = GridRect::new(250, 150, 260, 250);
        assert!(crossing.overlaps(&below));
        assert!(crossing.overlaps(&above));
    }
}
