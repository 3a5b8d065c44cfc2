// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Input data model.
//!
//! The geometry collaborator hands in substructures (barrels and endcaps) made of module
//! placements, plus per-module service declarations. Everything here is read-only to the router.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod ids;
pub mod services;

pub use geometry::{
    Envelope, ModuleGroup, ModulePlacement, Substructure, SubstructureKind, Tracker,
};
pub use ids::{BoundaryId, Id, IdError, ModuleId, SectionId, SubstructureId};
pub use services::{ServiceCatalog, ServiceElement};
