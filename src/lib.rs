// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Materialway: service routing through a tracker's (z, r) half plane.
//!
//! Every substructure is wrapped in a padded boundary, outer chains of sections carry its
//! services to a station at the global edge, and each module is bound to a collection section
//! feeding the boundary's principal section. Trains released from the modules deposit material
//! along the way; the deposits become inactive elements for the material budget.

pub mod analysis;
pub mod grid;
pub mod inactive;
pub mod material;
pub mod materialway;
pub mod model;
pub mod report;
pub mod store;
