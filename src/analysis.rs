// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One material-accumulation pass.

use log::info;
use rayon::prelude::*;

use crate::material::MaterialTable;
use crate::materialway::{MaterialLedger, Materialway, RouteError, Train};
use crate::model::ids::{ModuleId, SectionId};
use crate::model::services::ServiceCatalog;

/// The train a module emits: catalog defaults followed by its own entries.
pub fn train_for(services: &ServiceCatalog, module: &ModuleId) -> Train {
    let mut train = Train::new();
    for element in services.elements_for(module) {
        train.add_wagon(element.kind(), element.material().clone(), element.quantity());
    }
    train
}

/// Releases one train per attached module and books everything into a fresh ledger.
///
/// Modules are released in parallel; their ledgers are merged in module order, so the result
/// does not depend on scheduling.
pub fn accumulate(
    materialway: &Materialway,
    services: &ServiceCatalog,
    materials: &MaterialTable,
) -> Result<MaterialLedger, RouteError> {
    let emitters = materialway
        .modules()
        .filter(|(_, binding)| binding.is_attached())
        .map(|(module, binding)| (module, binding.section()))
        .collect::<Vec<(&ModuleId, SectionId)>>();

    let ledgers = emitters
        .par_iter()
        .map(|(module, section)| -> Result<MaterialLedger, RouteError> {
            let mut ledger = MaterialLedger::default();
            let train = train_for(services, module);
            if !train.is_empty() {
                train.release(materialway.sections(), *section, materials, &mut ledger)?;
            }
            Ok(ledger)
        })
        .collect::<Result<Vec<_>, RouteError>>()?;

    let mut total = MaterialLedger::default();
    for ledger in ledgers {
        total.merge(ledger);
    }
    info!(
        "accumulated services of {} modules into {} stations",
        emitters.len(),
        total.stations().count()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use smol_str::SmolStr;

    use super::accumulate;
    use crate::material::MaterialTable;
    use crate::materialway::{ConversionRule, Materialway, WagonKind};
    use crate::model::fixtures;
    use crate::model::ids::ModuleId;
    use crate::model::services::{ServiceCatalog, ServiceElement};

    fn station_grams(ledger: &crate::materialway::MaterialLedger, material: &str) -> f64 {
        ledger
            .stations()
            .filter_map(|(_, totals)| totals.get(&SmolStr::new(material)).copied())
            .sum()
    }

    #[test]
    fn single_module_delivers_its_length_scaled_services() {
        let materialway = Materialway::build(&fixtures::single_barrel()).expect("build");
        let mut services = ServiceCatalog::new();
        services.push_default(ServiceElement::new(WagonKind::GramsPerMeter, "Cu", 2.0));

        let ledger = accumulate(&materialway, &services, &MaterialTable::default()).expect("pass");

        // collection 512 mm, principal piece 8 mm, outer leg 20 mm
        assert!((station_grams(&ledger, "Cu") - 2.0 * 0.540).abs() < 1e-9);
    }

    #[test]
    fn detached_modules_emit_nothing() {
        let mut materialway = Materialway::build(&fixtures::barrel_and_endcaps()).expect("build");
        let mut services = ServiceCatalog::new();
        services.push_default(ServiceElement::new(WagonKind::Grams, "Al", 1.0));

        let before = accumulate(&materialway, &services, &MaterialTable::default()).expect("pass");
        assert_eq!(station_grams(&before, "Al"), 12.0);

        materialway.detach_module(&ModuleId::new("TB_L3_pos").unwrap()).expect("detach");
        let after = accumulate(&materialway, &services, &MaterialTable::default()).expect("pass");
        assert_eq!(station_grams(&after, "Al"), 11.0);
    }

    #[test]
    fn passes_are_deterministic() {
        let mut materialway = Materialway::build(&fixtures::barrel_and_endcaps()).expect("build");
        materialway
            .add_conversion_rule(None, ConversionRule::new("cable", "Cu", 0.3))
            .expect("rule");
        let mut services = ServiceCatalog::new();
        services.push_default(ServiceElement::new(WagonKind::GramsPerMeter, "cable", 1.7));
        services.push_for_module(
            ModuleId::new("TE_D1_inner").unwrap(),
            ServiceElement::new(WagonKind::Grams, "glue", 0.2),
        );

        let first = accumulate(&materialway, &services, &MaterialTable::default()).expect("pass");
        for _ in 0..4 {
            let again =
                accumulate(&materialway, &services, &MaterialTable::default()).expect("pass");
            assert_eq!(again, first);
        }
        assert!(station_grams(&first, "Cu") > 0.0);
        assert_eq!(station_grams(&first, "cable"), 0.0);
    }
}
