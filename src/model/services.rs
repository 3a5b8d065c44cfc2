// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use super::ids::ModuleId;
use crate::materialway::train::WagonKind;

/// One service material a module sends out along the materialway.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceElement {
    kind: WagonKind,
    material: SmolStr,
    quantity: f64,
}

impl ServiceElement {
    pub fn new(kind: WagonKind, material: impl Into<SmolStr>, quantity: f64) -> Self {
        Self { kind, material: material.into(), quantity }
    }

    pub fn kind(&self) -> WagonKind {
        self.kind
    }

    pub fn material(&self) -> &SmolStr {
        &self.material
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}

/// Per-module service declarations.
///
/// `defaults` apply to every module; module entries are added on top of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceCatalog {
    defaults: Vec<ServiceElement>,
    per_module: BTreeMap<ModuleId, Vec<ServiceElement>>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_default(&mut self, element: ServiceElement) {
        self.defaults.push(element);
    }

    pub fn push_for_module(&mut self, module: ModuleId, element: ServiceElement) {
        self.per_module.entry(module).or_default().push(element);
    }

    pub fn defaults(&self) -> &[ServiceElement] {
        &self.defaults
    }

    pub fn module_entries(&self) -> &BTreeMap<ModuleId, Vec<ServiceElement>> {
        &self.per_module
    }

    pub fn elements_for<'a>(
        &'a self,
        module: &ModuleId,
    ) -> impl Iterator<Item = &'a ServiceElement> + 'a {
        let specific = self.per_module.get(module).map(Vec::as_slice).unwrap_or(&[]);
        self.defaults.iter().chain(specific.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceCatalog, ServiceElement};
    use crate::materialway::train::WagonKind;
    use crate::model::ids::ModuleId;

    #[test]
    fn module_entries_extend_the_defaults() {
        let m1 = ModuleId::new("m1").expect("id");
        let m2 = ModuleId::new("m2").expect("id");

        let mut catalog = ServiceCatalog::new();
        catalog.push_default(ServiceElement::new(WagonKind::GramsPerMeter, "Cu", 1.5));
        catalog.push_for_module(m1.clone(), ServiceElement::new(WagonKind::Grams, "Al", 3.0));

        let for_m1 = catalog.elements_for(&m1).map(|e| e.material().as_str()).collect::<Vec<_>>();
        let for_m2 = catalog.elements_for(&m2).map(|e| e.material().as_str()).collect::<Vec<_>>();
        assert_eq!(for_m1, vec!["Cu", "Al"]);
        assert_eq!(for_m2, vec!["Cu"]);
    }
}
