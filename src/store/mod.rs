// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Loading the JSON inputs into the domain model.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use smol_str::SmolStr;

use crate::grid::{GRID_FACTOR, MAX_COORDINATE};
use crate::material::{MaterialProperties, MaterialTable};
use crate::materialway::{ConversionRule, Materialway, MaterialwayError, WagonKind};
use crate::model::{
    Envelope, IdError, ModuleId, ModulePlacement, ServiceCatalog, ServiceElement, Substructure,
    SubstructureId, SubstructureKind, Tracker,
};

pub mod types;

pub use types::{
    ConversionRuleJson, MaterialJson, MaterialTableJson, ModuleJson, ModuleServicesJson,
    ServiceElementJson, ServicesJson, SubstructureJson, SubstructureKindJson, TrackerJson,
};

/// Reported as the path of inputs parsed from memory.
const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    InvalidQuantity {
        field: &'static str,
        value: f64,
    },
    UnknownUnit {
        field: &'static str,
        value: String,
    },
    EmptyMaterial {
        field: &'static str,
    },
    DuplicateMaterial {
        tag: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId { field, value, source } => {
                write!(f, "invalid id in {field}: {value:?} ({source})")
            }
            Self::InvalidQuantity { field, value } => {
                write!(f, "invalid quantity in {field}: {value}")
            }
            Self::UnknownUnit { field, value } => {
                write!(f, "unknown unit in {field}: {value:?} (expected g, g/m or mm)")
            }
            Self::EmptyMaterial { field } => write!(f, "empty material tag in {field}"),
            Self::DuplicateMaterial { tag } => write!(f, "material {tag:?} is declared twice"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidQuantity { .. } => None,
            Self::UnknownUnit { .. } => None,
            Self::EmptyMaterial { .. } => None,
            Self::DuplicateMaterial { .. } => None,
        }
    }
}

/// A conversion rule addressed by station label.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRule {
    pub station: Option<SmolStr>,
    pub rule: ConversionRule,
}

/// Service declarations plus the conversion rules stations apply on delivery.
#[derive(Debug, Clone, Default)]
pub struct ServiceInputs {
    pub catalog: ServiceCatalog,
    pub conversions: Vec<StationRule>,
}

impl ServiceInputs {
    /// Installs the conversion rules on a built materialway.
    pub fn apply_conversions(&self, materialway: &mut Materialway) -> Result<(), MaterialwayError> {
        for conversion in &self.conversions {
            let station = match &conversion.station {
                Some(label) => Some(materialway.station_by_label(label).ok_or_else(|| {
                    MaterialwayError::UnknownStation { label: label.to_string() }
                })?),
                None => None,
            };
            materialway.add_conversion_rule(station, conversion.rule.clone())?;
        }
        Ok(())
    }
}

pub fn load_tracker(path: &Path) -> Result<Tracker, StoreError> {
    let json: TrackerJson = read_json(path)?;
    tracker_from_json(json)
}

pub fn tracker_from_str(input: &str) -> Result<Tracker, StoreError> {
    tracker_from_json(parse_json(Path::new(INLINE_SOURCE), input)?)
}

pub fn load_services(path: &Path) -> Result<ServiceInputs, StoreError> {
    let json: ServicesJson = read_json(path)?;
    services_from_json(json)
}

pub fn services_from_str(input: &str) -> Result<ServiceInputs, StoreError> {
    services_from_json(parse_json(Path::new(INLINE_SOURCE), input)?)
}

pub fn load_material_table(path: &Path) -> Result<MaterialTable, StoreError> {
    let json: MaterialTableJson = read_json(path)?;
    material_table_from_json(json)
}

pub fn material_table_from_str(input: &str) -> Result<MaterialTable, StoreError> {
    material_table_from_json(parse_json(Path::new(INLINE_SOURCE), input)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let input = fs::read_to_string(path)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    parse_json(path, &input)
}

fn parse_json<T: DeserializeOwned>(path: &Path, input: &str) -> Result<T, StoreError> {
    serde_json::from_str(input)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

pub fn tracker_from_json(json: TrackerJson) -> Result<Tracker, StoreError> {
    let mut substructures = Vec::with_capacity(json.substructures.len());
    for substructure in json.substructures {
        let id = SubstructureId::new(substructure.substructure_id.clone()).map_err(|source| {
            StoreError::InvalidId {
                field: "substructures[].substructure_id",
                value: substructure.substructure_id.clone(),
                source: Box::new(source),
            }
        })?;
        let kind = match substructure.kind {
            SubstructureKindJson::Barrel => SubstructureKind::Barrel,
            SubstructureKindJson::Endcap => SubstructureKind::Endcap,
        };

        let mut modules = Vec::with_capacity(substructure.modules.len());
        for module in substructure.modules {
            let module_id = ModuleId::new(module.module_id.clone()).map_err(|source| {
                StoreError::InvalidId {
                    field: "substructures[].modules[].module_id",
                    value: module.module_id.clone(),
                    source: Box::new(source),
                }
            })?;
            let limit = f64::from(MAX_COORDINATE) / GRID_FACTOR;
            for value in [module.min_z, module.min_r, module.max_z, module.max_r] {
                if !value.is_finite() || value.abs() > limit {
                    return Err(StoreError::InvalidQuantity {
                        field: "substructures[].modules[]",
                        value,
                    });
                }
            }
            if module.min_r < 0.0 || module.max_r < 0.0 {
                return Err(StoreError::InvalidQuantity {
                    field: "substructures[].modules[].min_r",
                    value: module.min_r.min(module.max_r),
                });
            }
            let envelope = Envelope::new(module.min_z, module.min_r, module.max_z, module.max_r);
            modules.push(ModulePlacement::new(module_id, envelope));
        }
        substructures.push(Substructure::new(id, kind, modules));
    }
    Ok(Tracker::new(substructures))
}

pub fn services_from_json(json: ServicesJson) -> Result<ServiceInputs, StoreError> {
    let mut catalog = ServiceCatalog::new();
    for element in json.defaults {
        catalog.push_default(service_element_from_json(element, "defaults[]")?);
    }
    for module in json.modules {
        let module_id = ModuleId::new(module.module_id.clone()).map_err(|source| {
            StoreError::InvalidId {
                field: "modules[].module_id",
                value: module.module_id.clone(),
                source: Box::new(source),
            }
        })?;
        for element in module.services {
            catalog.push_for_module(
                module_id.clone(),
                service_element_from_json(element, "modules[].services[]")?,
            );
        }
    }

    let mut conversions = Vec::with_capacity(json.conversions.len());
    for conversion in json.conversions {
        if conversion.input.trim().is_empty() {
            return Err(StoreError::EmptyMaterial { field: "conversions[].input" });
        }
        if conversion.output.trim().is_empty() {
            return Err(StoreError::EmptyMaterial { field: "conversions[].output" });
        }
        check_quantity("conversions[].factor", conversion.factor)?;
        conversions.push(StationRule {
            station: conversion.station.map(SmolStr::from),
            rule: ConversionRule::new(conversion.input, conversion.output, conversion.factor),
        });
    }

    Ok(ServiceInputs { catalog, conversions })
}

fn service_element_from_json(
    json: ServiceElementJson,
    field: &'static str,
) -> Result<ServiceElement, StoreError> {
    let kind = WagonKind::from_unit(&json.unit)
        .ok_or(StoreError::UnknownUnit { field, value: json.unit.clone() })?;
    if json.material.trim().is_empty() {
        return Err(StoreError::EmptyMaterial { field });
    }
    check_quantity(field, json.quantity)?;
    Ok(ServiceElement::new(kind, json.material, json.quantity))
}

pub fn material_table_from_json(json: MaterialTableJson) -> Result<MaterialTable, StoreError> {
    let mut table = MaterialTable::new();
    for material in json.materials {
        if material.tag.trim().is_empty() {
            return Err(StoreError::EmptyMaterial { field: "materials[].tag" });
        }
        for (field, value) in [
            ("materials[].density", material.density),
            ("materials[].radiation_length", material.radiation_length),
            ("materials[].interaction_length", material.interaction_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StoreError::InvalidQuantity { field, value });
            }
        }
        let properties = MaterialProperties::new(
            material.density,
            material.radiation_length,
            material.interaction_length,
        );
        if table.insert(material.tag.as_str(), properties).is_some() {
            return Err(StoreError::DuplicateMaterial { tag: material.tag });
        }
    }
    Ok(table)
}

fn check_quantity(field: &'static str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidQuantity { field, value })
    }
}
