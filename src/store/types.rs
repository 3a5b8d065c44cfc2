// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire types of the JSON inputs.
//!
//! Lengths are millimetres. Ids are plain strings here and are validated when converted into the
//! domain model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrackerJson {
    pub substructures: Vec<SubstructureJson>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubstructureKindJson {
    Barrel,
    Endcap,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubstructureJson {
    pub substructure_id: String,
    pub kind: SubstructureKindJson,
    #[serde(default)]
    pub modules: Vec<ModuleJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModuleJson {
    pub module_id: String,
    pub min_z: f64,
    pub min_r: f64,
    pub max_z: f64,
    pub max_r: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ServicesJson {
    /// Emitted by every module.
    #[serde(default)]
    pub defaults: Vec<ServiceElementJson>,
    #[serde(default)]
    pub modules: Vec<ModuleServicesJson>,
    #[serde(default)]
    pub conversions: Vec<ConversionRuleJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServiceElementJson {
    pub material: String,
    pub quantity: f64,
    /// `g`, `g/m` or `mm`.
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModuleServicesJson {
    pub module_id: String,
    #[serde(default)]
    pub services: Vec<ServiceElementJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConversionRuleJson {
    /// Station label; every station when absent.
    #[serde(default)]
    pub station: Option<String>,
    pub input: String,
    pub output: String,
    pub factor: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MaterialTableJson {
    #[serde(default)]
    pub materials: Vec<MaterialJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MaterialJson {
    pub tag: String,
    /// g/cm³
    pub density: f64,
    /// g/cm²
    pub radiation_length: f64,
    /// g/cm²
    pub interaction_length: f64,
}
