// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

/// Rewrites one delivered material into another, scaling its mass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRule {
    input: SmolStr,
    output: SmolStr,
    factor: f64,
}

impl ConversionRule {
    pub fn new(input: impl Into<SmolStr>, output: impl Into<SmolStr>, factor: f64) -> Self {
        Self { input: input.into(), output: output.into(), factor }
    }

    pub fn input(&self) -> &SmolStr {
        &self.input
    }

    pub fn output(&self) -> &SmolStr {
        &self.output
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// Terminal sink of one or more chains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    label: SmolStr,
    rules: Vec<ConversionRule>,
}

impl Station {
    pub fn new(label: impl Into<SmolStr>) -> Self {
        Self { label: label.into(), rules: Vec::new() }
    }

    pub fn label(&self) -> &SmolStr {
        &self.label
    }

    pub fn rules(&self) -> &[ConversionRule] {
        &self.rules
    }

    pub(crate) fn push_rule(&mut self, rule: ConversionRule) {
        self.rules.push(rule);
    }

    /// Applies the conversion rules to `grams` of `material`, reporting every outcome to `emit`.
    ///
    /// Several rules may match the same input (one material splitting into several). Materials
    /// without a matching rule pass through unchanged.
    pub fn convert(&self, material: &SmolStr, grams: f64, mut emit: impl FnMut(&SmolStr, f64)) {
        let mut matched = false;
        for rule in self.rules.iter().filter(|rule| &rule.input == material) {
            matched = true;
            emit(&rule.output, grams * rule.factor);
        }
        if !matched {
            emit(material, grams);
        }
    }
}
