// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Carriers moving service material down a chain.
//!
//! A [`Train`] only holds declared rates. Releasing it walks the chain read-only and books every
//! deposit into a caller-owned [`MaterialLedger`], so trains from different modules can be
//! released concurrently against the same network.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Serialize;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::material::MaterialTable;
use crate::model::ids::SectionId;

use super::section::{Section, SectionKind, SectionNetwork};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WagonKind {
    /// A lumped mass, delivered unchanged.
    Grams,
    /// A linear density, deposited per metre of section.
    GramsPerMeter,
    /// A material thickness, deposited per square millimetre of crossed surface.
    Millimeters,
}

impl WagonKind {
    pub fn unit(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::GramsPerMeter => "g/m",
            Self::Millimeters => "mm",
        }
    }

    pub fn from_unit(unit: &str) -> Option<Self> {
        match unit.trim() {
            "g" => Some(Self::Grams),
            "g/m" => Some(Self::GramsPerMeter),
            "mm" => Some(Self::Millimeters),
            _ => None,
        }
    }
}

impl fmt::Display for WagonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wagon {
    kind: WagonKind,
    material: SmolStr,
    value: f64,
}

impl Wagon {
    pub fn kind(&self) -> WagonKind {
        self.kind
    }

    pub fn material(&self) -> &SmolStr {
        &self.material
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// The station the train ended at.
    pub station: SectionId,
    /// Plain sections crossed before the station.
    pub hops: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownSection { section: SectionId },
    DeadEnd { section: SectionId },
    Cycle { start: SectionId, hops: usize },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection { section } => write!(f, "unknown section {section}"),
            Self::DeadEnd { section } => {
                write!(f, "section {section} has no successor and is not a station")
            }
            Self::Cycle { start, hops } => {
                write!(f, "chain from {start} did not reach a station after {hops} hops")
            }
        }
    }
}

impl std::error::Error for RouteError {}

/// Grams booked per section and per station.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialLedger {
    sections: BTreeMap<SectionId, BTreeMap<SmolStr, f64>>,
    stations: BTreeMap<SectionId, BTreeMap<SmolStr, f64>>,
}

impl MaterialLedger {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.stations.is_empty()
    }

    pub(crate) fn deposit(&mut self, section: SectionId, material: &SmolStr, grams: f64) {
        *self.sections.entry(section).or_default().entry(material.clone()).or_default() += grams;
    }

    pub(crate) fn credit(&mut self, station: SectionId, material: &SmolStr, grams: f64) {
        *self.stations.entry(station).or_default().entry(material.clone()).or_default() += grams;
    }

    /// Material lying along one section.
    pub fn section_grams(&self, section: SectionId) -> Option<&BTreeMap<SmolStr, f64>> {
        self.sections.get(&section)
    }

    pub fn section_total(&self, section: SectionId) -> f64 {
        self.sections.get(&section).map_or(0.0, |materials| materials.values().sum())
    }

    /// Converted material delivered to one station.
    pub fn station_totals(&self, station: SectionId) -> Option<&BTreeMap<SmolStr, f64>> {
        self.stations.get(&station)
    }

    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &BTreeMap<SmolStr, f64>)> + '_ {
        self.sections.iter().map(|(id, materials)| (*id, materials))
    }

    pub fn stations(&self) -> impl Iterator<Item = (SectionId, &BTreeMap<SmolStr, f64>)> + '_ {
        self.stations.iter().map(|(id, materials)| (*id, materials))
    }

    pub fn merge(&mut self, other: MaterialLedger) {
        for (section, materials) in other.sections {
            let entry = self.sections.entry(section).or_default();
            for (material, grams) in materials {
                *entry.entry(material).or_default() += grams;
            }
        }
        for (station, materials) in other.stations {
            let entry = self.stations.entry(station).or_default();
            for (material, grams) in materials {
                *entry.entry(material).or_default() += grams;
            }
        }
    }
}

/// Grams picked up so far, per material.
type Cargo = SmallVec<[(SmolStr, f64); 4]>;

fn load(cargo: &mut Cargo, material: &SmolStr, grams: f64) {
    match cargo.iter_mut().find(|(tag, _)| tag == material) {
        Some((_, carried)) => *carried += grams,
        None => cargo.push((material.clone(), grams)),
    }
}

enum Hop {
    Forward(SectionId),
    Delivered,
}

impl Section {
    /// Moves `wagons` across this section.
    ///
    /// A plain section deposits the length-scaled wagons and forwards; a station converts the
    /// cargo and ends the trip.
    fn route(
        &self,
        id: SectionId,
        wagons: &[Wagon],
        cargo: &mut Cargo,
        materials: &MaterialTable,
        ledger: &mut MaterialLedger,
    ) -> Result<Hop, RouteError> {
        match self.kind() {
            SectionKind::Passthrough => {
                for wagon in wagons {
                    let grams = match wagon.kind {
                        WagonKind::Grams => continue,
                        WagonKind::GramsPerMeter => wagon.value * self.length_mm() / 1000.0,
                        WagonKind::Millimeters => match materials.get(&wagon.material) {
                            Ok(properties) => {
                                wagon.value * self.surface_mm2() * properties.density() / 1000.0
                            }
                            Err(err) => {
                                warn!("section {id}: {err}; skipping {} mm", wagon.value);
                                continue;
                            }
                        },
                    };
                    ledger.deposit(id, &wagon.material, grams);
                    load(cargo, &wagon.material, grams);
                }
                self.next().map(Hop::Forward).ok_or(RouteError::DeadEnd { section: id })
            }
            SectionKind::Station(station) => {
                for (material, grams) in cargo.iter() {
                    station.convert(material, *grams, |output, grams| {
                        ledger.credit(id, output, grams)
                    });
                }
                Ok(Hop::Delivered)
            }
        }
    }
}

/// Declared service rates of one module for one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Train {
    wagons: SmallVec<[Wagon; 4]>,
}

impl Train {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wagon(&mut self, kind: WagonKind, material: impl Into<SmolStr>, value: f64) {
        self.wagons.push(Wagon { kind, material: material.into(), value });
    }

    pub fn wagons(&self) -> &[Wagon] {
        &self.wagons
    }

    pub fn is_empty(&self) -> bool {
        self.wagons.is_empty()
    }

    /// Walks the chain from `start` to its station, booking deposits and deliveries into
    /// `ledger`.
    pub fn release(
        &self,
        network: &SectionNetwork,
        start: SectionId,
        materials: &MaterialTable,
        ledger: &mut MaterialLedger,
    ) -> Result<Delivery, RouteError> {
        let mut cargo = Cargo::new();
        for wagon in self.wagons.iter().filter(|wagon| wagon.kind == WagonKind::Grams) {
            load(&mut cargo, &wagon.material, wagon.value);
        }

        let mut cursor = start;
        let mut hops = 0;
        loop {
            if hops > network.len() {
                return Err(RouteError::Cycle { start, hops });
            }
            let section =
                network.get(cursor).ok_or(RouteError::UnknownSection { section: cursor })?;
            match section.route(cursor, &self.wagons, &mut cargo, materials, ledger)? {
                Hop::Forward(next) => {
                    cursor = next;
                    hops += 1;
                }
                Hop::Delivered => return Ok(Delivery { station: cursor, hops }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use smol_str::SmolStr;

    use super::{MaterialLedger, RouteError, Train, WagonKind};
    use crate::grid::GridRect;
    use crate::material::{MaterialProperties, MaterialTable};
    use crate::materialway::section::{Direction, Section, SectionNetwork};
    use crate::materialway::station::{ConversionRule, Station};
    use crate::model::ids::SectionId;

    /// Two vertical legs of 1000 mm and 500 mm feeding a station.
    fn two_legs() -> (SectionNetwork, SectionId, SectionId) {
        let mut network = SectionNetwork::default();
        let first = network.push(Section::passthrough(
            Section::lane(0, 100_000, Direction::Vertical, 1_100_000),
            Direction::Vertical,
            None,
        ));
        let second = network.push(Section::passthrough(
            Section::lane(0, 1_100_000, Direction::Vertical, 1_600_000),
            Direction::Vertical,
            None,
        ));
        let station = network.push(Section::station(
            Section::lane(0, 1_600_000, Direction::Vertical, 1_610_000),
            Direction::Vertical,
            Station::new("PP1"),
        ));
        network.link(first, second);
        network.link(second, station);
        (network, first, station)
    }

    fn grams(ledger: &MaterialLedger, station: SectionId, material: &str) -> f64 {
        ledger
            .station_totals(station)
            .and_then(|totals| totals.get(material).copied())
            .unwrap_or(0.0)
    }

    #[test]
    fn linear_density_accumulates_over_the_full_length() {
        let (network, start, station) = two_legs();
        let mut train = Train::new();
        train.add_wagon(WagonKind::GramsPerMeter, "Cu", 2.0);

        let mut ledger = MaterialLedger::default();
        let delivery = train
            .release(&network, start, &MaterialTable::default(), &mut ledger)
            .expect("release");

        assert_eq!(delivery.station, station);
        assert_eq!(delivery.hops, 2);
        assert!((grams(&ledger, station, "Cu") - 3.0).abs() < 1e-9);
        assert!((ledger.section_total(start) - 2.0).abs() < 1e-9);
        assert_eq!(train.wagons()[0].value(), 2.0);
    }

    #[test]
    fn splitting_a_leg_does_not_change_the_delivery() {
        let (mut network, start, station) = two_legs();
        network.split(start, 600_000);

        let mut train = Train::new();
        train.add_wagon(WagonKind::GramsPerMeter, "Cu", 2.0);
        let mut ledger = MaterialLedger::default();
        let delivery = train
            .release(&network, start, &MaterialTable::default(), &mut ledger)
            .expect("release");

        assert_eq!(delivery.hops, 3);
        assert!((grams(&ledger, station, "Cu") - 3.0).abs() < 1e-9);
    }

    #[test]
    fn lumped_mass_reaches_the_station_unscaled() {
        let (network, start, station) = two_legs();
        let mut train = Train::new();
        train.add_wagon(WagonKind::Grams, "Al", 12.5);

        let mut ledger = MaterialLedger::default();
        train.release(&network, start, &MaterialTable::default(), &mut ledger).expect("release");
        assert_eq!(grams(&ledger, station, "Al"), 12.5);
        assert_eq!(ledger.section_grams(start), None);
    }

    #[test]
    fn thickness_uses_surface_and_density() {
        let mut network = SectionNetwork::default();
        let tube = network.push(Section::passthrough(
            GridRect::new(0, 99_000, 1_000_000, 101_000),
            Direction::Horizontal,
            None,
        ));
        let station = network.push(Section::station(
            Section::lane(1_000_000, 99_000, Direction::Horizontal, 1_010_000),
            Direction::Horizontal,
            Station::new("PP1"),
        ));
        network.link(tube, station);

        let mut materials = MaterialTable::default();
        materials.insert("C", MaterialProperties::new(2.0, 42.7, 85.8));

        let mut train = Train::new();
        train.add_wagon(WagonKind::Millimeters, "C", 0.1);
        train.add_wagon(WagonKind::Millimeters, "Unobtainium", 1.0);
        let mut ledger = MaterialLedger::default();
        train.release(&network, tube, &materials, &mut ledger).expect("release");

        let expected = 0.1 * (2.0 * PI * 100.0 * 1000.0) * 2.0 / 1000.0;
        assert!((grams(&ledger, station, "C") - expected).abs() < 1e-9);
        assert_eq!(grams(&ledger, station, "Unobtainium"), 0.0);
    }

    #[test]
    fn stations_apply_their_conversion_rules() {
        let (mut network, start, station) = two_legs();
        let mut rule_station = Station::new("PP1");
        rule_station.push_rule(ConversionRule::new("cable", "Cu", 0.5));
        if let Some(target) = network.get_mut(station).and_then(Section::as_station_mut) {
            *target = rule_station;
        }

        let mut train = Train::new();
        train.add_wagon(WagonKind::GramsPerMeter, "cable", 4.0);
        train.add_wagon(WagonKind::Grams, "glue", 1.0);
        let mut ledger = MaterialLedger::default();
        train.release(&network, start, &MaterialTable::default(), &mut ledger).expect("release");

        assert!((grams(&ledger, station, "Cu") - 3.0).abs() < 1e-9);
        assert_eq!(grams(&ledger, station, "cable"), 0.0);
        assert_eq!(grams(&ledger, station, "glue"), 1.0);
        let deposited =
            ledger.section_grams(start).and_then(|m| m.get(&SmolStr::new("cable")).copied());
        assert_eq!(deposited, Some(4.0));
    }

    #[test]
    fn a_chain_without_station_is_a_dead_end() {
        let mut network = SectionNetwork::default();
        let lone = network.push(Section::passthrough(
            Section::lane(0, 0, Direction::Vertical, 10_000),
            Direction::Vertical,
            None,
        ));
        let mut train = Train::new();
        train.add_wagon(WagonKind::GramsPerMeter, "Cu", 1.0);
        let err = train
            .release(&network, lone, &MaterialTable::default(), &mut MaterialLedger::default())
            .unwrap_err();
        assert_eq!(err, RouteError::DeadEnd { section: lone });

        let err = train
            .release(
                &network,
                SectionId::from_index(7),
                &MaterialTable::default(),
                &mut MaterialLedger::default(),
            )
            .unwrap_err();
        assert_eq!(err, RouteError::UnknownSection { section: SectionId::from_index(7) });
    }

    #[test]
    fn merged_ledgers_add_up() {
        let mut a = MaterialLedger::default();
        a.deposit(SectionId::from_index(1), &SmolStr::new("Cu"), 1.0);
        a.credit(SectionId::from_index(2), &SmolStr::new("Cu"), 1.0);
        let mut b = MaterialLedger::default();
        b.deposit(SectionId::from_index(1), &SmolStr::new("Cu"), 2.5);
        b.credit(SectionId::from_index(2), &SmolStr::new("Al"), 4.0);

        a.merge(b);
        assert_eq!(a.section_total(SectionId::from_index(1)), 3.5);
        assert_eq!(a.station_totals(SectionId::from_index(2)).map(|m| m.len()), Some(2));
    }
}
