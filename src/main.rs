// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Materialway and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Materialway CLI entrypoint.
//!
//! Loads a tracker geometry, routes its services and prints the JSON report of one accumulation
//! pass on stdout. Logging goes to stderr and follows `RUST_LOG`.

use std::error::Error;
use std::path::Path;

use materialway::analysis::accumulate;
use materialway::inactive::InactiveInventory;
use materialway::material::MaterialTable;
use materialway::materialway::Materialway;
use materialway::report::MaterialwayReport;
use materialway::store::{self, ServiceInputs, TrackerJson};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <tracker.json> [--services <services.json>] \
         [--materials <materials.json>] [--inactive]\n  {program} --schema\n\n\
         Routes the tracker's services and prints the JSON report on stdout.\n\
         --inactive adds the inactive-element summary.\n\
         --schema prints the JSON schema of the tracker input and exits.\n\n\
         Set RUST_LOG=debug to trace every routed leg."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    schema: bool,
    tracker: Option<String>,
    services: Option<String>,
    materials: Option<String>,
    inactive: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            "--services" => {
                if options.services.is_some() {
                    return Err(());
                }
                options.services = Some(args.next().ok_or(())?);
            }
            "--materials" => {
                if options.materials.is_some() {
                    return Err(());
                }
                options.materials = Some(args.next().ok_or(())?);
            }
            "--inactive" => {
                if options.inactive {
                    return Err(());
                }
                options.inactive = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.tracker.is_some() {
                    return Err(());
                }
                options.tracker = Some(arg);
            }
        }
    }

    if options.schema != options.tracker.is_none() {
        return Err(());
    }
    if options.schema
        && (options.services.is_some() || options.materials.is_some() || options.inactive)
    {
        return Err(());
    }

    Ok(options)
}

fn main() {
    env_logger::init();

    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "materialway".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.schema {
            let schema = schemars::schema_for!(TrackerJson);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        let Some(tracker_path) = options.tracker else {
            print_usage(&program);
            std::process::exit(2);
        };
        let tracker = store::load_tracker(Path::new(&tracker_path))?;
        let services = match options.services {
            Some(path) => store::load_services(Path::new(&path))?,
            None => ServiceInputs::default(),
        };
        let materials = match options.materials {
            Some(path) => store::load_material_table(Path::new(&path))?,
            None => MaterialTable::new(),
        };

        let mut materialway = Materialway::build(&tracker)?;
        services.apply_conversions(&mut materialway)?;
        let ledger = accumulate(&materialway, &services.catalog, &materials)?;

        let mut report = MaterialwayReport::new(&materialway, &ledger);
        if options.inactive {
            let inventory = InactiveInventory::from_ledger(&materialway, &ledger, &materials);
            report = report.with_inactive(&inventory);
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_tracker_path() {
        let options = parse(&["tracker.json"]).expect("parse options");
        assert_eq!(options.tracker.as_deref(), Some("tracker.json"));
        assert!(!options.schema);
        assert!(!options.inactive);
    }

    #[test]
    fn parses_all_inputs() {
        let options = parse(&[
            "--services",
            "services.json",
            "tracker.json",
            "--materials",
            "materials.json",
            "--inactive",
        ])
        .expect("parse options");
        assert_eq!(options.services.as_deref(), Some("services.json"));
        assert_eq!(options.materials.as_deref(), Some("materials.json"));
        assert!(options.inactive);
    }

    #[test]
    fn parses_schema_flag() {
        let options = parse(&["--schema"]).expect("parse options");
        assert!(options.schema);
        assert!(options.tracker.is_none());
    }

    #[test]
    fn rejects_missing_tracker() {
        assert_eq!(parse(&[]), Err(()));
        assert_eq!(parse(&["--services", "services.json"]), Err(()));
    }

    #[test]
    fn rejects_schema_with_inputs() {
        assert_eq!(parse(&["--schema", "tracker.json"]), Err(()));
        assert_eq!(parse(&["--schema", "--inactive"]), Err(()));
    }

    #[test]
    fn rejects_duplicates_and_unknown_flags() {
        assert_eq!(parse(&["a.json", "b.json"]), Err(()));
        assert_eq!(parse(&["a.json", "--inactive", "--inactive"]), Err(()));
        assert_eq!(parse(&["a.json", "--services"]), Err(()));
        assert_eq!(parse(&["a.json", "--verbose"]), Err(()));
    }
}
