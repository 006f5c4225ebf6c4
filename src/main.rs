//! machplan - CLI for feature-based machining process planning.
//!
//! Reads a machining feature set from JSON, runs the full planning
//! pipeline against the standard catalogs and writes the plan report
//! as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use machplan_catalog::{MachineCatalog, MachineClass, MaterialCatalog, ToolCatalog};
use machplan_core::{Feature, PartGeometry};
use machplan_planner::{PlanRequest, ProcessPlanner};

/// Plan machining operations and costs for a set of part features.
#[derive(Parser, Debug)]
#[command(name = "machplan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input feature set (JSON array of features)
    #[arg(short, long)]
    input: PathBuf,

    /// Optional part geometry file (JSON)
    #[arg(short, long)]
    geometry: Option<PathBuf>,

    /// Output report path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Workpiece material id (e.g. aluminum_6061, steel_1018)
    #[arg(long, default_value = "aluminum_6061")]
    material: String,

    /// Machine: manual, 3axis, 4axis or 5axis
    #[arg(long, default_value = "3axis")]
    machine: String,

    /// Batch quantity
    #[arg(short, long, default_value = "1")]
    quantity: u32,

    /// Extra batch sizes to compare, comma separated
    #[arg(long, value_delimiter = ',')]
    batch: Vec<u32>,

    /// Annual volume, enables the ROI section
    #[arg(long)]
    parts_per_year: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_machine(name: &str) -> Result<MachineClass> {
    match name {
        "manual" => Ok(MachineClass::ThreeAxisManual),
        "3axis" => Ok(MachineClass::ThreeAxisCnc),
        "4axis" => Ok(MachineClass::FourAxisCnc),
        "5axis" => Ok(MachineClass::FiveAxisCnc),
        other => anyhow::bail!("unknown machine '{other}' (expected manual, 3axis, 4axis or 5axis)"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let machine = parse_machine(&args.machine)?;

    info!("Reading features: {}", args.input.display());
    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let features: Vec<Feature> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    info!("Loaded {} feature(s)", features.len());

    let part: Option<PartGeometry> = match &args.geometry {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(
                serde_json::from_str(&data)
                    .with_context(|| format!("Failed to parse {}", path.display()))?,
            )
        }
        None => None,
    };

    let materials = MaterialCatalog::standard();
    let tools = ToolCatalog::standard();
    let machines = MachineCatalog::standard();
    let planner = ProcessPlanner::new(&materials, &tools, &machines);

    let request = PlanRequest {
        features,
        part,
        material: args.material.as_str().into(),
        machine,
        quantity: args.quantity,
        batch_quantities: args.batch,
        parts_per_year: args.parts_per_year,
    };

    let report = planner.plan(&request)?;

    for warning in &report.warnings {
        warn!("{}", warning);
    }
    info!(
        "{} operations over {} setup(s), {:.2} machining h/part, ${:.2}/part",
        report.summary.total_operations,
        report.summary.total_setups,
        report.summary.machining_hours_per_part,
        report.cost.cost_per_unit
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_machine_names() {
        assert_eq!(parse_machine("3axis").unwrap(), MachineClass::ThreeAxisCnc);
        assert_eq!(parse_machine("manual").unwrap(), MachineClass::ThreeAxisManual);
        assert!(parse_machine("6axis").is_err());
    }

    #[test]
    fn test_help_material_examples_are_stocked() {
        let catalog = MaterialCatalog::standard();
        assert!(catalog.get(&"aluminum_6061".into()).is_ok());
        assert!(catalog.get(&"steel_1018".into()).is_ok());
    }

    #[test]
    fn test_feature_file_round_trip() {
        use machplan_core::{FeatureId, FeatureType};

        let features = vec![Feature::new(FeatureId(0), FeatureType::ThroughHole)
            .with_diameter(6.0)
            .with_depth(12.0)];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&features).unwrap()).unwrap();

        let data = std::fs::read_to_string(file.path()).unwrap();
        let back: Vec<Feature> = serde_json::from_str(&data).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].diameter, Some(6.0));
    }
}
