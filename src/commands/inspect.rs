use std::collections::BTreeMap;

use anyhow::Result;

use crate::cli::{Cli, InspectArgs};
use crate::zone::ZoneLayer;

/// Print diagnostics for each zone bundle: size, CRS, grid-code attribute
/// and the distribution of grid codes.
pub fn run(cli: &Cli, args: &InspectArgs) -> Result<()> {
    for path in &args.zones {
        match ZoneLayer::from_path(path, cli.verbose) {
            Ok(layer) => print_layer(&layer),
            Err(err) => eprintln!("warning: failed to process {}: {:#}", path.display(), err),
        }
    }
    Ok(())
}

fn print_layer(layer: &ZoneLayer) {
    println!("Layer: {}", layer.name());
    println!("  Zones: {}", layer.len());
    println!("  CRS: {}", layer.crs().describe());
    println!("  Grid-code field: {}", layer.grid_field().unwrap_or("(none)"));

    let mut counts: BTreeMap<Option<i64>, usize> = BTreeMap::new();
    for code in layer.grid_codes() {
        *counts.entry(code).or_default() += 1;
    }
    println!("  Grid-code mix:");
    for (code, count) in counts {
        match code {
            Some(code) => println!("    - {}: {}", code, count),
            None => println!("    - (none): {}", count),
        }
    }

    if let Some(bounds) = layer.bounds() {
        println!(
            "  Bounds: ({}, {}) - ({}, {})",
            bounds.min().x, bounds.min().y, bounds.max().x, bounds.max().y
        );
    }
}
