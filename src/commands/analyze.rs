use std::path::Path;

use anyhow::{Result, bail, ensure};
use polars::frame::DataFrame;

use crate::analysis::enrich;
use crate::cli::{AnalyzeArgs, Cli};
use crate::common::ensure_dir_exists;
use crate::io::{csv, xlsx};
use crate::portfolio::{self, columns};
use crate::rate::RateTable;
use crate::summary;
use crate::zone::ZoneLayer;

/// Run the full pipeline: load, filter, join, rate, aggregate, export.
pub fn run(cli: &Cli, args: &AnalyzeArgs) -> Result<()> {
    let verbose = cli.verbose;
    ensure_dir_exists(&args.out)?;

    let enriched_path = args.out.join("enriched.csv");
    if enriched_path.exists() && !args.force {
        bail!("{} already exists (pass --force to overwrite)", enriched_path.display());
    }

    if verbose > 0 { eprintln!("[analyze] loading portfolio {}", args.portfolio.display()); }
    let mut df = portfolio::load_portfolio(&args.portfolio)?;
    if verbose > 0 { eprintln!("[analyze] portfolio has {} rows", df.height()); }

    df = portfolio::normalize_expiry(df, verbose)?;
    if let Some(cutoff) = args.inforce_after {
        df = portfolio::filter_inforce(df, cutoff, verbose)?;
    }

    let rates = match &args.rates {
        Some(path) => {
            if verbose > 0 { eprintln!("[analyze] loading rate table {}", path.display()); }
            RateTable::from_json_file(path)?
        }
        None => RateTable::default(),
    };

    let mut layers = Vec::with_capacity(args.zones.len());
    for path in &args.zones {
        if verbose > 0 { eprintln!("[analyze] loading zone layer {}", path.display()); }
        match ZoneLayer::from_path(path, verbose) {
            Ok(layer) => layers.push(layer),
            Err(err) => eprintln!("warning: skipping zone layer {}: {:#}", path.display(), err),
        }
    }
    ensure!(!layers.is_empty(), "no zone layer could be processed");

    let analysis = enrich(df, &layers, &rates, verbose)?;

    if analysis.invalid_coordinates.height() > 0 {
        let invalid_path = args.out.join("invalid_coordinates.csv");
        csv::write_csv(&mut analysis.invalid_coordinates.clone(), &invalid_path)?;
        if verbose > 0 { eprintln!("[analyze] wrote invalid rows to {}", invalid_path.display()); }
    }

    csv::write_csv(&mut analysis.frame.clone(), &enriched_path)?;
    if args.xlsx {
        xlsx::write_xlsx(&analysis.frame, "Enriched", &args.out.join("enriched.xlsx"))?;
    }

    write_summaries(&analysis.frame, &args.out, verbose)?;

    println!("Enriched {} policies into {}", analysis.frame.height(), args.out.display());
    Ok(())
}

/// Compute, print and export the summary tables the enriched frame supports.
fn write_summaries(frame: &DataFrame, out_dir: &Path, verbose: u8) -> Result<()> {
    let has_uy = frame.column(columns::UY).is_ok();
    if !has_uy {
        eprintln!("warning: {} column not found; skipping underwriting-year summaries", columns::UY);
    }

    if verbose > 0 { eprintln!("[analyze] aggregating summaries"); }

    emit("Risk category distribution", summary::risk_distribution(frame)?,
        &out_dir.join("summary_risk_distribution.csv"))?;
    emit("Totals by risk category", summary::by_risk_category(frame)?,
        &out_dir.join("summary_risk.csv"))?;
    emit("Totals by occupancy category", summary::by_occupancy(frame)?,
        &out_dir.join("summary_occupancy.csv"))?;

    if has_uy {
        emit("Totals by underwriting year", summary::by_underwriting_year(frame)?,
            &out_dir.join("summary_uy.csv"))?;
        emit("Underwriting year x risk category", summary::uy_by_risk(frame)?,
            &out_dir.join("summary_uy_by_risk.csv"))?;

        let pivots = summary::uy_by_occupancy_and_risk(frame)?;
        emit("Policy count by segment", pivots.policy_count,
            &out_dir.join("pivot_policy_count.csv"))?;
        emit("Total TSI by segment", pivots.total_tsi,
            &out_dir.join("pivot_total_tsi.csv"))?;
        emit("Total PML by segment", pivots.total_pml,
            &out_dir.join("pivot_total_pml.csv"))?;
    }

    Ok(())
}

/// Print a summary table and write it next to the enriched export.
fn emit(title: &str, mut table: DataFrame, path: &Path) -> Result<()> {
    println!("{title}");
    println!("{table}");
    csv::write_csv(&mut table, path)
}
