// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use loadshift_model::prelude::{
    CapPolicy, CatalogLoader, HourlyPriceTable, PricingMode, Schedule, TaskCatalog,
};
use loadshift_solver::prelude::{
    EnergyPlanner, HighsSolver, HighsSolverConfig, LinearPricing, QuadraticPricing, Scenario,
};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Linear,
    Quadratic,
    Both,
}

/// Plans deferrable household loads over one day at minimum energy cost.
#[derive(Debug, Parser)]
#[command(name = "loadshift", version)]
struct Args {
    /// Task catalog; defaults to `instances/five_users.txt`.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// 24 hourly unit prices for linear mode; defaults to `instances/hourly_prices.txt`.
    #[arg(long)]
    prices: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeArg::Both)]
    mode: ModeArg,

    /// Restricted hours, comma separated. Applies to every mode when given.
    #[arg(long, value_delimiter = ',')]
    cap_hours: Option<Vec<u32>>,

    /// Per-user ceiling during restricted hours. Applies to every mode when given.
    #[arg(long)]
    cap_ceiling: Option<f64>,

    /// Disable hourly caps everywhere.
    #[arg(long, conflicts_with_all = ["cap_hours", "cap_ceiling"])]
    no_caps: bool,

    #[arg(long)]
    time_limit_secs: Option<f64>,

    /// Where to write the JSON run records.
    #[arg(long, default_value = "loadshift_results.json")]
    output: PathBuf,
}

impl Args {
    /// Linear runs use the default caps and quadratic runs none, unless the
    /// caps were given explicitly.
    fn caps_for(&self, mode: PricingMode) -> Result<CapPolicy> {
        if self.no_caps {
            return Ok(CapPolicy::none());
        }
        if self.cap_hours.is_none() && self.cap_ceiling.is_none() {
            return Ok(match mode {
                PricingMode::Linear => CapPolicy::default(),
                PricingMode::Quadratic => CapPolicy::none(),
            });
        }
        let hours = self
            .cap_hours
            .clone()
            .unwrap_or_else(|| CapPolicy::DEFAULT_RESTRICTED_HOURS.to_vec());
        let ceiling = self.cap_ceiling.unwrap_or(CapPolicy::DEFAULT_CEILING);
        Ok(CapPolicy::new(hours, ceiling)?)
    }

    fn time_limit(&self) -> Result<Option<Duration>> {
        match self.time_limit_secs {
            None => Ok(None),
            Some(s) if s.is_finite() && s > 0.0 => Ok(Some(Duration::from_secs_f64(s))),
            Some(s) => bail!("time limit must be a positive number of seconds, got {s}"),
        }
    }
}

fn find_instances_dir() -> Option<PathBuf> {
    let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
    while let Some(p) = cur {
        let cand = p.join("instances");
        if cand.is_dir() {
            return Some(cand);
        }
        cur = p.parent();
    }
    None
}

fn instance_file(given: Option<&PathBuf>, default_name: &str) -> Result<PathBuf> {
    if let Some(p) = given {
        return Ok(p.clone());
    }
    let dir = find_instances_dir()
        .context("no --catalog/--prices given and no `instances/` directory found")?;
    Ok(dir.join(default_name))
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Serialize)]
struct RunRecord {
    scenario: String,
    mode: PricingMode,
    catalog: String,
    caps: String,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    total_cost: Option<f64>,
    error: Option<String>,
    schedule: Option<Schedule>,
}

fn scenarios(args: &Args) -> Result<Vec<Scenario>> {
    let mut out = Vec::new();
    if matches!(args.mode, ModeArg::Linear | ModeArg::Both) {
        let path = instance_file(args.prices.as_ref(), "hourly_prices.txt")?;
        let table = HourlyPriceTable::from_path(&path)
            .with_context(|| format!("loading prices from {}", path.display()))?;
        out.push(Scenario::new(
            "linear",
            LinearPricing::new(table),
            args.caps_for(PricingMode::Linear)?,
        ));
    }
    if matches!(args.mode, ModeArg::Quadratic | ModeArg::Both) {
        out.push(Scenario::new(
            "quadratic",
            QuadraticPricing::new(),
            args.caps_for(PricingMode::Quadratic)?,
        ));
    }
    Ok(out)
}

fn print_schedule(name: &str, catalog: &TaskCatalog, schedule: &Schedule) {
    let (peak_hour, peak_load) = schedule.peak();
    println!();
    println!(
        "== {} ({} users, {} tasks, {:.3} units) ==",
        name,
        catalog.user_count(),
        catalog.task_count(),
        catalog.total_demand()
    );
    print!("{}", schedule.usage_table());
    println!(
        "total cost {:.6}, peak {:.3} at {}",
        schedule.total_cost(),
        peak_load,
        peak_hour
    );
}

fn write_records(path: &Path, records: &[RunRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("serializing run records")?;
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {} run record(s) to {}", records.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    enable_tracing();
    let args = Args::parse();

    let catalog_path = instance_file(args.catalog.as_ref(), "five_users.txt")?;
    let catalog = CatalogLoader::new()
        .reject_infeasible(true)
        .from_path(&catalog_path)
        .with_context(|| format!("loading catalog from {}", catalog_path.display()))?;

    let planner = EnergyPlanner::new(HighsSolver::new(HighsSolverConfig {
        time_limit: args.time_limit()?,
        ..HighsSolverConfig::default()
    }));

    let mut records = Vec::new();
    let mut failures = 0usize;
    for scenario in scenarios(&args)? {
        tracing::info!(
            "Planning {} with {} users and {} tasks ({})",
            scenario.name(),
            catalog.user_count(),
            catalog.task_count(),
            scenario.caps()
        );

        let start_ts = Utc::now();
        let t0 = Instant::now();
        let result = planner.plan(&catalog, scenario.pricing(), scenario.caps());
        let runtime = t0.elapsed();
        let end_ts = Utc::now();

        let (total_cost, error, schedule) = match result {
            Ok(schedule) => {
                print_schedule(scenario.name(), &catalog, &schedule);
                (Some(schedule.total_cost()), None, Some(schedule))
            }
            Err(e) => {
                tracing::error!("{} failed after {:?}: {}", scenario.name(), runtime, e);
                failures += 1;
                (None, Some(e.to_string()), None)
            }
        };

        records.push(RunRecord {
            scenario: scenario.name().to_owned(),
            mode: scenario.mode(),
            catalog: catalog_path.display().to_string(),
            caps: scenario.caps().to_string(),
            start_ts,
            end_ts,
            runtime_ms: runtime.as_millis(),
            total_cost,
            error,
            schedule,
        });
    }

    write_records(&args.output, &records)?;

    if failures > 0 {
        bail!("{failures} scenario(s) failed");
    }
    Ok(())
}
