//! Tabatu CLI
//!
//! Inspect a decrement table given as comma-separated rates
//!
//! ```text
//! tabatu survival --qx 0.1,0.2,0.4,0.8,1.0 --age 1
//! tabatu convert --qx 0.1,0.2 --from annual --to monthly
//! tabatu load --qx 0.1,0.5,1.0 --percent 150 --json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use serde::Serialize;

use tabatu::{DecrementTable, Periodicity, SingleDecrementTable};

#[derive(Parser, Debug)]
#[command(name = "tabatu", version, about = "Actuarial decrement tables")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Print JSON instead of a text table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Survival report for one life from age `age`
    Survival {
        /// Rates, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        qx: Vec<f64>,

        #[arg(long, default_value_t = Periodicity::Annual)]
        periodicity: Periodicity,

        /// Initial age, in periods
        #[arg(long, default_value_t = 0)]
        age: u32,

        /// Number of periods to report; defaults to the maximum future lifetime
        #[arg(long)]
        horizon: Option<u32>,
    },
    /// Convert rates to another periodicity
    Convert {
        #[arg(long, value_delimiter = ',', required = true)]
        qx: Vec<f64>,

        #[arg(long, default_value_t = Periodicity::Annual)]
        from: Periodicity,

        #[arg(long)]
        to: Periodicity,
    },
    /// Scale every rate below 1 by a percentage
    Load {
        #[arg(long, value_delimiter = ',', required = true)]
        qx: Vec<f64>,

        #[arg(long, default_value_t = Periodicity::Annual)]
        periodicity: Periodicity,

        /// 100 leaves the rates unchanged
        #[arg(long)]
        percent: f64,
    },
}

/// One row of the survival report
#[derive(Debug, Serialize)]
struct SurvivalRow {
    t: u32,
    qx: f64,
    tpx: f64,
    t_qx: f64,
}

#[derive(Debug, Serialize)]
struct SurvivalReport {
    periodicity: Periodicity,
    age: u32,
    /// None when the table has plateau closure
    max_future_lifetime: Option<f64>,
    plateau_closure: bool,
    rows: Vec<SurvivalRow>,
}

#[derive(Debug, Serialize)]
struct RatesReport {
    periodicity: Periodicity,
    qx: Vec<f64>,
}

/// Horizon used when a plateau table is reported without `--horizon`
const DEFAULT_PLATEAU_HORIZON: u32 = 120;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Survival {
            qx,
            periodicity,
            age,
            horizon,
        } => {
            let table = build_table(qx, periodicity)?;
            let report = survival_report(&table, age, horizon)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_survival(&report);
            }
        }
        Command::Convert { qx, from, to } => {
            let table = build_table(qx, from)?;
            let converted = table
                .change_periodicity(to)
                .inspect_err(|e| warn!("conversion rejected: {e}"))
                .with_context(|| format!("converting rates from {from} to {to}"))?;
            print_rates(&converted, args.json)?;
        }
        Command::Load {
            qx,
            periodicity,
            percent,
        } => {
            let table = build_table(qx, periodicity)?;
            let loaded = table
                .load(percent)
                .inspect_err(|e| warn!("load rejected: {e}"))
                .with_context(|| format!("loading rates by {percent}%"))?;
            print_rates(&loaded, args.json)?;
        }
    }

    Ok(())
}

fn build_table(qx: Vec<f64>, periodicity: Periodicity) -> Result<SingleDecrementTable> {
    SingleDecrementTable::new(qx, periodicity)
        .inspect_err(|e| warn!("table rejected: {e}"))
        .context("building the decrement table")
}

fn survival_report(
    table: &SingleDecrementTable,
    age: u32,
    horizon: Option<u32>,
) -> Result<SurvivalReport> {
    let lifetime = table.max_future_lifetime(age);
    let horizon = match horizon {
        Some(horizon) => horizon,
        None if lifetime.is_finite() => lifetime as u32,
        None => DEFAULT_PLATEAU_HORIZON,
    };
    let t: Vec<u32> = (0..=horizon).collect();
    let ages = [age];

    let qx = DecrementTable::qx(table, &ages, &t)?;
    let tpx = DecrementTable::tpx(table, &ages, &t)?;
    let t_qx = DecrementTable::t_qx(table, &ages, &t)?;

    let rows = t
        .iter()
        .enumerate()
        .map(|(i, &t)| SurvivalRow {
            t,
            qx: qx[i],
            tpx: tpx[i],
            t_qx: t_qx[i],
        })
        .collect();

    Ok(SurvivalReport {
        periodicity: table.periodicity(),
        age,
        max_future_lifetime: lifetime.is_finite().then_some(lifetime),
        plateau_closure: table.has_plateau_closure(),
        rows,
    })
}

fn print_survival(report: &SurvivalReport) {
    println!("Survival from age {} ({})", report.age, report.periodicity);
    match report.max_future_lifetime {
        Some(lifetime) => println!("  Max future lifetime: {lifetime}"),
        None => println!("  Max future lifetime: unbounded (plateau closure)"),
    }
    println!();
    println!("{:>5} {:>12} {:>12} {:>12}", "t", "qx", "tpx", "t|qx");
    println!("{}", "-".repeat(44));
    for row in &report.rows {
        println!("{:>5} {:>12.8} {:>12.8} {:>12.8}", row.t, row.qx, row.tpx, row.t_qx);
    }
}

fn print_rates(table: &SingleDecrementTable, json: bool) -> Result<()> {
    let report = RatesReport {
        periodicity: table.periodicity(),
        qx: table.rates().to_vec(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} rates ({})", report.qx.len(), report.periodicity);
        for (i, q) in report.qx.iter().enumerate() {
            println!("{i:>5} {q:>12.8}");
        }
    }
    Ok(())
}
