mod cli;
mod workload;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tasklist_core::config::{self, Config};
use tasklist_queue::SeededRandom;

use crate::cli::{CliArgs, Command};
use crate::workload::{DrainReport, Removed, ScheduleReport};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let args = CliArgs::parse();
    let mut config = Config::from_env();

    match args.command {
        Command::Config => {
            config.validate().context("invalid configuration")?;
            config.log_summary();
            println!("{}", serde_json::to_string_pretty(&config.summary())?);
        }
        Command::Lifo(opts) => {
            let report = workload::run_lifo(opts.count)?;
            print_drain(&report, args.json)?;
        }
        Command::Fifo(opts) => {
            let mut rng = SeededRandom::from_optional_seed(opts.seed);
            let report = workload::run_fifo(opts.count, &mut rng)?;
            print_drain(&report, args.json)?;
        }
        Command::Schedule(schedule) => {
            if let Some(weight) = schedule.max_priority_weight {
                config.scheduler.priority_max_weight = weight;
            }
            if schedule.workload.seed.is_some() {
                config.scheduler.seed = schedule.workload.seed;
            }
            config.validate().context("invalid scheduler configuration")?;
            config.log_summary();

            let mut rng = SeededRandom::from_optional_seed(config.scheduler.seed);
            let report = workload::run_schedule(
                &config.scheduler,
                schedule.workload.count,
                schedule.steps,
                &mut rng,
            )?;
            info!(
                served = report.stats.dequeued,
                bucket_misses = report.stats.bucket_misses,
                "schedule finished"
            );
            print_schedule(&report, args.json)?;
        }
    }
    Ok(())
}

fn format_order(order: &[Removed]) -> String {
    order
        .iter()
        .map(|r| format!("{}(p{})", r.id, r.priority))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_drain(report: &DrainReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{} removal order:", report.container);
        println!("  {}", format_order(&report.order));
    }
    Ok(())
}

fn print_schedule(report: &ScheduleReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let stats = &report.stats;
    println!("scheduler removal order:");
    println!("  {}", format_order(&report.order));
    println!(
        "selections: priority-max={} bucket-hit={} bucket-miss={}",
        stats.priority_max_selections, stats.bucket_hits, stats.bucket_misses
    );
    println!("{:>8} {:>8} {:>10} {:>8}", "priority", "served", "mean wait", "max wait");
    for (priority, wait) in &report.waits {
        println!(
            "{:>8} {:>8} {:>10.1} {:>8}",
            priority,
            wait.served,
            wait.mean_wait(),
            wait.max_wait
        );
    }
    Ok(())
}
