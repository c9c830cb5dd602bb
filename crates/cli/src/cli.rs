use clap::{Args, Parser, Subcommand};

/// Drive the tasklist containers from the command line.
///
/// Each subcommand fills a container with generated items, drains it, and
/// prints the removal order.
#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Task containers: LIFO, FIFO and priority scheduler")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push items onto a stack and pop them all
    Lifo(LifoArgs),
    /// Enqueue items with random priorities and dequeue them in arrival order
    Fifo(WorkloadArgs),
    /// Run a steady-state workload through the priority scheduler
    Schedule(ScheduleArgs),
    /// Print the resolved configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct LifoArgs {
    /// Number of items to push
    #[arg(long, default_value_t = 10)]
    pub count: u32,
}

#[derive(Args, Debug, Clone)]
pub struct WorkloadArgs {
    /// Number of items to generate
    #[arg(long, default_value_t = 10)]
    pub count: u32,

    /// Seed for generated priorities and scheduler draws
    #[arg(long, env = "SCHED_SEED")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub workload: WorkloadArgs,

    /// Percent of dequeues using the priority-max scan (overrides config)
    #[arg(long)]
    pub max_priority_weight: Option<u32>,

    /// Arrivals and departures after the initial fill
    #[arg(long, default_value_t = 100)]
    pub steps: u32,
}
