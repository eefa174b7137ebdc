use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rm_preemption::analysis::{analyze, Outcome};
use rm_preemption::config::{Granularity, SimulationConfig};
use rm_preemption::parse::{read_task_set, ParseOptions};
use rm_preemption::report::{render, render_time_chart};
use rm_preemption::time::Duration;

/// Simulate rate-monotonic scheduling of the periodic tasks in FILE and
/// report how often each task is preempted within one hyperperiod.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Task file with one `execution,period,deadline` triple per line
    file: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Number of fractional digits in task parameters; also sets the tick length
    #[arg(short, long, default_value_t = 3)]
    precision: u32,

    /// Also print which task ran when
    #[arg(long)]
    time_chart: bool,

    /// Refuse to simulate hyperperiods longer than this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

/// What to print on stdout, or on failure the stderr message together
/// with the stdout verdict.
fn execute(args: &Args) -> Result<String, (String, String)> {
    let rejected = |msg: String| (msg, render(&Outcome::not_schedulable()));

    let options = ParseOptions {
        delimiter: args.delimiter,
        precision: args.precision,
    };
    let tasks = read_task_set(&args.file, &options)
        .map_err(|e| rejected(format!("{}: {}", args.file.display(), e)))?;

    let granularity = Granularity::decimal(args.precision)
        .ok_or_else(|| rejected(format!("unsupported precision: {}", args.precision)))?;
    let mut config = SimulationConfig::default()
        .with_granularity(granularity)
        .with_time_chart(args.time_chart);
    if let Some(limit) = args.max_ticks {
        config = config.with_max_horizon(Duration::from_ticks(limit));
    }

    let analysis = analyze(&tasks, &config)
        .map_err(|e| rejected(format!("{}: {}", args.file.display(), e)))?;
    let mut out = render(&analysis.outcome());
    if let Some(chart) = analysis.simulation().and_then(|s| s.time_chart.as_ref()) {
        out.push('\n');
        out.push_str(&render_time_chart(chart));
    }
    Ok(out)
}

fn main() -> ExitCode {
    match execute(&Args::parse()) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err((msg, out)) => {
            eprintln!("{}", msg);
            println!("{}", out);
            ExitCode::FAILURE
        }
    }
}
