//! Command-line driver for `u-flowsched`.
//!
//! Subcommands:
//! - `run`: schedule one dataset with one configuration
//! - `sweep`: schedule one dataset with every candidate ranking, keep the best
//! - `batch`: sweep every numbered dataset under a root
//! - `generate`: write synthetic datasets

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

use u_flowsched::dispatching::RankingWeights;
use u_flowsched::io::{Dataset, PORT_FILE};
use u_flowsched::models::{Flow, Port};
use u_flowsched::scheduler::{
    BufferBound, FlowScheduler, ParameterSweep, PortSelection, ScheduleKpi, ScheduleOutcome,
    SchedulerConfig,
};
use u_flowsched::validation::validate_input;
use u_flowsched::workload::WorkloadGenerator;
use u_flowsched::{Error, Result};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "u-flowsched")]
#[command(version)]
#[command(about = "Greedy flow-to-port scheduler", long_about = None)]
struct Cli {
    /// JSON scheduler configuration (flags below override it)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule one dataset
    Run {
        /// Dataset directory holding flow.txt and port.txt
        dataset: PathBuf,

        /// Ranking weights α,β,γ,δ[,ε]
        #[arg(long, value_name = "WEIGHTS", value_delimiter = ',', allow_hyphen_values = true)]
        ranking: Option<Vec<f64>>,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Do not write result.txt
        #[arg(long)]
        dry_run: bool,
    },
    /// Try every candidate ranking on one dataset
    Sweep {
        /// Dataset directory holding flow.txt and port.txt
        dataset: PathBuf,

        #[command(flatten)]
        candidates: CandidateArgs,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Do not write result.txt
        #[arg(long)]
        dry_run: bool,
    },
    /// Sweep every numbered dataset under a root directory
    Batch {
        /// Root holding 0/, 1/, ...
        root: PathBuf,

        #[command(flatten)]
        candidates: CandidateArgs,

        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Write synthetic datasets
    Generate {
        /// Root to create 0/, 1/, ... in
        root: PathBuf,

        /// Number of datasets
        #[arg(long, default_value = "10")]
        count: u32,

        /// Random seed
        #[arg(long, default_value = "1")]
        seed: u64,
    },
}

#[derive(Args, Debug, Clone)]
struct CandidateArgs {
    /// Add this many random weight sets to the built-in grid
    #[arg(long, value_name = "N", default_value = "0")]
    random: usize,

    /// Seed for the random weight sets
    #[arg(long, default_value = "1")]
    seed: u64,
}

#[derive(Args, Debug, Clone)]
struct PolicyArgs {
    /// Port selection strategy
    #[arg(long, value_enum)]
    port_selection: Option<SelectionArg>,

    /// Dispatch buffer bound per port
    #[arg(long, value_name = "K", conflicts_with = "buffer_size")]
    buffer_per_port: Option<usize>,

    /// Fixed dispatch buffer bound
    #[arg(long, value_name = "N")]
    buffer_size: Option<usize>,

    /// Per-port wait queue bound
    #[arg(long, value_name = "N")]
    queue_bound: Option<usize>,

    /// Drop penalty per tick of duration
    #[arg(long, value_name = "X")]
    penalty: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SelectionArg {
    BestFit,
    FirstFit,
}

impl PolicyArgs {
    fn apply(&self, mut config: SchedulerConfig) -> SchedulerConfig {
        if let Some(selection) = self.port_selection {
            config.port_selection = match selection {
                SelectionArg::BestFit => PortSelection::BestFit,
                SelectionArg::FirstFit => PortSelection::FirstFit,
            };
        }
        if let Some(k) = self.buffer_per_port {
            config.buffer_bound = BufferBound::PerPort(k);
        }
        if let Some(n) = self.buffer_size {
            config.buffer_bound = BufferBound::Fixed(n);
        }
        if let Some(n) = self.queue_bound {
            config.queue_bound = n;
        }
        if let Some(x) = self.penalty {
            config.drop_penalty_multiplier = x;
        }
        config
    }
}

impl CandidateArgs {
    fn sweep(&self) -> ParameterSweep {
        ParameterSweep::random(self.random, self.seed)
            .candidates()
            .iter()
            .fold(ParameterSweep::default_grid(), |sweep, w| sweep.with_candidate(*w))
    }
}

fn parse_ranking(values: &[f64]) -> Option<RankingWeights> {
    match values {
        [a, b, c, d] => Some(RankingWeights::new(*a, *b, *c, *d)),
        [a, b, c, d, e] => Some(RankingWeights::new(*a, *b, *c, *d).with_inverse_rate(*e)),
        _ => None,
    }
}

fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            SchedulerConfig::load(path)
        }
        None => Ok(SchedulerConfig::default()),
    }
}

fn load_dataset(dataset: &Dataset) -> Result<(Vec<Flow>, Vec<Port>)> {
    let (flows, ports) = dataset.load()?;
    validate_input(&flows, &ports)?;
    Ok((flows, ports))
}

fn report(label: &str, outcome: &ScheduleOutcome) {
    let kpi = ScheduleKpi::calculate(outcome);
    println!(
        "{label}: objective={} makespan={} admitted={} dropped={} penalty={} avg_wait={:.2} utilization={:.3}",
        kpi.objective,
        kpi.makespan,
        kpi.admitted,
        kpi.dropped,
        kpi.total_penalty,
        kpi.avg_wait,
        kpi.avg_utilization
    );
}

fn sweep_dataset(
    dataset: &Dataset,
    sweep: &ParameterSweep,
    config: &SchedulerConfig,
    dry_run: bool,
) -> Result<f64> {
    let (flows, ports) = load_dataset(dataset)?;
    let Some(result) = sweep.run(config, &flows, &ports) else {
        warn!("no candidates to sweep for {}", dataset.dir.display());
        return Ok(0.0);
    };
    report(&dataset.dir.display().to_string(), &result.best);
    println!("  best ranking #{}: {}", result.best_index, result.best_weights);
    if !dry_run {
        dataset.write_result(&result.best.schedule)?;
    }
    Ok(result.best_objective())
}

fn execute(cli: Cli) -> Result<()> {
    let base = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Run {
            dataset,
            ranking,
            policy,
            dry_run,
        } => {
            let mut config = policy.apply(base);
            if let Some(values) = ranking {
                match parse_ranking(&values) {
                    Some(weights) => config.ranking = weights,
                    None => warn!(
                        "--ranking expects 4 or 5 values, got {}; keeping {}",
                        values.len(),
                        config.ranking
                    ),
                }
            }
            let dataset = Dataset::new(dataset);
            let (flows, ports) = load_dataset(&dataset)?;
            let outcome = FlowScheduler::new(config).schedule(&flows, &ports);
            report(&dataset.dir.display().to_string(), &outcome);
            if !dry_run {
                dataset.write_result(&outcome.schedule)?;
            }
        }
        Command::Sweep {
            dataset,
            candidates,
            policy,
            dry_run,
        } => {
            let config = policy.apply(base);
            sweep_dataset(&Dataset::new(dataset), &candidates.sweep(), &config, dry_run)?;
        }
        Command::Batch {
            root,
            candidates,
            policy,
        } => {
            let config = policy.apply(base);
            let datasets = Dataset::discover(&root);
            if datasets.is_empty() {
                return Err(Error::MissingDataset(root.join("0").join(PORT_FILE)));
            }
            let sweep = candidates.sweep();
            let mut total = 0.0;
            for dataset in &datasets {
                total += sweep_dataset(dataset, &sweep, &config, false)?;
            }
            println!("{} datasets, total objective {}", datasets.len(), total);
        }
        Command::Generate { root, count, seed } => {
            let mut generator = WorkloadGenerator::new(seed);
            for n in 0..count {
                let spec = generator.sample_spec();
                let (flows, ports) = generator.generate(&spec);
                let dataset = Dataset::new(root.join(n.to_string()));
                dataset.save(&flows, &ports)?;
                info!(
                    "wrote {}: {} flows, {} ports",
                    dataset.dir.display(),
                    flows.len(),
                    ports.len()
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = Cli::parse_from([
            "u-flowsched",
            "run",
            "data/0",
            "--ranking",
            "-6.4,0,1,0",
            "--port-selection",
            "first-fit",
            "--buffer-size",
            "8",
            "--penalty",
            "3",
        ]);
        let Command::Run {
            ranking, policy, ..
        } = cli.command
        else {
            panic!("expected run");
        };
        let weights = parse_ranking(&ranking.unwrap()).unwrap();
        assert!((weights.duration + 6.4).abs() < 1e-10);
        assert!((weights.rate - 1.0).abs() < 1e-10);

        let config = policy.apply(SchedulerConfig::default());
        assert_eq!(config.port_selection, PortSelection::FirstFit);
        assert_eq!(config.buffer_bound, BufferBound::Fixed(8));
        assert_eq!(config.queue_bound, 30);
        assert!((config.drop_penalty_multiplier - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_parse_ranking_arity() {
        assert!(parse_ranking(&[1.0, 2.0, 3.0]).is_none());
        let w = parse_ranking(&[1.0, 0.1, 0.0, 0.0, 1.0]).unwrap();
        assert!((w.inverse_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_candidates_extend_grid() {
        let cli = Cli::parse_from(["u-flowsched", "sweep", "data/0", "--random", "3"]);
        let Command::Sweep { candidates, .. } = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(candidates.sweep().len(), ParameterSweep::default_grid().len() + 3);
    }
}
