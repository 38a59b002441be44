use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn, LevelFilter};
use std::fs;
use std::path::PathBuf;

use wsnsim::config::SimulationConfig;
use wsnsim::config_loader::{self, CliOverrides};
use wsnsim::orchestrator::{run_batch, run_simulation, summarize_batch, SimulationReport};
use wsnsim::report;

/// Sinkhole attack, detection and mitigation simulator for wireless sensor networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a simulation configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for reports and the topology graph
    #[arg(short, long, default_value = "wsnsim_output")]
    output: PathBuf,

    /// Number of sensor nodes
    #[arg(long)]
    sensors: Option<usize>,

    /// Seed of the random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Sensor turned into a sinkhole (random if omitted)
    #[arg(long)]
    attacker: Option<u32>,

    /// Out-degree above which the IDS flags a sensor
    #[arg(long)]
    threshold: Option<usize>,

    /// Skip the secure routing pass
    #[arg(long)]
    no_mitigation: bool,

    /// Number of independent runs with consecutive seeds
    #[arg(long, default_value_t = 1)]
    runs: u32,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging. Without RUST_LOG the global max level filters,
    // starting at info until the config level is known.
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    if !rust_log_set {
        log::set_max_level(LevelFilter::Info);
    }

    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => SimulationConfig::default(),
    };

    let overrides = CliOverrides {
        sensors: args.sensors,
        seed: args.seed,
        attacker: args.attacker,
        ids_threshold: args.threshold,
        disable_secure_routing: args.no_mitigation,
    };
    config_loader::apply_cli_overrides(&mut config, &overrides)?;

    if !rust_log_set {
        log::set_max_level(config_log_level(&config));
    }

    info!("Starting WSN sinkhole simulation");
    if let Some(path) = &args.config {
        info!("Configuration file: {:?}", path);
    }
    info!("Output directory: {:?}", args.output);

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output.display()))?;

    if args.runs > 1 {
        return run_many(&config, &args);
    }

    let report = run_simulation(&config)?;
    write_reports(&report, &args.output, "")?;
    print!("{}", report::render_text_report(&report));

    info!("Simulation completed successfully");
    Ok(())
}

fn run_many(config: &SimulationConfig, args: &Args) -> Result<()> {
    let first_seed = config.general.seed.unwrap_or_else(rand::random);
    let seeds: Vec<u64> = (0..u64::from(args.runs)).map(|i| first_seed.wrapping_add(i)).collect();

    let mut reports = Vec::with_capacity(seeds.len());
    for (seed, result) in seeds.iter().zip(run_batch(config, &seeds)) {
        match result {
            Ok(report) => {
                write_reports(&report, &args.output, &format!("_seed{}", seed))?;
                reports.push(report);
            }
            Err(e) => warn!("Run with seed {} failed: {}", seed, e),
        }
    }

    match summarize_batch(&reports) {
        Some(summary) => print!("{}", report::render_batch_summary(&summary)),
        None => warn!("No run completed successfully"),
    }

    info!("Batch of {} run(s) completed", seeds.len());
    Ok(())
}

/// Level from `general.log_level`, `info` when unset
fn config_log_level(config: &SimulationConfig) -> LevelFilter {
    config
        .general
        .log_level
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn write_reports(report: &SimulationReport, output: &std::path::Path, suffix: &str) -> Result<()> {
    report::generate_json_report(report, &output.join(format!("report{}.json", suffix)))?;
    report::generate_text_report(report, &output.join(format!("report{}.txt", suffix)))?;
    report::write_dot(&report.snapshot, &output.join(format!("topology{}.dot", suffix)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Args::parse_from(["wsnsim"]);

        assert_eq!(args.config, None);
        assert_eq!(args.output, PathBuf::from("wsnsim_output"));
        assert_eq!(args.runs, 1);
        assert!(!args.no_mitigation);
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "wsnsim",
            "--config", "sim.yaml",
            "--sensors", "20",
            "--seed", "42",
            "--attacker", "5",
            "--threshold", "3",
            "--no-mitigation",
            "--runs", "8",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("sim.yaml")));
        assert_eq!(args.sensors, Some(20));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.attacker, Some(5));
        assert_eq!(args.threshold, Some(3));
        assert!(args.no_mitigation);
        assert_eq!(args.runs, 8);
    }

    #[test]
    fn test_config_log_level() {
        let mut config = SimulationConfig::default();
        assert_eq!(config_log_level(&config), LevelFilter::Info);

        config.general.log_level = Some("debug".to_string());
        assert_eq!(config_log_level(&config), LevelFilter::Debug);

        config.general.log_level = Some("WARN".to_string());
        assert_eq!(config_log_level(&config), LevelFilter::Warn);
    }
}
