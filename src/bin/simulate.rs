//! Dungeon balance simulator CLI.
//!
//! Run Monte Carlo simulations of the wave loop to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 100 runs to wave 50
//!   cargo run --bin simulate -- -n 20 -w 30    # 20 runs to wave 30
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use reincarn_dungeon::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    let default_filter = if config.verbosity >= 2 { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DUNGEON BALANCE SIMULATOR                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Wave:    {}", config.target_wave);
    println!("  Time Budget:    {} min", config.max_sim_ms / 60_000);
    println!("  Event Chance:   {:.0}%", config.event_chance * 100.0);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(err) => {
                eprintln!("Failed to write {}: {}", filename, err);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(100);
                    i += 1;
                }
            }
            "-w" | "--wave" => {
                if i + 1 < args.len() {
                    config.target_wave = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--time" => {
                if i + 1 < args.len() {
                    let minutes: u64 = args[i + 1].parse().unwrap_or(240);
                    config.max_sim_ms = minutes * 60_000;
                    i += 1;
                }
            }
            "--event-chance" => {
                if i + 1 < args.len() {
                    let chance: f64 = args[i + 1].parse().unwrap_or(config.event_chance);
                    config.event_chance = chance.clamp(0.0, 1.0);
                    i += 1;
                }
            }
            "--early" => {
                config = SimConfig::early_game_test(20);
            }
            "--scaling" => {
                config = SimConfig::scaling_test();
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Dungeon Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>          Number of simulation runs (default: 100)");
    println!("    -w, --wave <W>          Target wave to reach (default: 50)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    -t, --time <MIN>        Simulated minutes per run (default: 240)");
    println!("    --event-chance <P>      Dungeon event chance, 0.0-1.0 (default: 0.30)");
    println!("    --early                 Early-game preset (50 runs to wave 20)");
    println!("    --scaling               Scaling preset (events off, wave 200)");
    println!("    -v, --verbose           Per-run output and info logging");
    println!("    --json                  Save JSON report");
    println!("    -h, --help              Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                    # Default run");
    println!("    cargo run --bin simulate -- -n 20 -w 30    # 20 runs to wave 30");
    println!("    cargo run --bin simulate -- --seed 42      # Reproducible");
    println!("    cargo run --bin simulate -- --event-chance 0 --json");
}
