//! Cultivation balance simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                          # 1000 runs to Nascent Soul
//!   cargo run --bin simulate -- -n 100 -r "Core Formation"
//!   cargo run --bin simulate -- --seed 42 --focus aggressive

use cultivator::core::session::CultivationFocus;
use cultivator::realm::Realm;
use cultivator::simulator::{run_simulation, ChoicePolicy, SimConfig};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let (config, verbose) = parse_args(&args);

    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              CULTIVATION BALANCE SIMULATOR                    ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Realm:   {}", config.target_realm);
    println!("  Focus:          {}", config.focus);
    println!("  Max Sessions:   {}", config.max_sessions);
    println!("  Breakthroughs:  {}", if config.auto_breakthrough { "auto" } else { "off" });
    println!("  Choices:        {}", config.choice_policy.name());
    println!("  Travel:         {}", if config.auto_travel { "auto" } else { "stay" });
    if config.meditate_threshold > 0 {
        println!("  Meditate at:    {} negative effects", config.meditate_threshold);
    }
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
        if let Err(err) = std::fs::write(&filename, report.to_json()) {
            eprintln!("Failed to write JSON report: {err}");
            return ExitCode::FAILURE;
        }
        println!("JSON report saved to: {}", filename);
    }

    ExitCode::SUCCESS
}

fn parse_focus(value: &str) -> Option<CultivationFocus> {
    CultivationFocus::all()
        .into_iter()
        .find(|focus| focus.name().eq_ignore_ascii_case(value))
}

fn parse_policy(value: &str) -> Option<ChoicePolicy> {
    ChoicePolicy::all()
        .into_iter()
        .find(|policy| policy.name().eq_ignore_ascii_case(value))
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-r" | "--realm" => {
                if i + 1 < args.len() {
                    match Realm::from_name(&args[i + 1]) {
                        Some(realm) => config.target_realm = realm,
                        None => eprintln!("Unknown realm '{}', keeping {}", args[i + 1], config.target_realm),
                    }
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-m" | "--sessions" => {
                if i + 1 < args.len() {
                    config.max_sessions = args[i + 1].parse().unwrap_or(20_000);
                    i += 1;
                }
            }
            "-f" | "--focus" => {
                if i + 1 < args.len() {
                    match parse_focus(&args[i + 1]) {
                        Some(focus) => config.focus = focus,
                        None => eprintln!("Unknown focus '{}', keeping {}", args[i + 1], config.focus),
                    }
                    i += 1;
                }
            }
            "--meditate-at" => {
                if i + 1 < args.len() {
                    config.meditate_threshold = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "-c" | "--choices" => {
                if i + 1 < args.len() {
                    match parse_policy(&args[i + 1]) {
                        Some(policy) => config.choice_policy = policy,
                        None => eprintln!("Unknown choice policy '{}', keeping {}", args[i + 1], config.choice_policy.name()),
                    }
                    i += 1;
                }
            }
            "--stay" => {
                config.auto_travel = false;
            }
            "--no-breakthrough" => {
                config.auto_breakthrough = false;
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick_check();
            }
            "--full" => {
                config = SimConfig::full_ascension();
            }
            _ => {}
        }
        i += 1;
    }

    (config, verbose)
}

fn print_help() {
    println!("Cultivation Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulation runs (default: 1000)");
    println!("    -r, --realm <NAME>    Target realm to reach (default: Nascent Soul)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -m, --sessions <M>    Max sessions per run (default: 20,000)");
    println!("    -f, --focus <F>       balanced, aggressive or foundation");
    println!("    --meditate-at <K>     Meditate at K negative effects, 0 disables (default: 3)");
    println!("    -c, --choices <P>     skip, cautious or bold answers to choices (default: cautious)");
    println!("    --stay                Never leave Peaceful Valley");
    println!("    --no-breakthrough     Never attempt breakthroughs");
    println!("    -v, --verbose         Log each finished run");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick test (100 runs to Foundation Building)");
    println!("    --full                Full test (50 runs to Heavenly Immortal)");
    println!("    -h, --help            Show this help");
}
