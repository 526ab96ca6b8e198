//! sim-runner: headless front end for the menu pricing engine.
//!
//! Usage:
//!   sim-runner --seed 12345 --trials 50 --data-dir ./data
//!   sim-runner --seed 12345 --data-dir ./data --ipc-mode

use anyhow::Result;
use menu_pricing_core::{
    config::PricingConfig,
    engine::PricingEngine,
    optimizer::DEFAULT_TRIALS,
    orders::load_orders,
    report::OptimizationReport,
};
use std::collections::HashMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Optimize {
        #[serde(default)]
        trials: Option<u32>,
    },
    Scenario {
        multipliers: HashMap<String, f64>,
    },
    HeatScores {
        dish_id: String,
    },
    ComboPopularity {
        #[serde(default = "default_combo_size")]
        min_size: usize,
        #[serde(default = "default_combo_size")]
        max_size: usize,
        #[serde(default = "default_top_k")]
        top_k: usize,
    },
    Quit,
}

fn default_combo_size() -> usize {
    2
}

fn default_top_k() -> usize {
    5
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let trials = parse_arg(&args, "--trials", DEFAULT_TRIALS);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if !ipc_mode {
        println!("Menu Pricing: sim-runner");
        println!("  seed:      {seed}");
        println!("  trials:    {trials}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = PricingConfig::load(data_dir, seed)?;
    let orders = load_orders(data_dir)?;
    let engine = PricingEngine::new(config, orders)?;

    if ipc_mode {
        run_ipc_loop(&engine, trials)?;
    } else {
        let report = engine.optimize(trials)?;
        print_summary(&engine, &report);
    }

    Ok(())
}

fn run_ipc_loop(engine: &PricingEngine, default_trials: u32) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Optimize { trials } => engine
                .optimize(trials.unwrap_or(default_trials))
                .map(serde_json::to_value),
            IpcCommand::Scenario { multipliers } => engine
                .scenario(&multipliers)
                .map(serde_json::to_value),
            IpcCommand::HeatScores { dish_id } => {
                Ok(serde_json::to_value(engine.heat_scores(&dish_id)))
            }
            IpcCommand::ComboPopularity { min_size, max_size, top_k } => engine
                .combo_popularity(min_size, max_size, top_k)
                .map(serde_json::to_value),
        };

        match response {
            Ok(value) => writeln!(stdout, "{}", value?)?,
            Err(e) => {
                log::warn!("ipc: request failed: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(engine: &PricingEngine, report: &OptimizationReport) {
    let improved = report.optimized_profit - report.baseline_profit;

    println!("=== OPTIMIZATION SUMMARY ===");
    println!("  seed:             {}", engine.config().seed);
    println!("  trials run:       {}", report.trials.len());
    println!("  best trial:       #{} (${:.2})", report.best_trial.trial, report.best_trial.profit);
    println!("  baseline profit:  ${:.2}", report.baseline_profit);
    println!("  optimized profit: ${:.2}", report.optimized_profit);
    println!("  change:           ${improved:+.2}");

    println!();
    println!("=== PRICES ===");
    for p in &report.products {
        let elasticity = p
            .elasticity
            .map(|e| format!("{e:+.2}"))
            .unwrap_or_else(|| "n/a".into());
        println!(
            "  {:<22} ${:>6.2} -> ${:>6.2} | demand {:>4} (was {:>4}) | e={:<6} {}",
            p.name,
            p.current_price,
            p.optimal_price,
            p.expected_demand,
            p.baseline_demand,
            elasticity,
            p.elasticity_class.label()
        );
    }

    println!();
    match &report.best_pair {
        Some(pair) => println!(
            "  Most co-purchased: '{}' + '{}' ({} customers)",
            pair.first.name, pair.second.name, pair.count
        ),
        None => println!("  (No co-purchase patterns found)"),
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
