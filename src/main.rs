//! Gray-Scott CLI - Run simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use log::info;

use gray_scott::{
    compute::{FieldStats, GrayScott},
    schema::{Seed, SimulationConfig, presets},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a Gray-Scott simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Number of simulation steps (default: 100)");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        eprintln!(
            "Parameter presets: {}",
            presets::preset_names().collect::<Vec<_>>().join(", ")
        );
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = SimulationConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    // Load or create seed
    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    println!("Gray-Scott Simulation");
    println!("=====================");
    println!(
        "Grid: {}x{}x{} ({:?})",
        config.width, config.height, config.depth, config.stencil
    );
    println!(
        "Rates: dA={} dB={} feed={} kill={}",
        config.params.diff_a, config.params.diff_b, config.params.feed, config.params.kill
    );
    println!("dt: {}", config.dt);
    println!("Steps: {}", steps);
    println!();

    let mut sim = GrayScott::from_seed(config, &seed).unwrap_or_else(|e| {
        eprintln!("Error creating simulation: {}", e);
        std::process::exit(1);
    });
    print_stats("Initial state", &FieldStats::from_sim(&sim));

    info!("running {} steps", steps);
    let start = Instant::now();

    for i in 0..steps {
        sim.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = FieldStats::from_sim(&sim);
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: mean A={:.6}, mean B={:.6}, {:.1} steps/s",
                i + 1,
                steps,
                stats.mean_a,
                stats.mean_b,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    print_stats("Final state", &FieldStats::from_sim(&sim));

    if let Err(e) = sim.export() {
        eprintln!("Export failed: {}", e);
        std::process::exit(2);
    }

    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_stats(label: &str, stats: &FieldStats) {
    println!("{}:", label);
    println!(
        "  A range: [{:.6}, {:.6}], mean {:.6}",
        stats.min_a, stats.max_a, stats.mean_a
    );
    println!(
        "  B range: [{:.6}, {:.6}], mean {:.6}",
        stats.min_b, stats.max_b, stats.mean_b
    );
    if stats.non_finite > 0 {
        println!("  Non-finite cells: {}", stats.non_finite);
    }
    println!();
}

fn print_example_config() {
    let config = SimulationConfig::default();
    let seed = Seed::default();

    println!("Example configuration (config.json):");
    match config.to_json_string() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
    println!();
    println!("Example seed (config.seed.json):");
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing seed: {}", e),
    }
}
