//! pnl-grid CLI
//!
//! Compute profit/loss scenario grids and brokerage-style valuations from
//! the command line.
//!
//! # Usage
//!
//! ```bash
//! # Grid for a saved-state style JSON file
//! pnl-grid grid --input position.json
//!
//! # Output as JSON at a coarser resolution
//! pnl-grid grid --input position.json --format json --resolution 50
//!
//! # Reproduce a brokerage statement line
//! pnl-grid valuate --currency home --avg 15234.5678 --qty 37 --current 612345
//!
//! # Manage saved states
//! pnl-grid save --store ./states --name plan --input position.json
//! pnl-grid list --store ./states
//! ```

use pnl_grid::grid::engine::GridEngine;
use pnl_grid::session::Session;
use pnl_grid::store::kv::FileStore;
use pnl_grid::store::snapshot::AppState;
use pnl_grid::store::SnapshotStore;
use pnl_grid::valuation::brokerage::{
    compute_foreign_valuation_candidates, compute_home_valuation,
};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"pnl-grid — profit/loss scenario grids for foreign-currency stock positions

USAGE:
    pnl-grid <COMMAND> [OPTIONS]

COMMANDS:
    grid        Compute the rate × price profit grid for a position
    valuate     Value a position the way a brokerage statement shows it
    save        Save a position file as a named state
    restore     Print a named state as JSON
    list        List saved state names
    delete      Delete a named state
    help        Show this message

OPTIONS (grid):
    --input <FILE>        Path to a state JSON file (purchases, pins, range)
    --format <FORMAT>     Output format: text (default) or json
    --resolution <N>      Samples per axis (default: 200)

OPTIONS (valuate):
    --currency <CCY>      home or foreign
    --avg <X>             Average acquisition price per share
    --qty <N>             Share count
    --current <X>         home: current value; foreign: current price per share
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (save, restore, list, delete):
    --store <DIR>         Directory holding saved states
    --name <NAME>         State name
    --input <FILE>        State JSON file to save (save only)

EXAMPLES:
    pnl-grid grid --input position.json
    pnl-grid grid --input position.json --format json --resolution 50
    pnl-grid valuate --currency foreign --avg 123.4567 --qty 15 --current 145.67
    pnl-grid save --store ./states --name plan --input position.json
    pnl-grid restore --store ./states --name plan"#
    );
}

/// Options shared by every command. Each command checks the ones it needs.
#[derive(Default)]
struct Options {
    input: Option<String>,
    format: Option<String>,
    resolution: Option<usize>,
    currency: Option<String>,
    avg: Option<Decimal>,
    qty: Option<Decimal>,
    current: Option<Decimal>,
    store: Option<String>,
    name: Option<String>,
}

fn take_value(args: &[String], i: usize, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", args[i - 1], what);
        process::exit(1);
    })
}

fn take_decimal(args: &[String], i: usize) -> Decimal {
    let raw = take_value(args, i, "a number");
    raw.trim().parse().unwrap_or_else(|e| {
        eprintln!("Invalid number '{}' for {}: {}", raw, args[i - 1], e);
        process::exit(1);
    })
}

fn parse_options(args: &[String]) -> Options {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                opts.input = Some(take_value(args, i, "a file path"));
            }
            "--format" => {
                i += 1;
                opts.format = Some(take_value(args, i, "'text' or 'json'"));
            }
            "--resolution" => {
                i += 1;
                opts.resolution = Some(
                    take_value(args, i, "a number")
                        .parse()
                        .unwrap_or_else(|_| {
                            eprintln!("--resolution requires a positive integer");
                            process::exit(1);
                        }),
                );
            }
            "--currency" => {
                i += 1;
                opts.currency = Some(take_value(args, i, "'home' or 'foreign'"));
            }
            "--avg" => {
                i += 1;
                opts.avg = Some(take_decimal(args, i));
            }
            "--qty" => {
                i += 1;
                opts.qty = Some(take_decimal(args, i));
            }
            "--current" => {
                i += 1;
                opts.current = Some(take_decimal(args, i));
            }
            "--store" => {
                i += 1;
                opts.store = Some(take_value(args, i, "a directory"));
            }
            "--name" => {
                i += 1;
                opts.name = Some(take_value(args, i, "a state name"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    opts
}

fn require<T>(value: Option<T>, flag: &str) -> T {
    value.unwrap_or_else(|| {
        eprintln!("Error: {} is required", flag);
        process::exit(1);
    })
}

fn is_json(opts: &Options) -> bool {
    match opts.format.as_deref() {
        None | Some("text") => false,
        Some("json") => true,
        Some(other) => {
            eprintln!("Unknown format '{}': expected 'text' or 'json'", other);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn load_state(path: &str) -> AppState {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    AppState::from_json(&content).unwrap_or_else(|e| {
        eprintln!("Error loading state: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "fxMin": 120, "fxMax": 160, "priceMin": 100, "priceMax": 300,
  "purchases": [ {{ "price": 100, "fx": 150, "qty": 10 }} ],
  "pins": [ {{ "fx": 150, "price": 120 }} ]
}}"#
        );
        process::exit(1);
    })
}

fn open_store(opts: &Options) -> SnapshotStore<FileStore> {
    let dir = require(opts.store.as_deref(), "--store <DIR>");
    let backend = FileStore::open(dir).unwrap_or_else(|e| {
        eprintln!("Error opening store '{}': {}", dir, e);
        process::exit(1);
    });
    SnapshotStore::new(backend)
}

fn cmd_grid(args: &[String]) {
    let opts = parse_options(args);
    let path = require(opts.input.as_deref(), "--input <FILE>");
    let json = is_json(&opts);

    let mut session = Session::new();
    if let Some(resolution) = opts.resolution {
        session.engine = GridEngine::new(resolution);
    }
    session.apply(load_state(path)).unwrap_or_else(|e| {
        eprintln!("Error loading state: {}", e);
        process::exit(1);
    });

    let data = session.try_graph().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if json {
        print_json(&data);
    } else {
        println!("{}", data);
    }
}

fn cmd_valuate(args: &[String]) {
    let opts = parse_options(args);
    let currency = require(opts.currency.as_deref(), "--currency <home|foreign>");
    let avg = require(opts.avg, "--avg <X>");
    let qty = require(opts.qty, "--qty <N>");
    let current = require(opts.current, "--current <X>");
    let json = is_json(&opts);

    match currency {
        "home" => {
            let v = compute_home_valuation(avg, qty, current).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                process::exit(1);
            });
            if json {
                print_json(&v);
            } else {
                println!("=== Home Valuation ===");
                println!("Acquisition cost: {}", v.total_acq_home);
                println!("Profit/loss:      {}", v.profit_loss_home);
                println!("Rate:             {:.2}%", v.profit_loss_rate_pct);
            }
        }
        "foreign" => {
            let v = compute_foreign_valuation_candidates(avg, qty, current).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                process::exit(1);
            });
            if json {
                print_json(&v);
            } else {
                println!("=== Foreign Valuation ===");
                println!("Current value:    {:.2}", v.current_value_foreign);
                println!("Acquisition:      {}", join_decimals(&v.acq_candidates));
                println!("Profit/loss:      {}", join_decimals(&v.pnl_candidates));
                println!("Rate (%):         {}", join_decimals(&v.rate_candidates));
            }
        }
        other => {
            eprintln!("Unknown currency '{}': expected 'home' or 'foreign'", other);
            process::exit(1);
        }
    }
}

fn join_decimals<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> String {
    values
        .into_iter()
        .map(|d| format!("{:.2}", d))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_save(args: &[String]) {
    let opts = parse_options(args);
    let name = require(opts.name.as_deref(), "--name <NAME>");
    let path = require(opts.input.as_deref(), "--input <FILE>");

    let mut session = Session::new();
    session.apply(load_state(path)).unwrap_or_else(|e| {
        eprintln!("Error loading state: {}", e);
        process::exit(1);
    });

    let mut store = open_store(&opts);
    store.save(name, &session.snapshot()).unwrap_or_else(|e| {
        eprintln!("Error saving '{}': {}", name, e);
        process::exit(1);
    });
    eprintln!("Saved state '{}'", name.trim());
}

fn cmd_restore(args: &[String]) {
    let opts = parse_options(args);
    let name = require(opts.name.as_deref(), "--name <NAME>");
    let store = open_store(&opts);
    let state = store.restore(name).unwrap_or_else(|e| {
        eprintln!("Error restoring '{}': {}", name, e);
        process::exit(1);
    });
    print_json(&state);
}

fn cmd_list(args: &[String]) {
    let opts = parse_options(args);
    let store = open_store(&opts);
    let names = store.names().unwrap_or_else(|e| {
        eprintln!("Error listing states: {}", e);
        process::exit(1);
    });
    if names.is_empty() {
        println!("No saved states.");
    }
    for name in names {
        println!("{}", name);
    }
}

fn cmd_delete(args: &[String]) {
    let opts = parse_options(args);
    let name = require(opts.name.as_deref(), "--name <NAME>");
    let mut store = open_store(&opts);
    match store.delete(name) {
        Ok(true) => eprintln!("Deleted state '{}'", name.trim()),
        Ok(false) => {
            eprintln!("No saved state named '{}'", name.trim());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error deleting '{}': {}", name, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "grid" => cmd_grid(rest),
        "valuate" => cmd_valuate(rest),
        "save" => cmd_save(rest),
        "restore" => cmd_restore(rest),
        "list" => cmd_list(rest),
        "delete" => cmd_delete(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
