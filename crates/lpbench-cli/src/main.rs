mod compare;
mod instance;
mod report;

use clap::{ArgAction, Parser};
use lpbench_solver::{Method, Solver, validate_tolerance};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::report::Format;

#[derive(Parser)]
#[command(name = "lpbench")]
#[command(about = "Solve a fixed linear program with simplex and revised simplex and compare them", long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,
    /// Method to run (repeatable); defaults to revised simplex then simplex
    #[arg(short = 'm', long = "method")]
    methods: Vec<Method>,
    /// Tolerance for floating point comparisons (finite, positive)
    #[arg(long, default_value_t = 1e-9, value_parser = parse_tolerance)]
    tolerance: f64,
    /// Maximum pivots per solve
    #[arg(long, default_value_t = 10000)]
    max_iterations: usize,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    validate_tolerance(value).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }

    let methods = if cli.methods.is_empty() {
        vec![Method::RevisedSimplex, Method::Simplex]
    } else {
        cli.methods
    };

    let problem = instance::fixed_problem();
    let solver = Solver::new()
        .with_tolerance(cli.tolerance)
        .with_max_iterations(cli.max_iterations);

    let runs = compare::run_methods(&problem, &methods, &solver);

    let mut failed = false;
    for run in &runs {
        if let Err(e) = &run.objective {
            eprintln!("{}: {}", report::label(run.method), e);
            failed = true;
        }
    }

    match report::render(&report::rows(&runs), cli.format) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error rendering results: {}", e);
            std::process::exit(1);
        }
    }

    if failed {
        std::process::exit(1);
    }
}
