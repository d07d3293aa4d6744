//! QEST Random Qubit Estimation
//!
//! Draws a random qubit, runs all four protocols on it, then repeats the
//! closed-form protocols over a batch of qubits and prints a summary.
//!
//! Usage: estimate_random_qubit [seed] [trials] [format]

use qest_bench::prelude::*;
use qest_core::{Parameter, QestResult};
use qest_estimate::{EstimationSuite, EstimatorConfig};

fn main() -> QestResult<()> {
    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let trials: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
    let format: ReportFormat = match args.next() {
        Some(s) => s.parse()?,
        None => ReportFormat::Text,
    };

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              QEST Random Qubit Estimation                ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    // =========================================================================
    // Part 1: One qubit, every parameter
    // =========================================================================
    let qubit = QubitGenerator::with_seed(seed).random();
    println!("Qubit: {}\n", qubit);

    let report = EstimationSuite::new(EstimatorConfig::new().with_seed(seed))?.run(&qubit)?;
    for outcome in &report.outcomes {
        println!("  {}", outcome);
    }
    println!();

    // =========================================================================
    // Part 2: Repeated closed-form trials
    // =========================================================================
    let mut suite = BenchSuite::with_seed(seed);
    suite.run_random(Parameter::Gamma1, trials, 1_000_000)?;
    suite.run_random(Parameter::Gamma2, trials, 100_000)?;

    println!("{}", Reporter::report(suite.results(), format));
    Ok(())
}
