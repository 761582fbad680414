//! Basic usage example for the oacheck library.
//!
//! This example demonstrates how to load binary matrices, verify them and
//! inspect the diagnostics of a failing array.

use oacheck::{
    compute_strength, verify_strength, walsh_distance, weight_distribution, BinaryMatrix, Report,
};

fn main() {
    println!("oacheck - Basic Usage Example\n");

    // L8(2^7): the standard Taguchi two-level array, strength 2
    let l8: BinaryMatrix = "\
        0 0 0 0 0 0 0
        0 0 0 1 1 1 1
        0 1 1 0 0 1 1
        0 1 1 1 1 0 0
        1 0 1 0 1 0 1
        1 0 1 1 0 1 0
        1 1 0 0 1 1 0
        1 1 0 1 0 0 1"
        .parse()
        .expect("L8 is well formed");

    println!("L8 Array:");
    println!("  Runs: {}", l8.runs());
    println!("  Factors: {}", l8.factors());
    println!("  Rows by number of ones: {:?}", weight_distribution(&l8));
    println!();
    println!("{l8}");

    println!("Verifying strength-2 property...");
    let verdict = verify_strength(&l8, 2).expect("strength 2 is valid for 7 columns");
    println!("  {}", Report::new(&verdict));
    println!();

    println!("Verifying strength-3 property...");
    let verdict = verify_strength(&l8, 3).expect("strength 3 is valid for 7 columns");
    println!("  {}", Report::new(&verdict));
    println!(
        "  Walsh distance at strength 3: {}",
        walsh_distance(&l8, 3).expect("strength 3 is valid for 7 columns")
    );
    println!();

    println!(
        "Actual strength of L8: {}",
        compute_strength(&l8, 7).expect("within the subset ceiling")
    );

    // Malformed input is an error, not a verdict
    println!();
    match "0 1\n1 0 1\n".parse::<BinaryMatrix>() {
        Ok(_) => println!("unexpectedly accepted a ragged matrix"),
        Err(err) => println!("Ragged input rejected: {err}"),
    }
}
