//! CLI command implementations.

use jstep_common::{Instruction, Listing, MethodId};
use jstep_vm::{Config, Driver};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read and assemble a listing file.
fn read_listing(path: &Path) -> Result<Listing, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        1
    })?;

    jstep_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        1
    })
}

/// Run `method` from a listing and print its outcome.
pub fn run(listing: &Path, method: &str, input: &str, config: Config) -> Result<(), i32> {
    let code = read_listing(listing)?;

    let entry: MethodId = method.parse().map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    if code.get(&entry).is_none() {
        eprintln!("error: {entry} is not defined in '{}'", listing.display());
        return Err(1);
    }

    let args = jstep_common::parse_inputs(input).map_err(|e| {
        eprintln!("error: bad input {input:?}: {e}");
        1
    })?;

    let source: HashMap<MethodId, Vec<Instruction>> = code.into();
    let mut driver = Driver::with_config(source, config);
    match driver.run(&entry, args) {
        Ok(execution) => {
            tracing::info!(
                steps = execution.steps,
                max_steps = driver.config().max_steps,
                "run complete"
            );
            println!("{}", execution.outcome);
            Ok(())
        }
        Err(e) => {
            eprintln!("internal error: {e}");
            Err(3)
        }
    }
}

/// Assemble a listing and report what it contains.
pub fn check(listing: &Path) -> Result<(), i32> {
    let code = read_listing(listing)?;
    println!(
        "OK: {} methods ({} instructions)",
        code.len(),
        code.instruction_count()
    );
    Ok(())
}

/// Print the canonical form of a listing.
pub fn disassemble(listing: &Path) -> Result<(), i32> {
    let code = read_listing(listing)?;
    print!("{}", jstep_assembler::disassemble(&code));
    Ok(())
}

/// Print one line per method: id and instruction count.
pub fn methods(listing: &Path) -> Result<(), i32> {
    let code = read_listing(listing)?;
    for method in &code.methods {
        println!("{}\t{}", method.id, method.code.len());
    }
    Ok(())
}
