//! Check command implementation

use std::path::PathBuf;

use anyhow::Result;
use corvid_compiler::driver::Driver;

use crate::diagnostics::print_diagnostics;

/// Runs the front end over `inputs` and reports diagnostics, without
/// requiring a backend — spec §6's `check` split.
pub fn execute(inputs: Vec<PathBuf>, verbose: bool) -> Result<()> {
    let mut driver = Driver::new();
    let program = driver.compile(&inputs)?;

    if verbose {
        println!("checked {} file(s)", program.files().len());
    }

    print_diagnostics(&driver);

    if driver.has_errors() {
        anyhow::bail!("type checking failed");
    }
    println!("no errors found");
    Ok(())
}
