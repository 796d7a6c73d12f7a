//! Build command implementation

use std::path::PathBuf;

use anyhow::Result;
use corvid_compiler::driver::Driver;

use crate::diagnostics::print_diagnostics;

/// Front-ends `inputs` and reports that no backend is configured — the
/// C emitter, TCC JIT, and Emscripten targets are all out of scope here
/// (spec §1, Non-goals), so `build` never silently no-ops: it runs the
/// front end, surfaces any diagnostics, then says so explicitly.
pub fn execute(inputs: Vec<PathBuf>, verbose: bool) -> Result<()> {
    let mut driver = Driver::new();
    let program = driver.compile(&inputs)?;

    if verbose {
        println!("front-end pass complete over {} file(s)", program.files().len());
    }

    print_diagnostics(&driver);

    if driver.has_errors() {
        anyhow::bail!("build failed: front end reported errors");
    }

    match program.entry_point() {
        Some(_) => println!("front end succeeded; no backend configured"),
        None => println!("front end succeeded (no entry point); no backend configured"),
    }
    Ok(())
}
