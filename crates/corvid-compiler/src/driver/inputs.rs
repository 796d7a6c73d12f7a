//! CLI input expansion: directories, and the `*`/`**` glob forms spec §6
//! describes (`*` matches one path segment's worth of source files,
//! `**` recurses into subdirectories).

use std::path::{Path, PathBuf};

use crate::error::{CompileError, CompileResult};

use super::is_source_file;

/// Expands a list of CLI-supplied paths into the concrete set of source
/// files to compile, in a stable, sorted order so repeated runs produce
/// the same file ordering (and so mangled names and diagnostics stay
/// deterministic across runs).
///
/// - A plain file path passes through unchanged.
/// - A directory ending in `*` expands to every source file directly
///   inside it.
/// - A directory ending in `**` expands to every source file anywhere
///   beneath it, recursively.
/// - Anything else that names a directory is treated as `dir/*`.
///
/// ## Errors
///
/// Returns [`CompileError::Io`] if a directory named by `inputs` cannot
/// be read.
pub fn expand_inputs(inputs: &[PathBuf]) -> CompileResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        expand_one(input, &mut out)?;
    }
    out.sort();
    out.dedup();
    Ok(out)
}

fn expand_one(input: &Path, out: &mut Vec<PathBuf>) -> CompileResult<()> {
    match input.file_name().and_then(|name| name.to_str()) {
        Some("**") => return collect_dir(input.parent().unwrap_or(input), true, out),
        Some("*") => return collect_dir(input.parent().unwrap_or(input), false, out),
        _ => {}
    }

    if input.is_dir() {
        return collect_dir(input, false, out);
    }

    // A plain file: source files are compiled, everything else (object
    // files, static libraries) passes through untouched to the backend.
    out.push(input.to_path_buf());
    Ok(())
}

fn collect_dir(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> CompileResult<()> {
    let entries =
        std::fs::read_dir(dir).map_err(|source| CompileError::Io { path: dir.to_path_buf(), source })?;
    for entry in entries {
        let entry = entry.map_err(|source| CompileError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_dir(&path, recursive, out)?;
            }
        } else if is_source_file(&path) {
            out.push(path);
        }
    }
    Ok(())
}
