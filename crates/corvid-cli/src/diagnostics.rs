//! Renders a [`Driver`]'s accumulated diagnostics to the terminal.

use corvid_compiler::driver::Driver;
use corvid_parser::diagnostics::DiagnosticLevel;

/// Prints every diagnostic the driver collected, one per line, as
/// `level: message at file:line:col` (spec §7: "(file, line, column) plus
/// a human-readable message; no error codes").
pub fn print_diagnostics(driver: &Driver) {
    for diagnostic in driver.diagnostics() {
        let where_ = driver.describe_span(diagnostic.span);
        let level = match diagnostic.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Note => "note",
        };
        eprintln!("{level}: {} at {where_}", diagnostic.message);
    }
}
