//! End-to-end driver tests: compile small in-memory programs and check
//! the backend query interface the driver hands back.

use std::path::PathBuf;

use corvid_compiler::driver::Driver;

#[test]
fn compile_source_resolves_an_entry_point() {
    let mut driver = Driver::new();
    let program = driver.compile_source("func main() -> int { return 0; }", "main.cv");
    assert!(!driver.has_errors(), "diagnostics: {:?}", driver.diagnostics());
    assert!(program.entry_point().is_some());
}

#[test]
fn compile_source_reports_a_diagnostic_with_a_file_location() {
    let mut driver = Driver::new();
    let _ = driver.compile_source("func main() -> int { return missing; }", "broken.cv");
    assert!(driver.has_errors());
    let diagnostic = &driver.diagnostics()[0];
    let where_ = driver.describe_span(diagnostic.span);
    assert!(where_.starts_with("broken.cv:"), "got: {where_}");
}

#[test]
fn mangled_name_of_the_entry_point_is_available_through_the_backend_interface() {
    let mut driver = Driver::new();
    let program = driver.compile_source("func main() -> int { return 0; }", "main.cv");
    let entry = program.entry_point().expect("entry point");
    assert!(program.mangled_name_of(entry).is_some());
}

#[test]
fn wildcard_directory_expansion_compiles_every_source_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.cv"), "func a() -> int { return 1; }").expect("write a.cv");
    std::fs::write(dir.path().join("b.cv"), "func main() -> int { return a(); }").expect("write b.cv");
    std::fs::write(dir.path().join("ignored.txt"), "not source").expect("write ignored.txt");

    let mut driver = Driver::new();
    let inputs = vec![dir.path().join("*")];
    let program = driver.compile(&inputs).expect("compile");
    assert_eq!(program.files().len(), 2);
}

#[test]
fn compiling_with_no_inputs_is_an_error() {
    let mut driver = Driver::new();
    let empty: Vec<PathBuf> = Vec::new();
    assert!(driver.compile(&empty).is_err());
}
