//! Benchmarks for the corvid parser.
//!
//! Run with: `cargo bench --package corvid-parser`

use std::sync::Arc;

use corvid_parser::parser::Parser;
use corvid_source::types::{FileID, SourceManager};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SIMPLE_FUNCTION: &str = r"
func add(a: int, b: int) -> int {
    return a + b;
}
";

const FIBONACCI: &str = r"
func fibonacci(n: int) -> int {
    if (n <= 1) {
        return n;
    } else {
        return fibonacci(n - 1) + fibonacci(n - 2);
    }
}
";

const CLASS_DEFINITION: &str = r"
class Point {
    x: double;
    y: double;

    func Point(x: double, y: double) {
        this.x = x;
        this.y = y;
    }

    func distance(other: Point) -> double {
        var dx: double = this.x - other.x;
        var dy: double = this.y - other.y;
        return sqrt(dx * dx + dy * dy);
    }
}
";

const COMPLEX_EXPRESSIONS: &str = r"
func compute(a: int, b: int, c: int, d: int, e: int, f: int, g: int, x: int, y: int, z: int, w: int) -> int {
    var result: int = ((a + b) * (c - d) / e) + f % g;
    var condition: bool = (x > 0 && y < 100) || (z == 42 && w != 0);
    return result;
}
";

const CONTROL_FLOW: &str = r"
func process(items: int[], count: int) -> void {
    for (i in items) {
        if (i > 0) {
            if (i % 2 == 0) {
                continue;
            } else {
                break;
            }
        } else if (i < 0) {
            continue;
        } else {
            break;
        }
    }

    while (count > 0) {
        count = count - 1;
    }
}
";

const COMPREHENSIVE: &str = r"
module demo.processor;

import demo.util.*;

class DataProcessor {
    data: int[];
    cache: int[];

    func DataProcessor(data: int[]) {
        this.data = data;
    }

    func process() -> int {
        var result: int = 0;
        for (value in this.data) {
            result = result + this._compute(value);
        }
        return result;
    }

    func _compute(n: int) -> int {
        if (n <= 1) {
            return n;
        }
        return this._compute(n - 1) + this._compute(n - 2);
    }
}

func main() -> int {
    var processor: DataProcessor = snew DataProcessor(items);
    var result: int = processor.process();
    return result;
}
";

fn parse(source: &str) {
    let source_manager = Arc::new(SourceManager::new());
    let parser = Parser::new(black_box(source), FileID::new(1), source_manager);
    let (_file, _decls, _reporter) = parser.parse_file();
}

fn bench_simple_function(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_simple_function", |bencher| {
        bencher.iter(|| parse(SIMPLE_FUNCTION));
    });
}

fn bench_fibonacci(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_fibonacci", |bencher| {
        bencher.iter(|| parse(FIBONACCI));
    });
}

fn bench_class_definition(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_class_definition", |bencher| {
        bencher.iter(|| parse(CLASS_DEFINITION));
    });
}

fn bench_complex_expressions(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_complex_expressions", |bencher| {
        bencher.iter(|| parse(COMPLEX_EXPRESSIONS));
    });
}

fn bench_control_flow(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_control_flow", |bencher| {
        bencher.iter(|| parse(CONTROL_FLOW));
    });
}

fn bench_comprehensive(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_comprehensive");
    let _ = group.throughput(Throughput::Bytes(COMPREHENSIVE.len() as u64));
    let _ = group.bench_function("comprehensive", |bencher| {
        bencher.iter(|| parse(COMPREHENSIVE));
    });
    group.finish();
}

fn bench_scaling(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_scaling");

    for size in &[10, 50, 100, 500] {
        let code = (0..*size).fold(String::new(), |acc, idx| {
            format!("{acc}\nfunc func_{idx}(x: int) -> int {{ return x * {idx}; }}\n")
        });

        let _ = group.throughput(Throughput::Bytes(code.len() as u64));
        let _ = group.bench_with_input(BenchmarkId::from_parameter(size), &code, |bencher, code| {
            bencher.iter(|| parse(code));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_function,
    bench_fibonacci,
    bench_class_definition,
    bench_complex_expressions,
    bench_control_flow,
    bench_comprehensive,
    bench_scaling,
);
criterion_main!(benches);
