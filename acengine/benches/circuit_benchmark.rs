use acengine::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Alternating product and sum layers, each gate reading four nodes of the
/// previous layer. Every sixteenth variable is zero so that
/// product gates hit the zero handling of both rules.
fn layered_source(variables: usize, layers: usize) -> String {
    let mut source = String::from("(\n");
    for id in 0..variables {
        let value = if id % 16 == 0 { 0.0 } else { 1.0 + id as f64 / 1000.0 };
        source.push_str(&format!("v {} {}\n", id, value));
    }
    let mut start = 0;
    let width = variables;
    for layer in 0..layers {
        let op = if layer % 2 == 0 { '*' } else { '+' };
        for g in 0..width {
            let children: Vec<String> = (0..4)
                .map(|j| (start + (g + j * 7) % width).to_string())
                .collect();
            source.push_str(&format!("{} {}\n", op, children.join(" ")));
        }
        start += width;
    }
    let root: Vec<String> = (start..start + width).map(|i| i.to_string()).collect();
    let top = start + width;
    source.push_str(&format!("+ {}\nn 1.0\n+ {} {}\nE\n", root.join(" "), top, top + 1));
    source
}

fn circuit_benchmark(c: &mut Criterion) {
    let source = layered_source(256, 8);

    c.bench_function("build layered circuit", |b| {
        b.iter(|| black_box(Circuit::try_from(source.as_str()).unwrap()))
    });

    for strategy in [Strategy::Cache, Strategy::Flag] {
        let engine = Engine::new(EngineConfig::new().with_strategy(strategy));
        let mut circuit = Circuit::try_from(source.as_str()).unwrap();
        c.bench_function(&format!("forward and backward ({})", strategy), |b| {
            b.iter(|| black_box(engine.run(&mut circuit).unwrap()))
        });
    }
}

criterion_group!(benches, circuit_benchmark);
criterion_main!(benches);
