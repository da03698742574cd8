/// Benchmark for catalog command execution
///
/// Measures how fast a full schema can be built from a command log, how fast
/// it serializes back out, and how long a diff between two versions takes.
use schemacat::{diff, Catalog};
use std::time::Instant;

const DB: &str = "/clusters#cluster/databases#database";

fn schema_batch(tables: usize, columns: usize) -> String {
    let mut lines = vec![
        "add / clusters cluster".to_string(),
        "add /clusters#cluster databases database".to_string(),
    ];
    for t in 0..tables {
        let table = format!("{}/tables#T{}", DB, t);
        lines.push(format!("add {} tables T{}", DB, t));
        lines.push(format!("set {} isreplicated {}", table, t % 2 == 0));
        lines.push(format!("set $PREV partitioncolumn {}/columns#C0", table));
        for c in 0..columns {
            lines.push(format!("add {} columns C{}", table, c));
            lines.push(format!("set {}/columns#C{} index {}", table, c, c));
            lines.push("set $PREV nullable false".to_string());
        }
    }
    lines.join("\n")
}

fn main() {
    println!("=== Catalog Execute Throughput Benchmark ===\n");

    let batch = schema_batch(200, 20);
    let commands = batch.lines().count();
    println!("📋 Setup: {} commands for 200 tables x 20 columns\n", commands);

    println!("📊 Benchmark: execute full command log");
    let iterations = 20;
    let start = Instant::now();
    let mut catalog = Catalog::new();
    for _ in 0..iterations {
        catalog = Catalog::new();
        catalog.execute(&batch).expect("Failed to execute batch");
    }
    let duration = start.elapsed();
    let per_sec = (iterations * commands) as f64 / duration.as_secs_f64();
    println!("  Iterations: {}", iterations);
    println!("  Time: {:?}", duration);
    println!("  Throughput: {:.0} commands/sec", per_sec);
    println!("  Nodes: {}", catalog.node_count());
    println!();

    println!("📊 Benchmark: serialize");
    let start = Instant::now();
    let mut bytes = 0;
    for _ in 0..iterations {
        bytes = catalog.serialize().len();
    }
    let duration = start.elapsed();
    println!("  Iterations: {}", iterations);
    println!("  Time: {:?}", duration);
    println!("  Output: {} bytes", bytes);
    println!();

    println!("📊 Benchmark: diff after dropping half the tables");
    let mut changed = Catalog::new();
    changed.execute(&batch).expect("Failed to execute batch");
    let deletes: Vec<String> = (0..100)
        .map(|t| format!("delete {} tables T{}", DB, t * 2))
        .collect();
    changed
        .execute(&deletes.join("\n"))
        .expect("Failed to delete tables");
    changed.purge_deletions().expect("Failed to purge");

    let start = Instant::now();
    let result = diff(&catalog, &changed);
    println!("  Time: {:?}", start.elapsed());
    println!(
        "  Deletions: {}, additions: {}, updates: {}",
        result.deletions, result.additions, result.updates
    );
}
