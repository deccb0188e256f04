//! Example: Build a dimensional model from a directory of bronze files.
//!
//! Usage:
//!   cargo run --example analyze -- <dir>
//!
//! Every `.csv`, `.tsv` and `.txt` file in the directory becomes one table.

use std::env;
use std::path::Path;

use kimball::{BronzeStore, Kimball, KimballConfig};

fn main() -> kimball::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <dir>");
        std::process::exit(1);
    }

    let dir = Path::new(&args[1]);
    if !dir.is_dir() {
        eprintln!("Error: Not a directory: {}", dir.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("KIMBALL Model Build: {}", dir.display());
    println!("{}", separator);
    println!();

    let config = KimballConfig::default();
    let store = BronzeStore::from_dir(dir, config.store.clone())?;
    let build = Kimball::with_config(config).build(&store);

    println!("## Tables ({} total)", build.tables.len());
    println!();
    for table in &build.tables {
        if let Some(error) = &table.error {
            println!("  {:20} FAILED: {}", table.table, error);
            continue;
        }
        println!("  {} ({} rows)", table.table, table.row_count);
        for col in &table.columns {
            println!(
                "    {:24} {:10} {:10} conf={:.2} pk={}",
                col.name(),
                col.column_type.as_str(),
                col.classification.classification.as_str(),
                col.classification.confidence,
                col.is_primary_key_candidate()
            );
        }
    }
    println!();

    println!("## Relationships ({} total)", build.relationships.len());
    for rel in &build.relationships {
        println!(
            "  {}.{} <-> {}.{} {} ({:.0}%)",
            rel.table1,
            rel.column1,
            rel.table2,
            rel.column2,
            rel.relationship_type.as_str(),
            rel.confidence * 100.0
        );
    }
    println!();

    println!("## Hierarchies ({} total)", build.hierarchies.len());
    for hierarchy in &build.hierarchies {
        println!("  {}: {}", hierarchy.table, hierarchy.column_names().join(" > "));
    }
    println!();

    println!("## Recommendations");
    for rec in &build.recommendations {
        println!(
            "  {} {} <- {}",
            rec.table_type.as_str(),
            rec.recommended_name,
            rec.source_table
        );
        if let Some(k_table) = &rec.k_table {
            println!(
                "    K-table {}: {} joins, {} columns",
                k_table.name,
                k_table.joins.len(),
                k_table.columns.len()
            );
            if !k_table.unresolved_keys.is_empty() {
                println!("    unresolved keys: {}", k_table.unresolved_keys.join(", "));
            }
        }
    }
    println!();

    if let Some(quality) = &build.quality {
        println!("## Quality");
        println!("  Overall score: {:.1}%", quality.overall_score * 100.0);
        println!("  Issues: {}", quality.issues.len());
        for rec in &quality.recommendations {
            println!("  [{}] {}", rec.priority.label(), rec.title);
        }
        println!();
    }

    if let Some(failure) = &build.failure {
        println!("Stopped at {}: {}", build.stage, failure);
    }
    println!("{}", separator);

    Ok(())
}
