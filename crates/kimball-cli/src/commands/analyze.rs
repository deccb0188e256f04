//! Analyze command - build a dimensional model from a directory of tables.

use std::path::PathBuf;

use colored::Colorize;
use kimball::quality::Severity;
use kimball::{BronzeStore, Kimball, KimballConfig};

pub fn run(
    dir: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    threshold: Option<f64>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()).into());
    }

    let mut config = match config_path {
        Some(path) => KimballConfig::from_file(&path)?,
        None => KimballConfig::default(),
    };
    if let Some(t) = threshold {
        if !(0.0..=1.0).contains(&t) {
            return Err(format!("Threshold must be between 0 and 1, got {}", t).into());
        }
        config.discovery.confidence_threshold = t;
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        dir.display().to_string().white()
    );

    let store = BronzeStore::from_dir(&dir, config.store.clone())?;
    println!("Loaded {} tables", store.len().to_string().white().bold());

    let build = Kimball::with_config(config).build(&store);

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for table in build.tables.iter().filter(|t| t.is_ok()) {
            println!("  {}", table.table.white().bold());
            for col in &table.columns {
                println!(
                    "    {:24} {:10} {:10} {:.2}",
                    col.name(),
                    col.column_type.to_string(),
                    col.classification.classification.as_str(),
                    col.classification.confidence
                );
            }
        }
    }

    println!();
    println!(
        "Found {} relationships, {} hierarchies",
        build.relationships.len().to_string().white().bold(),
        build.hierarchies.len().to_string().white().bold()
    );

    if verbose {
        for rel in &build.relationships {
            println!(
                "  {}.{} ↔ {}.{} ({}, {:.2})",
                rel.table1,
                rel.column1,
                rel.table2,
                rel.column2,
                rel.relationship_type.as_str(),
                rel.confidence
            );
        }
    }

    let facts = build.fact_recommendations().count();
    let dimensions = build.dimension_recommendations().count();
    println!(
        "Recommended {} fact tables, {} dimension tables",
        facts.to_string().green().bold(),
        dimensions.to_string().blue().bold()
    );
    for rec in &build.recommendations {
        let label = if rec.is_fact() {
            rec.recommended_name.green()
        } else {
            rec.recommended_name.blue()
        };
        println!("  {} ← {}", label, rec.source_table);
        if let Some(k_table) = &rec.k_table {
            println!(
                "    {} joins {} dimensions ({} columns)",
                k_table.name.cyan(),
                k_table.joins.len(),
                k_table.columns.len()
            );
            for key in &k_table.unresolved_keys {
                println!("    {} {}", "unresolved key:".yellow(), key);
            }
        }
    }

    if let Some(quality) = &build.quality {
        let high = quality
            .issues
            .iter()
            .filter(|i| i.severity == Severity::High)
            .count();
        println!();
        println!(
            "Data quality score: {:.0}% ({} issues, {} high)",
            quality.overall_score * 100.0,
            quality.issues.len(),
            high.to_string().red()
        );
    }

    for warning in &build.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }

    let output_path = output.unwrap_or_else(|| dir.join("kimball_model.json"));
    build.save(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    if let Some(failure) = &build.failure {
        return Err(format!("Build stopped at {}: {}", build.stage, failure).into());
    }

    Ok(())
}
