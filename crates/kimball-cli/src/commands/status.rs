//! Status command - summarize a saved model build.

use std::path::PathBuf;

use colored::Colorize;
use kimball::ModelBuild;

pub fn run(
    file: PathBuf,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let model_path = if file.is_dir() {
        file.join("kimball_model.json")
    } else {
        file.clone()
    };

    if !model_path.exists() {
        return Err(format!(
            "Model build not found: {}\nRun 'kimball analyze <DIR>' first.",
            model_path.display()
        )
        .into());
    }

    let build = ModelBuild::load(&model_path)?;

    if json_output {
        let status = serde_json::json!({
            "stage": build.stage,
            "is_complete": build.is_complete(),
            "analyzed_at": build.analyzed_at,
            "summary": build.summary,
            "relationships": build.relationships.len(),
            "hierarchies": build.hierarchies.len(),
            "recommendations": {
                "facts": build.fact_recommendations().count(),
                "dimensions": build.dimension_recommendations().count(),
            },
            "quality_score": build.quality.as_ref().map(|q| q.overall_score),
            "failure": build.failure,
            "warnings": build.warnings.len(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Model build".cyan().bold(),
        model_path.display().to_string().white()
    );
    println!(
        "Analyzed at {}",
        build.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let stage = if build.is_complete() {
        build.stage.to_string().green()
    } else {
        build.stage.to_string().yellow()
    };
    println!("Stage: {}", stage);
    if let Some(failure) = &build.failure {
        println!("  {} {}", "stopped:".red(), failure);
    }
    println!();

    let summary = &build.summary;
    println!("{}", "Schema:".yellow().bold());
    println!("  Tables:            {}", summary.total_tables.to_string().white());
    if summary.failed_tables > 0 {
        println!("  Failed tables:     {}", summary.failed_tables.to_string().red());
    }
    println!("  Columns:           {}", summary.total_columns.to_string().white());
    println!(
        "  Fact columns:      {}",
        summary.total_fact_columns.to_string().green()
    );
    println!(
        "  Dimension columns: {}",
        summary.total_dimension_columns.to_string().blue()
    );
    println!();

    println!("{}", "Model:".yellow().bold());
    println!("  Relationships: {}", build.relationships.len());
    println!("  Hierarchies:   {}", build.hierarchies.len());
    for rec in &build.recommendations {
        let name = if rec.is_fact() {
            rec.recommended_name.green()
        } else {
            rec.recommended_name.blue()
        };
        println!("  {} ← {} ({} columns)", name, rec.source_table, rec.columns.len());

        if verbose {
            for col in &rec.columns {
                println!("      {:24} {}", col.name, col.description);
            }
        }
    }

    if let Some(quality) = &build.quality {
        println!();
        println!("{}", "Quality:".yellow().bold());
        println!("  Overall score: {:.0}%", quality.overall_score * 100.0);
        for rec in &quality.recommendations {
            println!("  [{}] {}", rec.priority.label(), rec.title);
        }
    }

    if !build.warnings.is_empty() {
        println!();
        println!("{} {}", "Warnings:".yellow().bold(), build.warnings.len());
        if verbose {
            for warning in &build.warnings {
                println!("  {}", warning);
            }
        }
    }

    Ok(())
}
