//! Infer command - type inference and classification for one column.

use std::collections::HashSet;

use colored::Colorize;
use kimball::{ColumnProfile, Kimball};

pub fn run(
    column: String,
    values: Vec<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let non_null: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    let cardinality = non_null.iter().collect::<HashSet<_>>().len();
    let null_count = values.len() - non_null.len();

    let profile = ColumnProfile::new("input", &column, "String", cardinality, null_count, values.len())
        .with_samples(values.iter().cloned());
    let analysis = Kimball::new().analyze_column(profile);

    if json_output {
        let output = serde_json::json!({
            "column": column,
            "column_type": analysis.column_type,
            "inference": analysis.inference,
            "classification": analysis.classification,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let inference = &analysis.inference;
    let classification = &analysis.classification;

    println!("{} {}", "Column".cyan().bold(), column.white());
    println!();
    println!(
        "Type:           {} ({:.0}% confidence)",
        analysis.column_type.to_string().white().bold(),
        inference.confidence * 100.0
    );
    if let Some(pattern) = &inference.pattern_matched {
        println!("Pattern:        {}", pattern);
    }
    println!("Reasoning:      {}", inference.reasoning);
    println!(
        "Classification: {} ({:.0}% confidence)",
        classification.classification.as_str().white().bold(),
        classification.confidence * 100.0
    );
    for reason in &classification.reasoning {
        println!("  - {}", reason);
    }
    if classification.is_primary_key_candidate {
        println!("{}", "Primary key candidate".green());
    }
    println!("Quality score:  {:.2}", classification.quality_score);

    Ok(())
}
