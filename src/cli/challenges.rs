use std::path::PathBuf;
use crate::challenge::ChallengeCatalog;
use crate::cli::commands::ChallengesArgs;
use crate::config::load_config;
use crate::errors::VulnsnipError;

fn format_lines(lines: &std::collections::BTreeSet<u32>) -> String {
    if lines.is_empty() {
        return "-".to_string();
    }
    lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(",")
}

pub async fn handle_challenges(args: ChallengesArgs) -> Result<(), VulnsnipError> {
    let config_path = args.config.as_ref().map(PathBuf::from);
    let config = load_config(config_path.as_deref()).await?;
    let catalog = ChallengeCatalog::from_sources(config.challenges.source_dirs.clone());
    let records = catalog.records().await?;

    if args.json {
        let summary: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                serde_json::json!({
                    "key": r.key,
                    "lines": r.line_count(),
                    "vulnLines": r.vuln_lines,
                    "neutralLines": r.neutral_lines,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No code challenges found.");
        return Ok(());
    }

    let width = records.iter().map(|r| r.key.len()).max().unwrap_or(0).max(3);
    println!("{:<width$}  {:>5}  {:<12}  NEUTRAL", "KEY", "LINES", "VULNERABLE", width = width);
    for r in records {
        println!(
            "{:<width$}  {:>5}  {:<12}  {}",
            r.key,
            r.line_count(),
            format_lines(&r.vuln_lines),
            format_lines(&r.neutral_lines),
            width = width
        );
    }
    Ok(())
}
