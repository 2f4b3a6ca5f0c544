use std::path::PathBuf;
use crate::cli::commands::ValidateArgs;
use crate::config::parse_config;
use crate::errors::VulnsnipError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), VulnsnipError> {
    let path = PathBuf::from(&args.config);
    let config = parse_config(&path).await?;

    println!("Configuration is valid: {}", args.config);
    println!("  tracker backend:   {}", config.tracker.backend);
    println!("  hint directory:    {}", config.challenges.hint_dir.display());
    println!("  allowlisted cmds:  {}", config.debug_commands.allowlist.len());
    Ok(())
}
