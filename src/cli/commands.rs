use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "vulnsnip", version, about = "Code-snippet challenge verification and allowlisted debug commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// List discovered code challenges
    Challenges(ChallengesArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[derive(Args, Clone)]
pub struct ChallengesArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
