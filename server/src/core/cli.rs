use clap::{Parser, Subcommand};

use super::constants::{ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "learnloop")]
#[command(version, about = "School management API server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the API server (default)
    Start,
    /// Insert or refresh the demo accounts and classes
    Seed,
}

/// Parsed CLI configuration passed into `AppConfig::load`
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Parse command-line arguments
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
    };
    (config, cli.command)
}
