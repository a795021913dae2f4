use std::path::PathBuf;

use clap::Parser;
use danglr_core::RunMode;

#[derive(Debug, Parser)]
#[command(name = "danglr", version)]
#[command(about = "Find and remove broken media symlinks", long_about = None)]
pub struct Cli {
    /// Delete broken symlinks (default is a dry run)
    #[arg(long)]
    pub execute: bool,

    /// Do not ask for confirmation before deleting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Configuration file
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "DANGLR_CONFIG",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    /// Print the configuration with secrets redacted and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        if self.execute {
            RunMode::Execute
        } else {
            RunMode::DryRun
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dry_run() {
        let cli = Cli::parse_from(["danglr"]);
        assert_eq!(cli.mode(), RunMode::DryRun);
        assert!(!cli.yes);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_execute_yes() {
        let cli = Cli::parse_from(["danglr", "--execute", "-y"]);
        assert_eq!(cli.mode(), RunMode::Execute);
        assert!(cli.yes);
    }

    #[test]
    fn test_config_flag_wins() {
        let cli = Cli::parse_from(["danglr", "-c", "/etc/danglr.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/danglr.toml"));
    }
}
