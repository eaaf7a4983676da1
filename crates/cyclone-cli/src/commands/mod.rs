//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cyclone_redis::{Cyclone, CycloneConfig};

pub mod hash;
pub mod list;

/// Cyclone - typed Redis hash and list commands
#[derive(Parser)]
#[command(name = "cyclone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Redis URL (defaults to redis://127.0.0.1:6379)
    #[arg(long, env = "REDIS_URL", global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hash commands (HGET, HSET, HSCAN, ...)
    Hash(hash::HashArgs),

    /// List commands (LPUSH, LRANGE, LREM, ...)
    List(list::ListArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = CycloneConfig::from_env()?;
        if let Some(url) = self.url {
            config.url = url;
        }
        let cyclone = Cyclone::connect(&config)
            .await
            .with_context(|| format!("Failed to connect to {}", config.url))?;

        match self.command {
            Commands::Hash(args) => hash::execute(args, &cyclone).await,
            Commands::List(args) => list::execute(args, &cyclone).await,
        }
    }
}

/// Split `field=value` arguments.
pub(crate) fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("a=1").unwrap(), ("a".to_string(), "1".to_string()));
        assert_eq!(parse_pair("a=").unwrap(), ("a".to_string(), String::new()));
        assert_eq!(parse_pair("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert!(parse_pair("=1").is_err());
        assert!(parse_pair("novalue").is_err());
    }

    #[test]
    fn test_parses_hash_scan() {
        let cli = Cli::try_parse_from([
            "cyclone", "--url", "redis://h:1", "hash", "users", "scan", "--match", "2*",
            "--count", "50", "--pairs",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("redis://h:1"));
        match cli.command {
            Commands::Hash(args) => {
                assert_eq!(args.key, "users");
                match args.command {
                    hash::HashCommands::Scan(scan) => {
                        assert_eq!(scan.pattern.as_deref(), Some("2*"));
                        assert_eq!(scan.count, 50);
                        assert!(scan.pairs);
                    }
                    _ => panic!("expected scan"),
                }
            }
            _ => panic!("expected hash"),
        }
    }

    #[test]
    fn test_parses_negative_list_offsets() {
        let cli = Cli::try_parse_from(["cyclone", "list", "jobs", "range", "0", "-1"]).unwrap();
        match cli.command {
            Commands::List(args) => match args.command {
                list::ListCommands::Range { start, stop } => {
                    assert_eq!(start, 0);
                    assert_eq!(stop, -1);
                }
                _ => panic!("expected range"),
            },
            _ => panic!("expected list"),
        }
    }
}
