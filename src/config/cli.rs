use crate::app::enrichment::MAX_TEAM_NAMES;
use crate::utils::error::{RaffleError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "raffle-kit")]
#[command(about = "Raffle drawing and random group assignment for a name list")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Seed the random generator for reproducible draws and groupings
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Draw winners from the roster
    Draw(DrawArgs),
    /// Shuffle the roster into fixed-size groups
    Group(GroupArgs),
    /// Report duplicate names and print the deduplicated roster
    Dedupe(RosterArgs),
    /// Suggest team names
    TeamNames(TeamNamesArgs),
    /// Interactive session reading commands from stdin
    Session(RosterArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RosterArgs {
    /// Name list files (.csv is comma/newline separated, others one per line)
    #[arg(short, long = "input")]
    pub inputs: Vec<String>,

    /// Names given directly, repeatable
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Add the built-in sample roster
    #[arg(long)]
    pub sample: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DrawArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Number of draws to make
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Allow the same entry to win more than once
    #[arg(long)]
    pub allow_repeat: bool,

    /// Congratulation template using {name}, or a style hint with --ai
    #[arg(long)]
    pub template: Option<String>,

    /// Ask the text generation service for the congratulation
    #[arg(long)]
    pub ai: bool,

    /// Skip the rolling names effect
    #[arg(long)]
    pub no_animation: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GroupArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Members per group, clamped to 2..=20
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Theme used in group names
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Write the groups to a CSV file
    #[arg(long)]
    pub export: bool,

    /// Directory for exported files
    #[arg(long)]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TeamNamesArgs {
    #[arg(short = 'n', long, default_value = "4")]
    pub count: usize,

    #[arg(short, long, default_value = "cool")]
    pub theme: String,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
        }
        match &self.command {
            Command::Draw(args) => {
                if args.count == 0 {
                    return Err(RaffleError::InvalidConfigValueError {
                        field: "count".to_string(),
                        value: "0".to_string(),
                        reason: "At least one draw is required".to_string(),
                    });
                }
                if let Some(template) = &args.template {
                    validation::validate_non_empty_string("template", template)?;
                }
            }
            Command::Group(args) => {
                if let Some(theme) = &args.theme {
                    validation::validate_non_empty_string("theme", theme)?;
                }
                if let Some(path) = &args.output_path {
                    validation::validate_path("output_path", path)?;
                }
            }
            Command::TeamNames(args) => {
                validation::validate_range("count", args.count, 1, MAX_TEAM_NAMES)?;
            }
            Command::Dedupe(_) | Command::Session(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draw_command() {
        let cli = CliConfig::parse_from([
            "raffle-kit", "--seed", "5", "draw", "--name", "a", "--name", "b", "-n", "2", "--allow-repeat",
        ]);
        assert_eq!(cli.seed, Some(5));
        match cli.command {
            Command::Draw(args) => {
                assert_eq!(args.roster.names, vec!["a", "b"]);
                assert_eq!(args.count, 2);
                assert!(args.allow_repeat);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_draws_rejected() {
        let cli = CliConfig::parse_from(["raffle-kit", "draw", "--sample", "-n", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_group_command_defaults() {
        let cli = CliConfig::parse_from(["raffle-kit", "group", "-i", "names.txt"]);
        match &cli.command {
            Command::Group(args) => {
                assert_eq!(args.roster.inputs, vec!["names.txt"]);
                assert!(args.size.is_none());
                assert!(!args.export);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.validate().is_ok());
    }
}
