use crate::domain::model::LanguageCode;
use crate::utils::error::{Result, SpmError};
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "spm-client")]
#[command(about = "Sport Performance Metrics client: wger exercises and the SPM backend")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 從 wger 取得運動列表
    Exercises {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        language: Option<LanguageCode>,
    },
    /// 以 Karvonen 公式計算心率區間
    HrZones {
        #[arg(long, conflicts_with = "age")]
        max_hr: Option<u32>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        resting_hr: u32,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    #[command(subcommand)]
    Athletes(AthleteCommand),
    #[command(subcommand)]
    Coaches(CoachCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum AthleteCommand {
    List,
    Get { id: i64 },
    Basic { id: i64 },
    ByUser { user_id: i64 },
    Dashboard { user_id: i64 },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CoachCommand {
    List,
    Get { id: i64 },
    Dashboard { user_id: i64 },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Exercises {
                limit: Some(limit), ..
            } => validation::validate_positive_number("limit", *limit, 1),
            Command::HrZones {
                max_hr: None,
                age: None,
                ..
            } => Err(SpmError::MissingConfigError {
                field: "max_hr or age".to_string(),
            }),
            Command::Login { email, .. } => validation::validate_non_empty_string("email", email),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercises_command() {
        let cli = CliConfig::try_parse_from([
            "spm-client",
            "exercises",
            "--limit",
            "5",
            "--language",
            "1",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Exercises { limit, language } => {
                assert_eq!(limit, Some(5));
                assert_eq!(language, Some(LanguageCode::Id(1)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_limit_fails_validation() {
        let cli = CliConfig::try_parse_from(["spm-client", "exercises", "--limit", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_hr_zones_needs_max_hr_or_age() {
        let cli =
            CliConfig::try_parse_from(["spm-client", "hr-zones", "--resting-hr", "60"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = CliConfig::try_parse_from([
            "spm-client",
            "hr-zones",
            "--age",
            "30",
            "--resting-hr",
            "60",
        ])
        .unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_athlete_subcommand() {
        let cli = CliConfig::try_parse_from(["spm-client", "athletes", "by-user", "42"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Athletes(AthleteCommand::ByUser { user_id: 42 })
        ));
    }
}
