use clap::Parser;
use serde::Serialize;
use spm_client::config::{AthleteCommand, CoachCommand, Command};
use spm_client::utils::validation::{self, Validate};
use spm_client::utils::logger;
use spm_client::{
    calculate_hr_zones, max_heart_rate, BackendClient, CliConfig, ExerciseFetcher,
    ExerciseSource, ListingRequest, Result, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting spm-client");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ spm-client failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig> {
    let config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: CliConfig) -> Result<()> {
    cli.validate()?;
    let config = load_config(&cli)?;

    match cli.command {
        Command::Exercises { limit, language } => {
            let request = ListingRequest::new(
                limit.unwrap_or_else(|| config.default_limit()),
                language.unwrap_or_else(|| config.default_language()),
            )?;
            let fetcher = ExerciseFetcher::new(config.fetcher_config())?;
            let outcome = fetcher.fetch_outcome(&request).await;
            print_json(&outcome)?;
            outcome.ensure_success()?;
        }
        Command::HrZones {
            max_hr,
            age,
            resting_hr,
        } => {
            let max_hr = match max_hr {
                Some(max_hr) => max_hr,
                None => max_heart_rate(*validation::validate_required_field("age", &age)?)?,
            };
            print_json(&calculate_hr_zones(max_hr, resting_hr)?)?;
        }
        Command::Login { email, password } => {
            let backend = backend_client(&config)?;
            print_json(&backend.login(&email, &password).await?)?;
            tracing::info!("✅ Login succeeded for {}", email);
        }
        Command::Athletes(command) => {
            let backend = backend_client(&config)?;
            let value = match command {
                AthleteCommand::List => backend.list_athletes().await?,
                AthleteCommand::Get { id } => backend.get_athlete(id).await?,
                AthleteCommand::Basic { id } => backend.athlete_basic(id).await?,
                AthleteCommand::ByUser { user_id } => backend.athlete_by_user(user_id).await?,
                AthleteCommand::Dashboard { user_id } => {
                    backend.athlete_dashboard(user_id).await?
                }
            };
            print_json(&value)?;
        }
        Command::Coaches(command) => {
            let backend = backend_client(&config)?;
            let value = match command {
                CoachCommand::List => backend.list_coaches().await?,
                CoachCommand::Get { id } => backend.get_coach(id).await?,
                CoachCommand::Dashboard { user_id } => backend.coach_dashboard(user_id).await?,
            };
            print_json(&value)?;
        }
    }

    Ok(())
}

fn backend_client(config: &TomlConfig) -> Result<BackendClient> {
    BackendClient::new(&config.backend.base_url, config.backend_timeout())
}
