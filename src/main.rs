use anyhow::Result;
use clap::Parser;

use idv_register::cli::commands::detect::DetectTextCommand;
use idv_register::cli::commands::init_config::InitConfigCommand;
use idv_register::cli::commands::register::RegisterCommand;
use idv_register::cli::{Cli, Commands};
use idv_register::config::RegistrationConfig;
use idv_register::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    RegistrationConfig::load_env_file()?;
    let config = match &cli.config {
        Some(path) => RegistrationConfig::load_from(path)?,
        None => RegistrationConfig::load()?,
    };
    init_telemetry(&config.observability)?;

    match cli.command {
        Commands::DetectText { id_card } => tokio::runtime::Runtime::new()?
            .block_on(async { DetectTextCommand::new(id_card).execute(&config).await }),
        Commands::Register {
            user_id,
            first_name,
            last_name,
            dob,
            selfie,
            id_card_capture,
            id_card_upload,
        } => tokio::runtime::Runtime::new()?.block_on(async {
            RegisterCommand {
                user_id,
                first_name,
                last_name,
                dob,
                selfie,
                id_card_capture,
                id_card_upload,
            }
            .execute(&config)
            .await
        }),
        Commands::InitConfig { path, force } => InitConfigCommand { path, force }.execute(),
    }
}
