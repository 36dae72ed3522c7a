use clap::Parser;
use flexi_logger::{Age, Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use crate::{
    api::account::Registration,
    core::{
        cli::{CategoryCommand, Cli, Command, ProductCommand},
        configuration::{get_configuration, Configuration},
        core as commands,
        logger::IgnoreReqwest,
    },
};

mod api;
mod core;

const DEFAULT_CONFIGURATION_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let configuration_file = match &cli.configuration_file {
        Some(c) => c.to_owned(),
        None => DEFAULT_CONFIGURATION_FILE.to_string(),
    };

    let conf = get_configuration(configuration_file).await?;

    conf.assert_data_dir_permissions().map_err(String::from)?;

    if conf.assert_api_url_is_not_empty().is_err() {
        return Err("api url is missing from the configuration".into());
    }

    let _logger = init_logger(&conf, cli.verbosity)?;

    match cli.command {
        Command::Login {
            username,
            password,
            remember,
        } => {
            commands::login(&conf, username, password, remember).await?;
        }
        Command::Logout => {
            commands::logout(&conf).await?;
        }
        Command::Menu => {
            commands::menu(&conf).await?;
        }
        Command::SessionDiagnostic { show_token } => {
            let show_token = show_token.unwrap_or(false);

            commands::session_diagnostic(&conf, show_token).await?;
        }
        Command::RegisterAccount {
            username,
            first_name,
            last_name,
            birth_date,
            address,
            city,
            zip_code,
            email,
            phone_number,
            password,
            admin,
        } => {
            let registration = Registration {
                user_name: username,
                first_name,
                last_name,
                birth_date,
                address,
                city,
                zip_code,
                email,
                phone_number,
                password,
                admin,
            };

            commands::register_account(&conf, registration).await?;
        }
        Command::Product { command } => match command {
            ProductCommand::Search { name, sku } => {
                commands::search_product(&conf, name, sku).await?;
            }
            ProductCommand::Create {
                name,
                sku,
                description,
                image_url,
                price,
            } => {
                commands::create_product(&conf, name, sku, description, image_url, price).await?;
            }
            ProductCommand::Update {
                sku,
                name,
                description,
                image_url,
                price,
            } => {
                commands::update_product(&conf, sku, name, description, image_url, price).await?;
            }
            ProductCommand::Delete { sku } => {
                commands::delete_product(&conf, sku).await?;
            }
        },
        Command::Category { command } => match command {
            CategoryCommand::List => {
                commands::list_categories(&conf).await?;
            }
            CategoryCommand::Create { name } => {
                commands::create_category(&conf, name).await?;
            }
            CategoryCommand::Assign { category_id, sku } => {
                commands::assign_product(&conf, category_id, sku).await?;
            }
        },
    }

    Ok(())
}

fn init_logger(
    conf: &Configuration,
    verbosity: Option<log::LevelFilter>,
) -> Result<LoggerHandle, Box<dyn std::error::Error + Send + Sync>> {
    let level = match verbosity {
        Some(v) => v.to_string(),
        None => conf
            .log
            .level
            .to_owned()
            .unwrap_or_else(|| "info".to_string()),
    };

    let data_directory = conf
        .core
        .data_directory
        .to_owned()
        .unwrap_or_else(|| ".".to_string());

    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(data_directory)
                .basename(env!("CARGO_PKG_NAME")),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(conf.log.retention.unwrap_or(31)),
        )
        .filter(Box::new(IgnoreReqwest))
        .start()?;

    Ok(handle)
}
