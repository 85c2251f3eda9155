//! Building the config used for a launch: first-time setup or role
//! reselection on top of a saved record.

use crate::catalog::{Model, ModelFetchError, ModelSource};
use crate::endpoint::DEFAULT_BASE_URL;
use crate::prompt::{required_input, required_password, PromptError, Prompter};
use crate::selector::{catalog_overview, select_roles};
use crate::style;
use config::{Config, ConfigStore, FileSystem, RoleAssignment};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Fetch(#[from] ModelFetchError),
    #[error("no models available, check the base URL and API key")]
    EmptyCatalog,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("failed to save the configuration: {0:#}")]
    Save(anyhow::Error),
}

/// Loads the saved record and reselects its roles, or runs first-time setup
/// when there is nothing usable on disk. The result is saved before it is
/// returned.
pub fn prepare_config<F: FileSystem>(
    store: &ConfigStore<F>,
    source: &dyn ModelSource,
    prompter: &mut dyn Prompter,
) -> Result<Config, SetupError> {
    let (connection, previous) = match store.load() {
        Some(existing) => {
            println!(
                "{}",
                style::blue("Found an existing configuration, selecting models...")
            );
            let roles = existing.roles();
            (existing, Some(roles))
        }
        None => {
            println!(
                "{}",
                style::blue("No configuration found, starting first-time setup...")
            );
            (ask_connection(prompter)?, None)
        }
    };

    let models = fetch_catalog(source, &connection)?;
    println!("{}", style::blue("\nChoose the default models:"));
    let roles = select_roles(prompter, &models, previous.as_ref())?;

    let config = connection.with_roles(roles);
    debug_assert!(config.is_complete(), "every role must be bound before saving");
    store.save(&config).map_err(SetupError::Save)?;
    log::info!("saved configuration to {}", store.path().display());
    Ok(config)
}

fn ask_connection(prompter: &mut dyn Prompter) -> Result<Config, SetupError> {
    println!("{}", style::blue("Claude Code first-time setup"));
    println!("{}", style::rule(40));

    let base_url = required_input(
        prompter,
        "API base URL:",
        Some(DEFAULT_BASE_URL),
        "The base URL cannot be empty",
    )?;
    let auth_token = required_password(prompter, "API key:", "The API key cannot be empty")?;

    Ok(Config::new(base_url, auth_token, RoleAssignment::default()))
}

fn fetch_catalog(source: &dyn ModelSource, connection: &Config) -> Result<Vec<Model>, SetupError> {
    println!("{}", style::yellow("\nFetching available models..."));
    let models = source.fetch_models(&connection.base_url, &connection.auth_token)?;
    if models.is_empty() {
        return Err(SetupError::EmptyCatalog);
    }

    println!("{}", style::green("\nAvailable models:"));
    for line in catalog_overview(&models) {
        println!("{line}");
    }
    Ok(models)
}
