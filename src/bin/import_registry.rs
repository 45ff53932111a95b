//! Loads a JSON export of existing clients into the matching registry.
//!
//! Usage: `import_registry <export.json>`. Clients already present are
//! skipped with a warning.

use std::env;
use std::fs;

use config::Config;
use dotenvy::dotenv;
use serde::Deserialize;

use forest_client_match::db::establish_connection_pool;
use forest_client_match::domain::registry::{
    RegisteredClient, RegisteredContact, RegisteredLocation,
};
use forest_client_match::models::config::ServerConfig;
use forest_client_match::repository::errors::{RepositoryError, RepositoryResult};
use forest_client_match::repository::{ClientRegistryWriter, DieselRepository};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegistryExport {
    clients: Vec<RegisteredClient>,
    locations: Vec<RegisteredLocation>,
    contacts: Vec<RegisteredContact>,
}

fn import<R>(repo: &R, export: &RegistryExport) -> RepositoryResult<usize>
where
    R: ClientRegistryWriter,
{
    let mut imported = 0;
    for client in &export.clients {
        match repo.create_client(client) {
            Ok(()) => imported += 1,
            Err(RepositoryError::ConstraintViolation(message)) => {
                log::warn!("Skipping client {}: {message}", client.client_number);
            }
            Err(e) => return Err(e),
        }
    }
    for location in &export.locations {
        repo.create_location(location)?;
    }
    for contact in &export.contacts {
        repo.create_contact(contact)?;
    }
    Ok(imported)
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let Some(path) = env::args().nth(1) else {
        log::error!("Usage: import_registry <export.json>");
        std::process::exit(1);
    };

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let server_config = match settings.and_then(|s| s.try_deserialize::<ServerConfig>()) {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let export: RegistryExport = match fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
    {
        Ok(export) => export,
        Err(err) => {
            log::error!("Cannot read registry export {path}: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    match import(&repo, &export) {
        Ok(imported) => log::info!(
            "Imported {imported} clients, {} locations and {} contacts",
            export.locations.len(),
            export.contacts.len()
        ),
        Err(e) => {
            log::error!("Registry import failed: {e}");
            std::process::exit(1);
        }
    }
}
