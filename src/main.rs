use std::env;

use config::Config;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use dotenvy::dotenv;

use factly::db::establish_connection_pool;
use factly::models::config::ServerConfig;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment, e.g. `APP__PORT=9000`
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize::<ServerConfig>()
}

fn run_migrations(database_url: &str) -> Result<(), String> {
    let pool = establish_connection_pool(database_url).map_err(|e| e.to_string())?;
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| e.to_string())?;
    if !applied.is_empty() {
        log::info!("Applied {} migrations", applied.len());
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_migrations(&server_config.database_url) {
        log::error!("Failed to run database migrations: {err}");
        std::process::exit(1);
    }

    factly::run(server_config).await
}
