//! Bootstrap binary: initializes the database schema and the seed admin
//! account, then exits. The portal's transport layer runs against the same
//! database through the library crate.

use dotenvy::dotenv;
use sea_orm::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use workpoints::config::{database, settings};
use workpoints::core::account;
use workpoints::entities::Role;
use workpoints::errors::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    app_config.attendance.to_policy()?;
    info!("Configuration loaded.");

    // 4. Connect: DATABASE_URL wins over config.toml, which wins over the default
    let db = match std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| app_config.database_url.clone())
    {
        Some(url) => Database::connect(url).await?,
        None => database::create_connection().await?,
    };

    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Ensure the bootstrap admin exists
    if account::get_account_by_username(&db, &app_config.admin_username)
        .await?
        .is_none()
    {
        let admin = account::create_account(
            &db,
            app_config.admin_username.clone(),
            "Administrator".to_string(),
            Role::Admin,
        )
        .await?;
        info!(username = %admin.username, id = admin.id, "Seeded admin account.");
    } else {
        info!(username = %app_config.admin_username, "Admin account already present.");
    }

    Ok(())
}
