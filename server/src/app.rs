//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::data::{seed, Database, MaterialStore};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub database: Arc<Database>,
    pub auth: Arc<AuthManager>,
    pub files: MaterialStore,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::info!("{} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Seed) => {
                let app = Self::init(&cli_config).await?;
                seed::seed(app.database.pool())
                    .await
                    .context("Seeding failed")?;
                app.database.close().await;
                Ok(())
            }
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;

        let database = Arc::new(
            Database::init(&config.database_path)
                .await
                .context("Failed to initialize database")?,
        );

        let auth = Arc::new(AuthManager::new(&config.auth));
        let files = MaterialStore::new(config.upload_dir.clone());
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            database,
            auth,
            files,
        })
    }

    async fn start_server(app: CoreApp) -> Result<()> {
        let server = ApiServer::new(app);
        server.start().await?;
        Ok(())
    }

    fn init_logging() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env(ENV_LOG)
            .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
