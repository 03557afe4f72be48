//! # Arena Server
//!
//! Back-office and consumer API for ArenaApp: listings for the seven entity
//! tables, accounts, favorites, image uploads and background translation of
//! Spanish content into English and Portuguese.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use arena_config::{Config, ConfigLoad, ConfigLoader};
use arena_core::{
    application::{AccountService, AppUnitOfWork},
    auth::{AuthCrypto, TokenIssuer},
    database::PostgresDatabase,
    storage,
    translation::AutoTranslator,
};
use arena_server::{AppState, create_app, infra::telemetry};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "arena-server")]
#[command(about = "ArenaApp back-office and consumer API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Create an admin account, or promote an existing one
    Create {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ARENA_ADMIN_PASSWORD")]
        password: String,
        #[arg(long, default_value = "Administrador")]
        nombre: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&cli.serve).await,
        Some(Command::Admin(AdminCommand::Create {
            email,
            password,
            nombre,
        })) => run_admin_create(&cli.serve, &email, &password, &nombre).await,
        None => run_server(cli.serve).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    telemetry::init_tracing();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn connect_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is not configured")?;
    PostgresDatabase::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let db = connect_database(&config).await?;
    db.initialize_schema()
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_admin_create(
    args: &ServeArgs,
    email: &str,
    password: &str,
    nombre: &str,
) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let db = connect_database(&config).await?;
    db.initialize_schema()
        .await
        .context("database migration failed")?;

    let crypto = AuthCrypto::new(&config.auth.password_pepper)
        .context("failed to initialise password hashing")?;
    let accounts = AccountService::new(
        Arc::new(db.users()),
        Arc::new(crypto),
        Arc::new(TokenIssuer::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl(),
        )),
    );

    let (user, created) = accounts
        .ensure_admin(email, password, nombre)
        .await
        .context("failed to create admin account")?;
    if created {
        info!(user_id = %user.id, email = %user.email, "Admin account created");
    } else {
        info!(user_id = %user.id, email = %user.email, "Existing account promoted to admin");
    }
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = Arc::new(load_runtime_config(&args)?);

    let db = Arc::new(connect_database(&config).await?);
    db.initialize_schema()
        .await
        .context("database migration failed")?;

    let unit_of_work = AppUnitOfWork::from_postgres(Arc::clone(&db));
    let object_storage = storage::from_config(&config.storage)
        .context("failed to configure object storage")?;
    let translator =
        AutoTranslator::from_config(Arc::clone(&unit_of_work.listings), &config.translation)
            .context("failed to configure translation")?;
    let crypto = AuthCrypto::new(&config.auth.password_pepper)
        .context("failed to initialise password hashing")?;

    info!(
        storage.backend = %config.storage.backend,
        translation.enabled = translator.is_enabled(),
        dev_mode = config.dev_mode,
        "runtime configuration in effect"
    );

    let state = AppState::new(
        Arc::clone(&config),
        unit_of_work,
        object_storage,
        translator,
        crypto,
    );
    let router = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;
    info!("Starting ArenaApp API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
