use anyhow::{anyhow, Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs, ServerConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use users::config::UsersConfig;
use users::infra::session::{with_database_sessions, TowerSessionProvider};
use users::Users;

mod shutdown;

/// Users Server - user profile HTTP service
#[derive(Parser)]
#[command(name = "users-server")]
#[command(about = "Users Server - user profile HTTP service")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // stdout carries nothing but the YAML here
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Users Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("database section is not configured"))?;
    let url = db_config.resolved_url(&config.home_dir())?;

    let mut opts = ConnectOptions::new(url.clone());
    opts.max_connections(db_config.max_conns.unwrap_or(10))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!("Connecting to database: {}", url);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database '{url}'"))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

async fn build_router(
    users: &Users,
    db: &DatabaseConnection,
    users_config: &UsersConfig,
    server: &ServerConfig,
) -> Result<Router> {
    let mut router = users.register_rest(Router::new());
    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }
    // Identity is written into the session table by the external auth provider.
    let router = with_database_sessions(router, db, &users_config.session).await?;
    Ok(router.layer(TraceLayer::new_for_http()))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let users_config: UsersConfig = config.module_config("users")?;
    let db = connect_db(&config).await?;
    Users::migrate(&db).await?;
    let users = Users::init(db.clone(), &users_config, Arc::new(TowerSessionProvider));

    let router = build_router(&users, &db, &users_config, &config.server).await?;
    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Users Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: UsersConfig = config.module_config("users")?;
    if let Some(db) = &config.database {
        db.resolved_url(&config.home_dir())?;
    } else {
        return Err(anyhow!("database section is not configured"));
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
