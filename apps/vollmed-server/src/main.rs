use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use api_ingress::{openapi, ApiIngress, ApiIngressConfig};
use medicos::{MedicosConfig, MedicosModule};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";
const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5000;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Vollmed Server - physician registry REST API
#[derive(Parser)]
#[command(name = "vollmed-server")]
#[command(about = "Vollmed Server - physician registry REST API")]
#[command(version)]
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

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Vollmed Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(dsn: &str) -> Result<&'static str> {
    let raw = dsn.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// The DSN to connect to: in-memory SQLite under `--mock`, else the configured URL.
fn resolve_dsn(config: &AppConfig, args: &CliArgs) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configured; set `database.url` or pass --mock"))?;
    let dsn = db.url.trim().to_owned();
    detect_from_dsn(&dsn)?;
    if dsn.starts_with("sqlite://") {
        return absolutize_sqlite_dsn(&dsn, &config.home_dir(), true);
    }
    Ok(dsn)
}

async fn connect(dsn: &str, db_config: Option<&DatabaseConfig>) -> Result<DatabaseConnection> {
    let max_conns = db_config
        .and_then(|c| c.max_conns)
        .unwrap_or(DEFAULT_MAX_CONNS);

    if dsn.starts_with("sqlite:") {
        let busy_ms = db_config
            .and_then(|c| c.busy_timeout_ms)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        let opts = SqliteConnectOptions::from_str(dsn)
            .with_context(|| format!("invalid SQLite DSN '{dsn}'"))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_millis(u64::from(busy_ms)));

        // An in-memory database lives only as long as its one connection.
        let pool_options = if is_memory_dsn(dsn) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_conns)
        };
        let pool = pool_options
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(opts)
            .await
            .context("failed to open SQLite pool")?;
        return Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool));
    }

    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.max_connections(max_conns)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .sqlx_logging(false);
    Database::connect(opts)
        .await
        .context("failed to connect to database")
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let dsn = resolve_dsn(&config, &args)?;
    tracing::info!("Connecting to database: {}", dsn);
    let db = connect(&dsn, config.database.as_ref()).await?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());

    let medicos_cfg: MedicosConfig = config.module_config(medicos::MODULE_NAME)?;
    let medicos = MedicosModule::new(db, medicos_cfg);
    medicos.migrate().await?;

    let mut ingress_cfg: ApiIngressConfig = config.module_config(api_ingress::MODULE_NAME)?;
    if config.server.timeout_sec > 0 {
        ingress_cfg.request_timeout_sec = config.server.timeout_sec;
    }
    let ingress = ApiIngress::new(ingress_cfg).with_openapi(openapi::compose(
        "Vollmed API",
        env!("CARGO_PKG_VERSION"),
        [medicos.openapi()],
    ));

    let router = ingress.build_router(medicos.router());
    let addr = ingress.bind_addr(&config.server.host, config.server.port)?;

    ingress
        .serve(addr, router, async {
            if let Err(e) = modkit::shutdown::wait_for_shutdown().await {
                tracing::error!("Signal handler failed: {}", e);
            }
        })
        .await?;

    tracing::info!("Vollmed Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    if !args.mock {
        if let Some(db) = &config.database {
            detect_from_dsn(&db.url)?;
        }
    }
    let _: MedicosConfig = config.module_config(medicos::MODULE_NAME)?;
    let _: ApiIngressConfig = config.module_config(api_ingress::MODULE_NAME)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
