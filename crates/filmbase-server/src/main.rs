//! Filmbase Server
//!
//! Movie catalog web app with session logins and admin-only editing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use filmbase_core::Config;
use filmbase_core::tracing_init::{default_filter, init_tracing};
use filmbase_server::auth::credentials::Registration;
use filmbase_server::auth::{CredentialStore, Role, SessionAuthority};
use filmbase_server::server::{AppState, build_router};
use filmbase_server::storage::FilmDatabase;

#[derive(Parser, Debug)]
#[command(name = "filmbase")]
#[command(version, about = "Filmbase server - movie catalog with role-based access")]
struct Args {
    /// Explicit config file (JSON), layered over the global one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Path to SQLite database file.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Log level for Filmbase crates (overridden by `RUST_LOG`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create an account directly in the database.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long, env = "FILMBASE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "admin")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = filmbase_core::config::load_config(args.config.as_deref())?;
    apply_cli_overrides(&mut config, &args);

    init_tracing(
        &default_filter("filmbase_server", &config.logging.level),
        config.logging.json,
    );

    let db = open_database(&config).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db).await,
        Command::CreateUser {
            username,
            password,
            email,
            role,
        } => {
            let user = CredentialStore::new(db)
                .register(Registration {
                    username: &username,
                    password: &password,
                    email: email.as_deref(),
                    role,
                })
                .await?;
            info!(user_id = %user.id, role = %user.role, "Account created");
            Ok(())
        }
    }
}

fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    if let Some(path) = &args.db_path {
        config.server.database_path = Some(path.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.log_json {
        config.logging.json = true;
    }
}

async fn open_database(config: &Config) -> anyhow::Result<FilmDatabase> {
    let path = match &config.server.database_path {
        Some(path) => path.clone(),
        None => filmbase_core::config::database_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine config directory for database"))?,
    };
    info!(path = %path.display(), "Opening film database");
    Ok(FilmDatabase::open(&path).await?)
}

async fn serve(config: Config, db: FilmDatabase) -> anyhow::Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.addr,
        "Starting filmbase"
    );

    let sessions = Arc::new(SessionAuthority::new(
        db.clone(),
        config.auth.session_ttl_secs,
    )?);

    // Expired sessions are already rejected on lookup; this only reclaims rows.
    let sweeper = Arc::clone(&sessions);
    let sweep_every = Duration::from_secs(config.auth.session_sweep_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        interval.tick().await; // Skip first immediate tick
        loop {
            interval.tick().await;
            match sweeper.purge_expired().await {
                Ok(removed) if removed > 0 => {
                    info!(removed, "Expired sessions swept");
                }
                Err(e) => {
                    warn!(error = %e, "Session sweep failed");
                }
                _ => {}
            }
        }
    });

    let app = build_router(AppState::new(db, sessions, config.auth.secure_cookie));
    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    info!(addr = %listener.local_addr()?, "Filmbase listening");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Filmbase stopped");
    Ok(())
}
