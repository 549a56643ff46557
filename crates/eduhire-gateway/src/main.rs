use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use eduhire_core::config::EduhireConfig;
use tracing::info;

mod app;
mod auth;
mod error;
mod http;
mod seed;

#[derive(Parser)]
#[command(name = "eduhire", version)]
#[command(about = "Adaptive learning and skill-verified job board service")]
struct Cli {
    /// Path to the config file (default ~/.eduhire/eduhire.toml)
    #[arg(long, env = "EDUHIRE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (default)
    Serve,
    /// Load courses from a JSON file into the catalog
    Seed { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eduhire_gateway=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = EduhireConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        EduhireConfig::default()
    });

    // single SQLite file shared by all subsystems
    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = open(&db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    eduhire_users::db::init_db(&db)?;
    eduhire_learning::db::init_db(&db)?;
    eduhire_jobs::db::init_db(&db)?;
    info!("database migrations complete");

    let catalog = eduhire_learning::CourseCatalog::new(open(&db_path)?);

    if let Some(Command::Seed { file }) = cli.command {
        let count = seed::seed_file(&catalog, &file)?;
        println!("Seeded {count} course(s) from {}", file.display());
        return Ok(());
    }

    // each subsystem gets its own connection
    let users = Arc::new(eduhire_users::UserStore::new(open(&db_path)?));
    let learning = eduhire_learning::LearningEngine::new(
        Arc::clone(&users),
        catalog,
        config.learning.clone(),
    );
    let jobs = eduhire_jobs::JobBoard::new(open(&db_path)?, Arc::clone(&users));

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, users, learning, jobs));
    let router = app::build_router(state);

    info!("EduHire gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Open a connection with the per-connection settings every subsystem needs.
/// `foreign_keys` is not persisted by SQLite, so each connection sets it.
fn open(path: &str) -> rusqlite::Result<rusqlite::Connection> {
    let conn = rusqlite::Connection::open(path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_connections_enforce_foreign_keys() {
        let conn = open(":memory:").unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);

        eduhire_jobs::db::init_db(&conn).unwrap();
        let orphan = conn.execute(
            "INSERT INTO applications
                (id, job_id, user_id, status, skills_match, is_verified, created_at, updated_at)
             VALUES ('a1', 'no-such-job', 'u1', 'pending', '[]', 0, '', '')",
            [],
        );
        assert!(orphan.is_err());
    }
}
