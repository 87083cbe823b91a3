//! Calorie Journal (caljournal)
//!
//! An MCP server for free-text calorie journaling with an adaptive target.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use caljournal::build_info;
use caljournal::config::Config;
use caljournal::db;
use caljournal::mcp::CalJournalService;
use caljournal::nutrition::CalorieParser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr; stdout carries the MCP stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("caljournal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!("Lookback window: {} days", config.lookback_days);

    let lexicon = config.load_lexicon()?;
    eprintln!("Lexicon entries: {}", lexicon.len());

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let service = CalJournalService::new(
        config.database_path.clone(),
        database,
        CalorieParser::new(lexicon),
        config.lookback_days,
    );

    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;

    server.waiting().await?;

    Ok(())
}
