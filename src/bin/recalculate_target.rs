//! Run the adaptive target recalculation against the local database
//! Usage: cargo run --bin recalculate_target -- [lookback_days] [YYYY-MM-DD] [--apply]

use caljournal::config::Config;
use caljournal::models::DATE_FORMAT;
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let apply = args.iter().any(|a| a == "--apply");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let config = Config::from_env();
    let lookback_days = match positional.first() {
        Some(s) => s.parse::<u32>()?,
        None => config.lookback_days,
    };
    let today = match positional.get(1) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)?,
        None => chrono::Local::now().date_naive(),
    };

    println!("Database: {}", config.database_path.display());

    let database = caljournal::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        caljournal::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let response =
        caljournal::tools::adaptive::recalculate_target(&database, today, lookback_days, apply)?;

    println!(
        "Window: {} .. {} ({} days with entries, {} weights)",
        response.window_start, today, response.net_days, response.weight_samples
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.result.sufficient_data {
        println!("Not enough data; nothing stored.");
    } else if apply && !response.profile_updated {
        println!("No profile set; recommendation stored but not applied.");
    }

    Ok(())
}
