use chrono::Utc;
use dotenvy::dotenv;
use duebook::config::database::{create_connection, create_tables};
use duebook::config::portfolio::{load_default_portfolio, seed_portfolio};
use duebook::core::{insights, obligation};
use duebook::errors::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect to the database and make sure the schema exists
    let db = create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to the database: {}", e))?;
    create_tables(&db).await?;

    let today = Utc::now().date_naive();

    // 4. Seed new clients from portfolio.toml when one is present
    match load_default_portfolio() {
        Ok(portfolio) => {
            seed_portfolio(&db, &portfolio, today)
                .await
                .inspect_err(|e| error!("Failed to seed the portfolio: {}", e))?;
        }
        Err(e) => warn!("Skipping portfolio seeding: {}", e),
    }

    // 5. Bring every stored status in line with today's date
    let sweep = obligation::run_status_check(&db, today).await?;
    info!(
        "Status check rewrote {} of {} obligations.",
        sweep.total_changed, sweep.total_checked
    );

    // 6. Capture the month's insight snapshots once the close-out window opens
    if insights::auto_close_out(&db, today).await?.is_none() {
        info!("Month-end close-out not yet due.");
    }

    Ok(())
}
