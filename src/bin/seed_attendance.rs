// Post a week of sample check-ins to a running attendance API
// Usage: cargo run --bin seed_attendance -- --api-url http://localhost:8000

use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use attendance_api::client::AttendanceClient;
use attendance_api::services::seed_data;
use attendance_api::utils::date;

#[derive(Debug, Parser)]
#[command(about = "Generate the past 7 days of check-ins and post them to the API")]
struct Args {
    /// Base URL of the attendance API
    #[arg(long, env = "ATTENDANCE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Pause between posts, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_attendance=info,attendance_api=info".into())
        )
        .init();

    let args = Args::parse();
    let client = AttendanceClient::new(&args.api_url)?;

    let records = seed_data::generate_week(date::utc_date(&Utc::now()), &mut rand::thread_rng());
    info!("Posting {} check-ins to {}", records.len(), client.base_url());

    let mut recorded = 0usize;
    for record in &records {
        match client.record(record).await {
            Ok(id) => {
                recorded += 1;
                info!(%id, identity = ?record.identity, "Check-in posted");
            }
            Err(e) => warn!("Failed to post check-in: {}", e),
        }
        tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
    }

    println!("Seeded {}/{} check-ins", recorded, records.len());
    Ok(())
}
