// Terminal dashboard: polls the attendance API and prints the weekly report until Ctrl+C
// Usage: cargo run --bin attendance_dashboard -- --api-url http://localhost:8000 --interval-secs 300

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use attendance_api::background::{DashboardPoller, PollerConfig};
use attendance_api::client::{AttendanceClient, HttpReportSource};
use attendance_api::models::{DailyTarget, DashboardSnapshot};

#[derive(Debug, Parser)]
#[command(about = "Poll the attendance API and print the weekly report")]
struct Args {
    /// Base URL of the attendance API
    #[arg(long, env = "ATTENDANCE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Expected check-ins per day
    #[arg(long, env = "DAILY_TARGET", default_value_t = DailyTarget::default())]
    target: DailyTarget,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 300)]
    interval_secs: u64,

    /// Seconds before a single refresh is abandoned
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_api=info".into())
        )
        .init();

    let args = Args::parse();
    let client = AttendanceClient::new(&args.api_url)?;
    let source = Arc::new(HttpReportSource::new(client, args.target));

    let poller = DashboardPoller::spawn(
        source,
        PollerConfig {
            interval: Duration::from_secs(args.interval_secs),
            timeout: Duration::from_secs(args.timeout_secs),
        },
    );
    let mut snapshots = poller.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    print_snapshot(&snapshot);
                }
            }
        }
    }

    info!("Stopping dashboard");
    poller.stop().await;
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    let report = &snapshot.report;
    println!();
    println!("Weekly attendance as of {} (refreshed {})", report.anchor_date, snapshot.refreshed_at.format("%H:%M:%S UTC"));
    println!("{:<5} {:<12} {:>8} {:>6}  {}", "Day", "Date", "Count", "Pct", "Band");
    for day in &report.days {
        println!(
            "{:<5} {:<12} {:>8} {:>5}%  {}",
            day.label, day.date, day.display_text, day.percentage, day.band
        );
    }
    println!(
        "Today: {}  Weekly total: {}  Weekly average: {}  Unique: {}",
        report.today_count, report.weekly_total, report.weekly_average, report.unique_count
    );
}
