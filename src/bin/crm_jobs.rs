use chrono::Local;
use clap::{Parser, Subcommand};
use crm::config::configuration::Settings;
use crm::errors::job::JobError;
use crm::jobs::client::GraphqlClient;
use crm::jobs::heartbeat::log_crm_heartbeat;
use crm::jobs::log_file::LogFile;
use crm::jobs::low_stock::update_low_stock;
use crm::jobs::order_reminders::send_order_reminders;
use crm::jobs::report::generate_crm_report;
use crm::telemetry::{get_subscriber, init_subscriber};
use std::process::ExitCode;

/// Scheduled CRM maintenance jobs. Each subcommand runs once and exits;
/// schedule them with cron or any other job runner.
#[derive(Debug, Parser)]
#[command(name = "crm_jobs", version)]
struct Cli {
    #[command(subcommand)]
    job: Job,
}

#[derive(Debug, Subcommand)]
enum Job {
    /// Append a liveness line and probe the GraphQL endpoint.
    Heartbeat {
        /// Skip the GraphQL probe and only write the liveness line.
        #[arg(long)]
        no_probe: bool,
    },
    /// Restock every product below the threshold.
    RestockLowStock {
        #[arg(long)]
        threshold: Option<i32>,
        #[arg(long)]
        increment: Option<i32>,
    },
    /// Log the orders placed within the reminder window.
    OrderReminders {
        #[arg(long)]
        days: Option<i64>,
    },
    /// Log customer, order and revenue totals.
    Report,
}

async fn run(job: Job, settings: Settings) -> Result<(), JobError> {
    let jobs = settings.jobs;
    let client = GraphqlClient::from_settings(&jobs)?;
    let now = Local::now();

    match job {
        Job::Heartbeat { no_probe } => {
            let probe = (jobs.heartbeat_probe && !no_probe).then_some(&client);
            log_crm_heartbeat(probe, &LogFile::new(&jobs.heartbeat_log), now).await
        }
        Job::RestockLowStock {
            threshold,
            increment,
        } => update_low_stock(
            &client,
            &LogFile::new(&jobs.low_stock_log),
            threshold.unwrap_or(jobs.low_stock_threshold),
            increment.unwrap_or(jobs.low_stock_increment),
            now,
        )
        .await
        .map(|_| ()),
        Job::OrderReminders { days } => send_order_reminders(
            &client,
            &LogFile::new(&jobs.order_reminders_log),
            days.unwrap_or(jobs.reminder_window_days),
            now,
        )
        .await
        .map(|_| ()),
        Job::Report => generate_crm_report(&client, &LogFile::new(&jobs.report_log), now)
            .await
            .map(|_| ()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = get_subscriber("crm_jobs".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let cli = Cli::parse();
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "Failed to load configurations");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.job, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Job failed");
            ExitCode::FAILURE
        }
    }
}
