use crate::helper::spawn_app;
use chrono::Local;
use claim::{assert_err, assert_matches, assert_ok};
use crm::errors::job::JobError;
use crm::jobs::client::GraphqlClient;
use crm::jobs::heartbeat::log_crm_heartbeat;
use crm::jobs::log_file::LogFile;
use crm::jobs::low_stock::update_low_stock;
use crm::jobs::order_reminders::send_order_reminders;
use crm::jobs::report::generate_crm_report;
use std::time::Duration;

fn unreachable_client() -> GraphqlClient {
    // Port 1 is reserved and refuses connections.
    GraphqlClient::new("http://127.0.0.1:1/graphql", Duration::from_secs(2)).unwrap()
}

fn read_lines(log: &LogFile) -> Vec<String> {
    std::fs::read_to_string(log.path())
        .expect("Failed to read job log")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn heartbeat_probe_logs_the_hello_response() {
    let app = spawn_app().await;
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("heartbeat.txt"));
    let client = app.jobs_client();

    assert_ok!(log_crm_heartbeat(Some(&client), &log, Local::now()).await);

    let lines = read_lines(&log);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("CRM is alive"));
    assert!(lines[1].ends_with("GraphQL endpoint responsive: Hello, GraphQL!"));
    app.cleanup();
}

#[tokio::test]
async fn restock_job_logs_each_updated_product() {
    let app = spawn_app().await;
    let bottle = app.create_product("Bottle", "10.00", 5).await;
    app.create_product("Laptop", "999.00", 50).await;
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("low_stock.txt"));

    let updated = update_low_stock(&app.jobs_client(), &log, 10, 10, Local::now())
        .await
        .expect("Restock job failed");

    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].id, bottle);
    assert_eq!(updated[0].stock, 15);

    let lines = read_lines(&log);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("Low stock update initiated"));
    assert!(lines[1].ends_with("Successfully updated 1 products with low stock"));
    assert!(lines[2].ends_with(&format!(
        "Updated Product ID: {}, Name: Bottle, New Stock: 15",
        bottle
    )));
    app.cleanup();
}

#[tokio::test]
async fn restock_job_fails_when_the_mutation_is_rejected() {
    let app = spawn_app().await;
    app.create_product("Bottle", "10.00", 5).await;
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("low_stock.txt"));

    let result = update_low_stock(&app.jobs_client(), &log, 10, -1, Local::now()).await;

    assert_matches!(result, Err(JobError::MutationFailure(_)));
    let lines = read_lines(&log);
    assert!(lines[1].contains("Low stock update failed"));
    app.cleanup();
}

#[tokio::test]
async fn reminders_only_cover_the_recent_window() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "4.00", 10).await;
    let old = app.create_order(&customer, &product, 1).await["order"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let recent = app.create_order(&customer, &product, 2).await["order"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    app.backdate_order(&old, 8).await;
    app.backdate_order(&recent, 2).await;
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("reminders.txt"));

    let found = send_order_reminders(&app.jobs_client(), &log, 7, Local::now())
        .await
        .expect("Reminder scan failed");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, recent);
    assert_eq!(found[0].customer_email(), "alice@example.com");

    let contents = read_lines(&log).join("\n");
    assert!(contents.contains("Found 1 orders within the last 7 days"));
    assert!(contents.contains(&format!("Order ID: {}", recent)));
    assert!(!contents.contains(&format!("Order ID: {}", old)));
    app.cleanup();
}

#[tokio::test]
async fn report_sums_customers_orders_and_revenue() {
    let app = spawn_app().await;
    let alice = app.create_customer("alice", "alice@example.com").await;
    app.create_customer("bob", "bob@example.com").await;
    let bottle = app.create_product("Bottle", "19.99", 10).await;
    let cap = app.create_product("Cap", "0.01", 10).await;
    app.create_order(&alice, &bottle, 3).await;
    app.create_order(&alice, &cap, 3).await;
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("report.txt"));

    let report = generate_crm_report(&app.jobs_client(), &log, Local::now())
        .await
        .expect("Report failed");

    assert_eq!(report.total_customers, 2);
    assert_eq!(report.total_orders, 2);
    assert_eq!(report.formatted_revenue(), "$60.00");
    let lines = read_lines(&log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("- Report: 2 customers, 2 orders, $60.00 revenue"));
    app.cleanup();
}

#[tokio::test]
async fn report_failure_is_logged_and_returned() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("report.txt"));
    let result = generate_crm_report(&unreachable_client(), &log, Local::now()).await;

    assert_err!(result);
    let lines = read_lines(&log);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Error generating CRM report"));
}

#[tokio::test]
async fn restock_job_fails_when_the_api_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("low_stock.txt"));

    let result = update_low_stock(&unreachable_client(), &log, 10, 10, Local::now()).await;

    assert_matches!(result, Err(JobError::TransportFailure(_)));
    let lines = read_lines(&log);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("Low stock update initiated"));
    assert!(lines[1].contains("Error in low stock update"));
}

#[tokio::test]
async fn reminder_scan_fails_when_orders_cannot_be_fetched() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogFile::new(dir.path().join("reminders.txt"));

    let result = send_order_reminders(&unreachable_client(), &log, 7, Local::now()).await;

    assert_matches!(result, Err(JobError::TransportFailure(_)));
    let lines = read_lines(&log);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("Starting order reminders processing"));
    assert!(lines[1].contains("Error querying GraphQL"));
}
