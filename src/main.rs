use crm::config::configuration;
use crm::db::{establish_connection, run_migrations};
use crm::startup::Application;
use crm::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("crm".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = configuration::Settings::new().expect("Failed to load configurations");
    run_migrations(&config.database.url)
        .await
        .expect("Failed to run database migrations");
    let pool = establish_connection(&config.database.url, config.database.max_pool_size)
        .expect("Failed to create connection pool");

    let application = Application::build(
        &config.application.host,
        config.application.port,
        pool,
    )
    .await?;
    tracing::info!(port = application.port(), "CRM GraphQL API listening");
    application.run_until_stopped().await?;
    Ok(())
}
