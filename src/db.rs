use crate::errors::custom::{CrmError, DbError};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::instrument;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type PgPool = Pool<AsyncPgConnection>;
pub type PooledConnection = Object<AsyncPgConnection>;

/******************************************/
// Establishing Db Connection
/******************************************/
pub fn establish_connection(database_url: &str, max_size: usize) -> Result<PgPool, CrmError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|err| CrmError::DatabaseError(DbError::ConnectionError(err.to_string())))
}

pub async fn get_connection(pool: &PgPool) -> Result<PooledConnection, CrmError> {
    pool.get()
        .await
        .map_err(|err| CrmError::DatabaseError(DbError::ConnectionError(err.to_string())))
}

/******************************************/
// Running embedded migrations
/******************************************/
#[instrument(name = "Run pending migrations", skip(database_url))]
pub async fn run_migrations(database_url: &str) -> Result<(), CrmError> {
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|err| CrmError::DatabaseError(DbError::ConnectionError(err.to_string())))?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| CrmError::DatabaseError(DbError::MigrationError(err.to_string())))?;
        tracing::info!(applied = applied.len(), "Migrations up to date");
        Ok(())
    })
    .await
    .map_err(|err| CrmError::DatabaseError(DbError::MigrationError(err.to_string())))?
}

/******************************************/
// Creating new db for tests
/******************************************/
pub fn create_database(maintenance_url: &str, database_name: &str) -> Result<(), CrmError> {
    let mut connection = PgConnection::establish(maintenance_url)
        .map_err(|err| CrmError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

    let create_db_query = format!(r#"CREATE DATABASE "{}";"#, database_name);
    sql_query(&create_db_query).execute(&mut connection)?;
    tracing::info!(database = database_name, "Database created");
    Ok(())
}

/******************************************/
// Dropping db code
/******************************************/
pub fn drop_database(maintenance_url: &str, database_name: &str) {
    let mut connection = match PgConnection::establish(maintenance_url) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to the maintenance database");
            return;
        }
    };

    // A database with open sessions cannot be dropped, so close them first.
    let terminate_query = format!(
        r#"
        SELECT pg_terminate_backend(pid)
        FROM pg_stat_activity
        WHERE datname = '{}';
    "#,
        database_name
    );

    if let Err(e) = sql_query(&terminate_query).execute(&mut connection) {
        tracing::error!(error = %e, "Failed to terminate connections");
        return;
    }

    let drop_query = format!(r#"DROP DATABASE IF EXISTS "{}";"#, database_name);

    if let Err(e) = sql_query(&drop_query).execute(&mut connection) {
        tracing::error!(error = %e, "Failed to drop database");
    } else {
        tracing::info!(database = database_name, "Database dropped");
    }
}
