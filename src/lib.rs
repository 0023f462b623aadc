pub mod config;
pub mod db;
pub mod db_models;
pub mod errors;
pub mod graphql;
pub mod jobs;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod validations;
