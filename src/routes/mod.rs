pub mod graphql;
pub mod health_check;
