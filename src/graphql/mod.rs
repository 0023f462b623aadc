//! GraphQL API over the CRM entity store.
//!
//! - [`QueryRoot`]: read-only resolvers
//! - [`MutationRoot`]: writes, each reporting `success` plus a typed error kind

pub mod mutation;
pub mod query;
pub mod scalars;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use crate::db::{get_connection, PgPool, PooledConnection};
use crate::errors::custom::{CrmError, DbError};
use async_graphql::{Context, EmptySubscription, Schema};

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(pool: PgPool) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .finish()
}

/// Checks a pooled connection out for the current resolver.
pub(crate) async fn connection(ctx: &Context<'_>) -> Result<PooledConnection, CrmError> {
    let pool = ctx
        .data::<PgPool>()
        .map_err(|e| CrmError::DatabaseError(DbError::ConnectionError(e.message)))?;
    get_connection(pool).await
}
