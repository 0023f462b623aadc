use crate::graphql::CrmSchema;
use actix_web::{web, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::instrument;

/******************************************/
// GraphQL endpoint
/******************************************/
/**
 * @route   POST /graphql
 * @access  Public
 */
#[instrument(name = "GraphQL request", skip(schema, request))]
pub async fn graphql(schema: web::Data<CrmSchema>, request: GraphQLRequest) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

/******************************************/
// GraphiQL IDE
/******************************************/
/**
 * @route   GET /graphql
 * @access  Public
 */
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
