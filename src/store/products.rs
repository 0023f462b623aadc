use crate::db_models::{NewProduct, Product};
use crate::errors::custom::CrmError;
use crate::schema::products;
use crate::validations::product::{ProductName, ProductPrice, RestockIncrement, StockLevel};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug)]
pub struct ProductDraft {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: ProductPrice,
    pub stock: StockLevel,
}

#[instrument(name = "Create product", skip(conn, draft), fields(name = %draft.name.as_ref()))]
pub async fn create(conn: &mut AsyncPgConnection, draft: ProductDraft) -> Result<Product, CrmError> {
    let price = draft.price.into_inner();
    let product = diesel::insert_into(products::table)
        .values(&NewProduct {
            id: Uuid::new_v4(),
            name: draft.name.as_ref(),
            description: draft.description.as_deref(),
            price: &price,
            stock: draft.stock.value(),
        })
        .returning(Product::as_returning())
        .get_result(conn)
        .await
        .map_err(CrmError::insertion)?;
    Ok(product)
}

#[instrument(name = "Get product", skip(conn))]
pub async fn find(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Product, CrmError> {
    products::table
        .find(id)
        .select(Product::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| CrmError::NotFound(format!("Product {} does not exist", id)))
}

/// All products ordered by name.
#[instrument(name = "List products", skip(conn))]
pub async fn list(conn: &mut AsyncPgConnection) -> Result<Vec<Product>, CrmError> {
    let rows = products::table
        .select(Product::as_select())
        .order((products::name.asc(), products::id.asc()))
        .load(conn)
        .await?;
    Ok(rows)
}

/// Products whose stock is strictly below `threshold`.
#[instrument(name = "List low stock products", skip(conn))]
pub async fn low_stock(
    conn: &mut AsyncPgConnection,
    threshold: i32,
) -> Result<Vec<Product>, CrmError> {
    let rows = products::table
        .filter(products::stock.lt(threshold))
        .select(Product::as_select())
        .order((products::name.asc(), products::id.asc()))
        .load(conn)
        .await?;
    Ok(rows)
}

/// Adds `increment` to every product below `threshold` in a single statement
/// and returns the updated rows ordered by name.
#[instrument(name = "Restock low stock products", skip(conn))]
pub async fn restock_low_stock(
    conn: &mut AsyncPgConnection,
    threshold: i32,
    increment: i32,
) -> Result<Vec<Product>, CrmError> {
    let increment = RestockIncrement::parse(threshold, increment)
        .map_err(CrmError::ValidationError)?
        .value();

    let mut updated: Vec<Product> =
        diesel::update(products::table.filter(products::stock.lt(threshold)))
            .set((
                products::stock.eq(products::stock + increment),
                products::updated_at.eq(Utc::now()),
            ))
            .returning(Product::as_returning())
            .get_results(conn)
            .await
            .map_err(CrmError::updation)?;
    updated.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    tracing::info!(updated = updated.len(), "Low stock products restocked");
    Ok(updated)
}
