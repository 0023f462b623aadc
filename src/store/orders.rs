use crate::db_models::{NewOrder, Order, OrderStatus, Product};
use crate::errors::custom::CrmError;
use crate::schema::{customers, orders, products};
use crate::validations::product::{order_total, OrderQuantity};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::instrument;
use uuid::Uuid;

/// Places an order and takes its quantity out of stock.
///
/// The decrement is a conditional `UPDATE ... WHERE stock >= quantity`, so two
/// concurrent orders can never drive stock below zero. The decrement and the
/// order insert share one transaction: either both commit or neither does.
#[instrument(name = "Place order", skip(conn, quantity), fields(quantity = quantity.value()))]
pub async fn place(
    conn: &mut AsyncPgConnection,
    customer_id: Uuid,
    product_id: Uuid,
    quantity: OrderQuantity,
) -> Result<Order, CrmError> {
    let requested = quantity.value();
    conn.transaction::<_, CrmError, _>(|conn| {
        async move {
            customers::table
                .find(customer_id)
                .select(customers::id)
                .first::<Uuid>(conn)
                .await
                .optional()?
                .ok_or_else(|| {
                    CrmError::NotFound(format!("Customer {} does not exist", customer_id))
                })?;

            let product: Product = products::table
                .find(product_id)
                .select(Product::as_select())
                .first(conn)
                .await
                .optional()?
                .ok_or_else(|| {
                    CrmError::NotFound(format!("Product {} does not exist", product_id))
                })?;

            let total_amount =
                order_total(&product.price, quantity).map_err(CrmError::ValidationError)?;

            let remaining: Option<i32> = diesel::update(
                products::table
                    .filter(products::id.eq(product_id))
                    .filter(products::stock.ge(requested)),
            )
            .set((
                products::stock.eq(products::stock - requested),
                products::updated_at.eq(Utc::now()),
            ))
            .returning(products::stock)
            .get_result(conn)
            .await
            .optional()
            .map_err(CrmError::updation)?;

            let Some(remaining) = remaining else {
                return Err(CrmError::InsufficientStock {
                    requested,
                    available: product.stock,
                });
            };

            let order = diesel::insert_into(orders::table)
                .values(&NewOrder {
                    id: Uuid::new_v4(),
                    customer_id,
                    product_id,
                    quantity: requested,
                    total_amount: &total_amount,
                    status: OrderStatus::Pending,
                })
                .returning(Order::as_returning())
                .get_result(conn)
                .await
                .map_err(CrmError::insertion)?;

            tracing::info!(order_id = %order.id, remaining, "Order placed");
            Ok(order)
        }
        .scope_boxed()
    })
    .await
}

#[instrument(name = "Get order", skip(conn))]
pub async fn find(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Order, CrmError> {
    orders::table
        .find(id)
        .select(Order::as_select())
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| CrmError::NotFound(format!("Order {} does not exist", id)))
}

/// All orders, newest first.
#[instrument(name = "List orders", skip(conn))]
pub async fn list(conn: &mut AsyncPgConnection) -> Result<Vec<Order>, CrmError> {
    let rows = orders::table
        .select(Order::as_select())
        .order(orders::created_at.desc())
        .load(conn)
        .await?;
    Ok(rows)
}

#[instrument(name = "List orders by customer", skip(conn))]
pub async fn for_customer(
    conn: &mut AsyncPgConnection,
    customer_id: Uuid,
) -> Result<Vec<Order>, CrmError> {
    let rows = orders::table
        .filter(orders::customer_id.eq(customer_id))
        .select(Order::as_select())
        .order(orders::created_at.desc())
        .load(conn)
        .await?;
    Ok(rows)
}

#[instrument(name = "List orders by product", skip(conn))]
pub async fn for_product(
    conn: &mut AsyncPgConnection,
    product_id: Uuid,
) -> Result<Vec<Order>, CrmError> {
    let rows = orders::table
        .filter(orders::product_id.eq(product_id))
        .select(Order::as_select())
        .order(orders::created_at.desc())
        .load(conn)
        .await?;
    Ok(rows)
}
