use super::connection;
use super::types::{parse_id, CustomerType, OrderType, ProductType};
use crate::store;
use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Constant greeting, used as a liveness probe.
    async fn hello(&self) -> &'static str {
        "Hello, GraphQL!"
    }

    async fn customer(&self, ctx: &Context<'_>, id: ID) -> Result<CustomerType> {
        let id = parse_id(&id, "customer").map_err(|e| e.extend())?;
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let record = store::customers::find(&mut conn, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(CustomerType::from(record))
    }

    /// Every customer, newest first.
    async fn all_customers(&self, ctx: &Context<'_>) -> Result<Vec<CustomerType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let records = store::customers::list(&mut conn)
            .await
            .map_err(|e| e.extend())?;
        Ok(records.into_iter().map(CustomerType::from).collect())
    }

    async fn product(&self, ctx: &Context<'_>, id: ID) -> Result<ProductType> {
        let id = parse_id(&id, "product").map_err(|e| e.extend())?;
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let product = store::products::find(&mut conn, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(ProductType::from(product))
    }

    /// Every product, ordered by name.
    async fn all_products(&self, ctx: &Context<'_>) -> Result<Vec<ProductType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let products = store::products::list(&mut conn)
            .await
            .map_err(|e| e.extend())?;
        Ok(products.into_iter().map(ProductType::from).collect())
    }

    /// Products whose stock is strictly below `threshold`.
    async fn low_stock_products(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] threshold: i32,
    ) -> Result<Vec<ProductType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let products = store::products::low_stock(&mut conn, threshold)
            .await
            .map_err(|e| e.extend())?;
        Ok(products.into_iter().map(ProductType::from).collect())
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> Result<OrderType> {
        let id = parse_id(&id, "order").map_err(|e| e.extend())?;
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let order = store::orders::find(&mut conn, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(OrderType::from(order))
    }

    /// Every order, newest first.
    async fn all_orders(&self, ctx: &Context<'_>) -> Result<Vec<OrderType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let orders = store::orders::list(&mut conn)
            .await
            .map_err(|e| e.extend())?;
        Ok(orders.into_iter().map(OrderType::from).collect())
    }
}
