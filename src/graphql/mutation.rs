use super::connection;
use super::scalars::Decimal;
use super::types::{
    parse_id, BulkCreateCustomersPayload, BulkCustomerError, CreateCustomerPayload,
    CreateOrderPayload, CreateProductPayload, CustomerInput, CustomerType, ProductInput,
    UpdateLowStockProductsPayload,
};
use crate::errors::custom::CrmError;
use crate::store;
use crate::validations::product::OrderQuantity;
use async_graphql::{Context, Object, ID};
use tracing::instrument;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates an account identity and its customer profile together.
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> CreateCustomerPayload {
        let input = CustomerInput {
            username,
            email,
            first_name,
            last_name,
            phone,
            address,
        };
        create_customer(ctx, input).await.into()
    }

    /// Creates each customer independently: valid entries are kept even when
    /// others in the batch are rejected.
    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        customers: Vec<CustomerInput>,
    ) -> BulkCreateCustomersPayload {
        let mut created = Vec::new();
        let mut errors = Vec::new();
        for (index, input) in customers.into_iter().enumerate() {
            let email = input.email.clone();
            match create_customer(ctx, input).await {
                Ok(record) => created.push(CustomerType::from(record)),
                Err(err) => {
                    tracing::warn!(index, email = %email, error = %err, "Bulk customer rejected");
                    errors.push(BulkCustomerError {
                        index: i32::try_from(index).unwrap_or(i32::MAX),
                        email,
                        message: err.to_string(),
                        error: err.kind(),
                    });
                }
            }
        }
        tracing::info!(
            created = created.len(),
            rejected = errors.len(),
            "Bulk customer import finished"
        );
        BulkCreateCustomersPayload {
            success: errors.is_empty(),
            customers: created,
            errors,
        }
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
        price: Decimal,
        #[graphql(default = 0)] stock: i32,
    ) -> CreateProductPayload {
        let input = ProductInput {
            name,
            description,
            price,
            stock,
        };
        create_product(ctx, input).await.into()
    }

    /// Places an order, charging `price × quantity` and taking the quantity
    /// out of stock atomically.
    async fn create_order(
        &self,
        ctx: &Context<'_>,
        customer_id: ID,
        product_id: ID,
        quantity: i32,
    ) -> CreateOrderPayload {
        create_order(ctx, customer_id, product_id, quantity)
            .await
            .into()
    }

    /// Adds `increment` to the stock of every product below `threshold`.
    async fn update_low_stock_products(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] threshold: i32,
        #[graphql(default = 10)] increment: i32,
    ) -> UpdateLowStockProductsPayload {
        update_low_stock_products(ctx, threshold, increment)
            .await
            .into()
    }
}

#[instrument(name = "createCustomer mutation", skip(ctx, input), fields(email = %input.email))]
async fn create_customer(
    ctx: &Context<'_>,
    input: CustomerInput,
) -> Result<crate::db_models::CustomerRecord, CrmError> {
    let draft = input.validate()?;
    let mut conn = connection(ctx).await?;
    store::customers::create(&mut conn, draft).await
}

#[instrument(name = "createProduct mutation", skip(ctx, input), fields(name = %input.name))]
async fn create_product(
    ctx: &Context<'_>,
    input: ProductInput,
) -> Result<crate::db_models::Product, CrmError> {
    let draft = input.validate()?;
    let mut conn = connection(ctx).await?;
    store::products::create(&mut conn, draft).await
}

#[instrument(name = "createOrder mutation", skip(ctx))]
async fn create_order(
    ctx: &Context<'_>,
    customer_id: ID,
    product_id: ID,
    quantity: i32,
) -> Result<crate::db_models::Order, CrmError> {
    let customer_id = parse_id(&customer_id, "customer")?;
    let product_id = parse_id(&product_id, "product")?;
    let quantity = OrderQuantity::parse(quantity).map_err(CrmError::ValidationError)?;
    let mut conn = connection(ctx).await?;
    store::orders::place(&mut conn, customer_id, product_id, quantity).await
}

#[instrument(name = "updateLowStockProducts mutation", skip(ctx))]
async fn update_low_stock_products(
    ctx: &Context<'_>,
    threshold: i32,
    increment: i32,
) -> Result<Vec<crate::db_models::Product>, CrmError> {
    let mut conn = connection(ctx).await?;
    store::products::restock_low_stock(&mut conn, threshold, increment).await
}
