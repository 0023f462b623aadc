use super::scalars::Decimal;
use super::connection;
use crate::db_models::{CustomerRecord, Order, OrderStatus, Product, User};
use crate::errors::custom::{CrmError, ErrorKind};
use crate::store::{self, customers::CustomerDraft, products::ProductDraft};
use crate::validations::customer::{optional_text, CustomerPhone, UserEmail, UserName};
use crate::validations::product::{ProductName, ProductPrice, StockLevel};
use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Parses a GraphQL `ID` into the UUID primary key of `entity`.
pub fn parse_id(id: &ID, entity: &str) -> Result<Uuid, CrmError> {
    Uuid::parse_str(id.as_str()).map_err(|_| {
        CrmError::ValidationError(format!("{} is not a valid {} id.", id.as_str(), entity))
    })
}

/******************************************/
// Output types
/******************************************/
#[derive(SimpleObject, Clone)]
#[graphql(name = "User")]
pub struct UserType {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        Self {
            id: ID::from(user.id.to_string()),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Customer", complex)]
pub struct CustomerType {
    pub id: ID,
    pub user: UserType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    pub customer_id: Uuid,
}

impl From<CustomerRecord> for CustomerType {
    fn from(record: CustomerRecord) -> Self {
        let CustomerRecord { customer, user } = record;
        Self {
            id: ID::from(customer.id.to_string()),
            user: UserType::from(user),
            phone: customer.phone,
            address: customer.address,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
            customer_id: customer.id,
        }
    }
}

#[ComplexObject]
impl CustomerType {
    /// Orders placed by this customer, newest first.
    async fn orders(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<OrderType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let orders = store::orders::for_customer(&mut conn, self.customer_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(orders.into_iter().map(OrderType::from).collect())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Product", complex)]
pub struct ProductType {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    pub product_id: Uuid,
}

impl From<Product> for ProductType {
    fn from(product: Product) -> Self {
        Self {
            id: ID::from(product.id.to_string()),
            name: product.name,
            description: product.description,
            price: Decimal(product.price),
            stock: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
            product_id: product.id,
        }
    }
}

#[ComplexObject]
impl ProductType {
    async fn orders(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<OrderType>> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let orders = store::orders::for_product(&mut conn, self.product_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(orders.into_iter().map(OrderType::from).collect())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Order", complex)]
pub struct OrderType {
    pub id: ID,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    pub customer_id: Uuid,
    #[graphql(skip)]
    pub product_id: Uuid,
}

impl From<Order> for OrderType {
    fn from(order: Order) -> Self {
        Self {
            id: ID::from(order.id.to_string()),
            quantity: order.quantity,
            total_amount: Decimal(order.total_amount),
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            customer_id: order.customer_id,
            product_id: order.product_id,
        }
    }
}

#[ComplexObject]
impl OrderType {
    async fn customer(&self, ctx: &Context<'_>) -> async_graphql::Result<CustomerType> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let record = store::customers::find(&mut conn, self.customer_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(CustomerType::from(record))
    }

    async fn product(&self, ctx: &Context<'_>) -> async_graphql::Result<ProductType> {
        let mut conn = connection(ctx).await.map_err(|e| e.extend())?;
        let product = store::products::find(&mut conn, self.product_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(ProductType::from(product))
    }
}

/******************************************/
// Input types
/******************************************/
#[derive(InputObject, Debug, Clone)]
pub struct CustomerInput {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerInput {
    pub fn validate(self) -> Result<CustomerDraft, CrmError> {
        let username = UserName::parse(self.username).map_err(CrmError::ValidationError)?;
        let email = UserEmail::parse(self.email).map_err(CrmError::ValidationError)?;
        let phone = optional_text(self.phone)
            .map(CustomerPhone::parse)
            .transpose()
            .map_err(CrmError::ValidationError)?;
        Ok(CustomerDraft {
            username,
            email,
            first_name: optional_text(self.first_name).unwrap_or_default(),
            last_name: optional_text(self.last_name).unwrap_or_default(),
            phone,
            address: optional_text(self.address),
        })
    }
}

#[derive(Debug)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

impl ProductInput {
    pub fn validate(self) -> Result<ProductDraft, CrmError> {
        Ok(ProductDraft {
            name: ProductName::parse(self.name).map_err(CrmError::ValidationError)?,
            description: optional_text(self.description),
            price: ProductPrice::parse(self.price.0).map_err(CrmError::ValidationError)?,
            stock: StockLevel::parse(self.stock).map_err(CrmError::ValidationError)?,
        })
    }
}

/******************************************/
// Mutation payloads
/******************************************/
fn failure(operation: &str, err: &CrmError) -> (Option<String>, Option<ErrorKind>) {
    tracing::warn!(operation, error = %err, "Mutation failed");
    (Some(err.to_string()), Some(err.kind()))
}

#[derive(SimpleObject)]
pub struct CreateCustomerPayload {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<ErrorKind>,
    pub customer: Option<CustomerType>,
}

impl From<Result<CustomerRecord, CrmError>> for CreateCustomerPayload {
    fn from(result: Result<CustomerRecord, CrmError>) -> Self {
        match result {
            Ok(record) => Self {
                success: true,
                message: Some("Customer created successfully".to_string()),
                error: None,
                customer: Some(CustomerType::from(record)),
            },
            Err(err) => {
                let (message, error) = failure("createCustomer", &err);
                Self {
                    success: false,
                    message,
                    error,
                    customer: None,
                }
            }
        }
    }
}

/// One rejected entry of a bulk customer import.
#[derive(SimpleObject, Debug, Clone)]
pub struct BulkCustomerError {
    pub index: i32,
    pub email: String,
    pub message: String,
    pub error: ErrorKind,
}

#[derive(SimpleObject)]
pub struct BulkCreateCustomersPayload {
    pub success: bool,
    pub customers: Vec<CustomerType>,
    pub errors: Vec<BulkCustomerError>,
}

#[derive(SimpleObject)]
pub struct CreateProductPayload {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<ErrorKind>,
    pub product: Option<ProductType>,
}

impl From<Result<Product, CrmError>> for CreateProductPayload {
    fn from(result: Result<Product, CrmError>) -> Self {
        match result {
            Ok(product) => Self {
                success: true,
                message: Some("Product created successfully".to_string()),
                error: None,
                product: Some(ProductType::from(product)),
            },
            Err(err) => {
                let (message, error) = failure("createProduct", &err);
                Self {
                    success: false,
                    message,
                    error,
                    product: None,
                }
            }
        }
    }
}

#[derive(SimpleObject)]
pub struct CreateOrderPayload {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<ErrorKind>,
    pub order: Option<OrderType>,
}

impl From<Result<Order, CrmError>> for CreateOrderPayload {
    fn from(result: Result<Order, CrmError>) -> Self {
        match result {
            Ok(order) => Self {
                success: true,
                message: Some("Order created successfully".to_string()),
                error: None,
                order: Some(OrderType::from(order)),
            },
            Err(err) => {
                let (message, error) = failure("createOrder", &err);
                Self {
                    success: false,
                    message,
                    error,
                    order: None,
                }
            }
        }
    }
}

#[derive(SimpleObject)]
pub struct UpdateLowStockProductsPayload {
    pub success: bool,
    pub message: String,
    pub error: Option<ErrorKind>,
    pub updated_products: Vec<ProductType>,
}

impl From<Result<Vec<Product>, CrmError>> for UpdateLowStockProductsPayload {
    fn from(result: Result<Vec<Product>, CrmError>) -> Self {
        match result {
            Ok(products) => {
                let message = if products.is_empty() {
                    "No products found with low stock".to_string()
                } else {
                    format!(
                        "Successfully updated {} products with low stock",
                        products.len()
                    )
                };
                Self {
                    success: true,
                    message,
                    error: None,
                    updated_products: products.into_iter().map(ProductType::from).collect(),
                }
            }
            Err(err) => {
                let (_, error) = failure("updateLowStockProducts", &err);
                Self {
                    success: false,
                    message: format!("Error updating low stock products: {}", err),
                    error,
                    updated_products: Vec::new(),
                }
            }
        }
    }
}
