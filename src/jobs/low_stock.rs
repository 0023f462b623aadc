use super::client::GraphqlClient;
use super::log_file::LogFile;
use crate::errors::job::JobError;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const UPDATE_LOW_STOCK_MUTATION: &str = r#"
    mutation UpdateLowStockProducts($threshold: Int!, $increment: Int!) {
        updateLowStockProducts(threshold: $threshold, increment: $increment) {
            success
            message
            updatedProducts {
                id
                name
                stock
                price
            }
        }
    }
"#;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLowStockData {
    update_low_stock_products: UpdateLowStockResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLowStockResult {
    success: bool,
    message: String,
    updated_products: Vec<RestockedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestockedProduct {
    pub id: String,
    pub name: String,
    pub stock: i32,
    pub price: String,
}

/// Runs the restock mutation and records every product it touched.
#[instrument(name = "Low stock sweep", skip(client, log, now))]
pub async fn update_low_stock(
    client: &GraphqlClient,
    log: &LogFile,
    threshold: i32,
    increment: i32,
    now: DateTime<Local>,
) -> Result<Vec<RestockedProduct>, JobError> {
    let timestamp = now.format("%d/%m/%Y-%H:%M:%S");
    log.append(&format!("{} Low stock update initiated", timestamp))?;

    let variables = json!({ "threshold": threshold, "increment": increment });
    let result = match client
        .execute::<UpdateLowStockData>(UPDATE_LOW_STOCK_MUTATION, variables)
        .await
    {
        Ok(data) => data.update_low_stock_products,
        Err(err) => {
            log.append(&format!("{} Error in low stock update: {}", timestamp, err))?;
            return Err(err);
        }
    };

    if !result.success {
        log.append(&format!(
            "{} Low stock update failed: {}",
            timestamp, result.message
        ))?;
        return Err(JobError::MutationFailure(result.message));
    }

    log.append(&format!("{} {}", timestamp, result.message))?;
    for product in &result.updated_products {
        log.append(&format!(
            "{} Updated Product ID: {}, Name: {}, New Stock: {}",
            timestamp, product.id, product.name, product.stock
        ))?;
    }
    tracing::info!(updated = result.updated_products.len(), "Low stock sweep finished");
    Ok(result.updated_products)
}
