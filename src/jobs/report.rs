use super::client::GraphqlClient;
use super::log_file::LogFile;
use crate::errors::job::JobError;
use crate::graphql::scalars::two_decimal_places;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Local};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::instrument;

const CUSTOMERS_QUERY: &str = "query ReportCustomers { allCustomers { id } }";
const ORDERS_QUERY: &str = "query ReportOrders { allOrders { id totalAmount } }";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomersData {
    all_customers: Vec<IgnoredAny>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersData {
    all_orders: Vec<OrderAmount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAmount {
    pub id: String,
    pub total_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrmReport {
    pub total_customers: usize,
    pub total_orders: usize,
    pub total_revenue: BigDecimal,
}

impl CrmReport {
    pub fn formatted_revenue(&self) -> String {
        format!("${}", two_decimal_places(&self.total_revenue))
    }
}

/// Sums order totals in fixed point. Orders without a total are ignored.
pub fn total_revenue(orders: &[OrderAmount]) -> Result<BigDecimal, JobError> {
    orders
        .iter()
        .filter_map(|order| order.total_amount.as_deref().map(|amount| (&order.id, amount)))
        .try_fold(BigDecimal::zero(), |sum, (id, amount)| {
            let amount = BigDecimal::from_str(amount).map_err(|err| {
                JobError::InvalidResponse(format!("order {} has total {:?}: {}", id, amount, err))
            })?;
            Ok(sum + amount)
        })
}

async fn collect_report(client: &GraphqlClient) -> Result<CrmReport, JobError> {
    let customers: CustomersData = client.execute(CUSTOMERS_QUERY, json!({})).await?;
    let orders: OrdersData = client.execute(ORDERS_QUERY, json!({})).await?;
    Ok(CrmReport {
        total_customers: customers.all_customers.len(),
        total_orders: orders.all_orders.len(),
        total_revenue: total_revenue(&orders.all_orders)?,
    })
}

/// Logs a one-line summary of customers, orders and revenue. Failures are
/// logged and returned so the caller can mark the run as failed.
#[instrument(name = "CRM report", skip(client, log, now))]
pub async fn generate_crm_report(
    client: &GraphqlClient,
    log: &LogFile,
    now: DateTime<Local>,
) -> Result<CrmReport, JobError> {
    let timestamp = now.format("%Y-%m-%d %H:%M:%S");
    match collect_report(client).await {
        Ok(report) => {
            log.append(&format!(
                "{} - Report: {} customers, {} orders, {} revenue",
                timestamp,
                report.total_customers,
                report.total_orders,
                report.formatted_revenue()
            ))?;
            tracing::info!(
                customers = report.total_customers,
                orders = report.total_orders,
                revenue = %report.total_revenue,
                "CRM report generated"
            );
            Ok(report)
        }
        Err(err) => {
            log.append(&format!(
                "{} - Error generating CRM report: {}",
                timestamp, err
            ))?;
            Err(err)
        }
    }
}
