use super::client::GraphqlClient;
use super::log_file::LogFile;
use crate::errors::job::JobError;
use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const ORDERS_QUERY: &str = r#"
    query RecentOrders {
        allOrders {
            id
            createdAt
            status
            totalAmount
            customer {
                user {
                    email
                }
            }
        }
    }
"#;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersData {
    all_orders: Vec<OrderSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub created_at: String,
    pub status: String,
    pub total_amount: String,
    pub customer: Option<OrderCustomer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderCustomer {
    pub user: Option<OrderUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderUser {
    pub email: Option<String>,
}

impl OrderSummary {
    pub fn customer_email(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|customer| customer.user.as_ref())
            .and_then(|user| user.email.as_deref())
            .unwrap_or("no-email")
    }
}

/// Orders split by whether they fall inside the reminder window.
#[derive(Debug, Default)]
pub struct RecentOrders {
    pub recent: Vec<OrderSummary>,
    /// `(order id, parse error)` for timestamps that could not be read.
    pub unparseable: Vec<(String, String)>,
}

/// Keeps orders created at or after `now - window`. A window reaching past the
/// earliest representable time keeps every order.
pub fn filter_recent_orders(
    orders: Vec<OrderSummary>,
    now: DateTime<Utc>,
    window: TimeDelta,
) -> RecentOrders {
    let cutoff = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut result = RecentOrders::default();
    for order in orders {
        match DateTime::parse_from_rfc3339(&order.created_at) {
            Ok(created_at) if created_at.with_timezone(&Utc) >= cutoff => {
                result.recent.push(order)
            }
            Ok(_) => {}
            Err(err) => result.unparseable.push((order.id, err.to_string())),
        }
    }
    result
}

/// Logs every order placed within the last `window_days` days.
///
/// A bad timestamp only skips that order; failing to fetch the orders at all
/// fails the run.
#[instrument(name = "Order reminders", skip(client, log, now))]
pub async fn send_order_reminders(
    client: &GraphqlClient,
    log: &LogFile,
    window_days: i64,
    now: DateTime<Local>,
) -> Result<Vec<OrderSummary>, JobError> {
    let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let line = |message: &str| format!("{} - {}", stamp, message);

    log.append(&line("Starting order reminders processing"))?;

    let Some(window) = TimeDelta::try_days(window_days).filter(|_| window_days >= 0) else {
        let err = JobError::InvalidArgument(format!(
            "{} is not a valid reminder window in days",
            window_days
        ));
        log.append(&line(&err.to_string()))?;
        return Err(err);
    };

    let orders = match client.execute::<OrdersData>(ORDERS_QUERY, json!({})).await {
        Ok(data) => data.all_orders,
        Err(err) => {
            log.append(&line(&format!("Error querying GraphQL: {}", err)))?;
            return Err(err);
        }
    };

    let RecentOrders {
        recent,
        unparseable,
    } = filter_recent_orders(orders, now.with_timezone(&Utc), window);

    for (id, err) in &unparseable {
        tracing::warn!(order_id = %id, error = %err, "Skipping order with unreadable timestamp");
        log.append(&line(&format!("Error parsing date for order {}: {}", id, err)))?;
    }

    log.append(&line(&format!(
        "Found {} orders within the last {} days",
        recent.len(),
        window_days
    )))?;
    for order in &recent {
        log.append(&line(&format!(
            "Order ID: {}, Customer Email: {}, Date: {}, Status: {}, Amount: {}",
            order.id,
            order.customer_email(),
            order.created_at,
            order.status,
            order.total_amount
        )))?;
    }
    log.append(&line("Order reminders processing completed successfully"))?;
    Ok(recent)
}
