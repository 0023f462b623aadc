use crate::helper::{graphql_request, spawn_app, CREATE_ORDER};
use serde_json::json;

#[tokio::test]
async fn order_total_is_price_times_quantity() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "19.99", 10).await;

    let payload = app.create_order(&customer, &product, 3).await;

    assert_eq!(payload["success"], true);
    assert_eq!(payload["error"], json!(null));
    assert_eq!(payload["order"]["totalAmount"], "59.97");
    assert_eq!(payload["order"]["quantity"], 3);
    assert_eq!(payload["order"]["status"], "PENDING");
    assert_eq!(payload["order"]["customer"]["user"]["email"], "alice@example.com");
    assert_eq!(payload["order"]["product"]["stock"], 7);
    assert_eq!(app.product_stock(&product).await, 7);
    app.cleanup();
}

#[tokio::test]
async fn insufficient_stock_leaves_no_trace() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "19.99", 3).await;

    let payload = app.create_order(&customer, &product, 5).await;

    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "INSUFFICIENT_STOCK");
    assert_eq!(payload["order"], json!(null));
    assert_eq!(app.product_stock(&product).await, 3);

    let body = app.graphql("{ allOrders { id } }", json!({})).await;
    assert_eq!(body["data"]["allOrders"], json!([]));
    app.cleanup();
}

#[tokio::test]
async fn ordering_the_whole_stock_is_allowed() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "2.50", 4).await;

    let payload = app.create_order(&customer, &product, 4).await;

    assert_eq!(payload["success"], true);
    assert_eq!(payload["order"]["totalAmount"], "10.00");
    assert_eq!(app.product_stock(&product).await, 0);
    app.cleanup();
}

#[tokio::test]
async fn totals_beyond_the_amount_column_are_validation_failures() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Yacht", "60000000.00", 5).await;

    let payload = app.create_order(&customer, &product, 2).await;

    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "VALIDATION_FAILURE");
    assert_eq!(app.product_stock(&product).await, 5);

    let payload = app.create_order(&customer, &product, 1).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["order"]["totalAmount"], "60000000.00");
    app.cleanup();
}

#[tokio::test]
async fn free_products_total_zero_with_cents() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Sticker", "0", 5).await;

    let payload = app.create_order(&customer, &product, 2).await;

    assert_eq!(payload["success"], true);
    assert_eq!(payload["order"]["totalAmount"], "0.00");
    app.cleanup();
}

#[tokio::test]
async fn unknown_customer_or_product_is_not_found() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "19.99", 10).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let payload = app.create_order(&missing, &product, 1).await;
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "NOT_FOUND");

    let payload = app.create_order(&customer, &missing, 1).await;
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "NOT_FOUND");

    assert_eq!(app.product_stock(&product).await, 10);
    app.cleanup();
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "19.99", 10).await;

    for quantity in [0, -2] {
        let payload = app.create_order(&customer, &product, quantity).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "VALIDATION_FAILURE");
    }
    assert_eq!(app.product_stock(&product).await, 10);
    app.cleanup();
}

#[tokio::test]
async fn malformed_ids_are_validation_failures() {
    let app = spawn_app().await;

    let payload = app.create_order("not-a-uuid", "also-not-a-uuid", 1).await;

    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "VALIDATION_FAILURE");
    app.cleanup();
}

#[tokio::test]
async fn orders_are_reachable_from_customers_and_products() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "1.00", 10).await;
    let order_id = app.create_order(&customer, &product, 2).await["order"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let body = app
        .graphql(
            r#"query Links($c: ID!, $p: ID!, $o: ID!) {
                customer(id: $c) { orders { id } }
                product(id: $p) { orders { id } }
                order(id: $o) { customer { id } product { id } }
            }"#,
            json!({ "c": customer, "p": product, "o": order_id }),
        )
        .await;

    let data = &body["data"];
    assert_eq!(data["customer"]["orders"][0]["id"], order_id.as_str());
    assert_eq!(data["product"]["orders"][0]["id"], order_id.as_str());
    assert_eq!(data["order"]["customer"]["id"], customer.as_str());
    assert_eq!(data["order"]["product"]["id"], product.as_str());
    app.cleanup();
}

#[tokio::test]
async fn concurrent_orders_never_oversell() {
    let app = spawn_app().await;
    let customer = app.create_customer("alice", "alice@example.com").await;
    let product = app.create_product("Bottle", "1.00", 5).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = app.api_client.clone();
        let address = app.address.clone();
        let variables = json!({
            "customerId": customer,
            "productId": product,
            "quantity": 1
        });
        handles.push(tokio::spawn(async move {
            graphql_request(&client, &address, CREATE_ORDER, variables).await
        }));
    }

    let mut succeeded = 0;
    let mut out_of_stock = 0;
    for handle in handles {
        let body = handle.await.expect("Order task panicked");
        let payload = &body["data"]["createOrder"];
        if payload["success"] == true {
            succeeded += 1;
        } else {
            assert_eq!(payload["error"], "INSUFFICIENT_STOCK");
            out_of_stock += 1;
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(out_of_stock, 5);
    assert_eq!(app.product_stock(&product).await, 0);

    let body = app.graphql("{ allOrders { id } }", json!({})).await;
    assert_eq!(body["data"]["allOrders"].as_array().unwrap().len(), 5);
    app.cleanup();
}
