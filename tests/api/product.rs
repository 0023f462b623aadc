use crate::helper::spawn_app;
use serde_json::json;

const RESTOCK: &str = r#"
    mutation Restock($threshold: Int!, $increment: Int!) {
        updateLowStockProducts(threshold: $threshold, increment: $increment) {
            success
            message
            error
            updatedProducts { id name stock }
        }
    }
"#;

fn names(products: &serde_json::Value) -> Vec<String> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_product_defaults_stock_to_zero() {
    let app = spawn_app().await;

    let body = app
        .graphql(
            r#"mutation {
                createProduct(name: "Laptop", description: "14 inch", price: "999.9") {
                    success
                    product { name description price stock }
                }
            }"#,
            json!({}),
        )
        .await;

    let payload = &body["data"]["createProduct"];
    assert_eq!(payload["success"], true);
    assert_eq!(payload["product"]["price"], "999.90");
    assert_eq!(payload["product"]["stock"], 0);
    assert_eq!(payload["product"]["description"], "14 inch");
    app.cleanup();
}

#[tokio::test]
async fn negative_price_or_stock_is_rejected() {
    let app = spawn_app().await;

    for (price, stock) in [("-1.00", 5), ("10.00", -5)] {
        let body = app
            .graphql(
                r#"mutation P($price: Decimal!, $stock: Int!) {
                    createProduct(name: "Broken", price: $price, stock: $stock) {
                        success
                        error
                        product { id }
                    }
                }"#,
                json!({ "price": price, "stock": stock }),
            )
            .await;
        let payload = &body["data"]["createProduct"];
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "VALIDATION_FAILURE");
        assert_eq!(payload["product"], json!(null));
    }

    let all = app.graphql("{ allProducts { id } }", json!({})).await;
    assert_eq!(all["data"]["allProducts"], json!([]));
    app.cleanup();
}

#[tokio::test]
async fn low_stock_products_respects_the_threshold() {
    let app = spawn_app().await;
    app.create_product("Dress", "50.00", 10).await;
    app.create_product("Bottle", "10.00", 5).await;
    app.create_product("Cap", "5.00", 0).await;
    app.create_product("Laptop", "999.00", 50).await;

    let query = "query Low($t: Int!) { lowStockProducts(threshold: $t) { name stock } }";

    let body = app.graphql(query, json!({ "t": 10 })).await;
    assert_eq!(names(&body["data"]["lowStockProducts"]), vec!["Bottle", "Cap"]);

    let body = app.graphql(query, json!({ "t": 0 })).await;
    assert!(names(&body["data"]["lowStockProducts"]).is_empty());

    let body = app.graphql(query, json!({ "t": 1000 })).await;
    assert_eq!(
        names(&body["data"]["lowStockProducts"]),
        vec!["Bottle", "Cap", "Dress", "Laptop"]
    );

    // Defaults to a threshold of 10.
    let body = app
        .graphql("{ lowStockProducts { name } }", json!({}))
        .await;
    assert_eq!(names(&body["data"]["lowStockProducts"]), vec!["Bottle", "Cap"]);
    app.cleanup();
}

#[tokio::test]
async fn restock_raises_only_products_below_threshold() {
    let app = spawn_app().await;
    let low = app.create_product("Bottle", "10.00", 5).await;
    let high = app.create_product("Laptop", "999.00", 20).await;

    let body = app
        .graphql(RESTOCK, json!({ "threshold": 10, "increment": 10 }))
        .await;

    let payload = &body["data"]["updateLowStockProducts"];
    assert_eq!(payload["success"], true);
    assert_eq!(
        payload["message"],
        "Successfully updated 1 products with low stock"
    );
    assert_eq!(payload["updatedProducts"][0]["id"], low.as_str());
    assert_eq!(payload["updatedProducts"][0]["stock"], 15);
    assert_eq!(app.product_stock(&high).await, 20);

    let body = app
        .graphql(RESTOCK, json!({ "threshold": 10, "increment": 10 }))
        .await;
    let payload = &body["data"]["updateLowStockProducts"];
    assert_eq!(payload["message"], "No products found with low stock");
    assert_eq!(payload["updatedProducts"], json!([]));
    app.cleanup();
}

#[tokio::test]
async fn repeated_restock_only_requalifies_products_still_below_threshold() {
    let app = spawn_app().await;
    let bottle = app.create_product("Bottle", "10.00", 5).await;
    let cap = app.create_product("Cap", "5.00", 25).await;

    for _ in 0..2 {
        let body = app
            .graphql(RESTOCK, json!({ "threshold": 30, "increment": 10 }))
            .await;
        assert_eq!(body["data"]["updateLowStockProducts"]["success"], true);
    }

    assert_eq!(app.product_stock(&bottle).await, 25);
    assert_eq!(app.product_stock(&cap).await, 35);
    app.cleanup();
}

#[tokio::test]
async fn negative_increment_is_rejected() {
    let app = spawn_app().await;
    let bottle = app.create_product("Bottle", "10.00", 5).await;

    let body = app
        .graphql(RESTOCK, json!({ "threshold": 10, "increment": -10 }))
        .await;

    let payload = &body["data"]["updateLowStockProducts"];
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "VALIDATION_FAILURE");
    assert_eq!(app.product_stock(&bottle).await, 5);
    app.cleanup();
}

#[tokio::test]
async fn increments_that_overflow_stock_are_rejected() {
    let app = spawn_app().await;
    let bottle = app.create_product("Bottle", "10.00", 5).await;

    let body = app
        .graphql(RESTOCK, json!({ "threshold": 10, "increment": i32::MAX }))
        .await;

    let payload = &body["data"]["updateLowStockProducts"];
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "VALIDATION_FAILURE");
    assert_eq!(app.product_stock(&bottle).await, 5);
    app.cleanup();
}
