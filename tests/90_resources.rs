//! Full request flows against a live database. Skipped unless `DATABASE_URL` is set.

mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use common::{unique_email, TestServer};

async fn login(client: &Client, server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["expiresIn"], 3600);
    Ok(body["token"].as_str().expect("token").to_string())
}

async fn signed_in(client: &Client, server: &TestServer) -> Result<String> {
    let email = unique_email("resources");
    let res = client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": email, "password": "orchard123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    login(client, server, &email, "orchard123").await
}

#[tokio::test]
async fn signup_login_and_me() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let email = unique_email("Grower");

    let res = client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: Value = res.json().await?;
    assert_eq!(user["email"], email.to_lowercase());
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());

    // Same address again, different case
    let res = client
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": email.to_uppercase(), "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Invalid credentials");

    let res = client
        .post(server.url("/auth/login"))
        .json(&json!({ "email": unique_email("nobody"), "password": "secret1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = login(&client, &server, &email, "secret1").await?;
    let res = client.get(server.url("/auth/me")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["userId"], user["id"]);
    Ok(())
}

#[tokio::test]
async fn product_lifecycle() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let token = signed_in(&client, &server).await?;
    let tag = unique_email("fuji").replace(['@', '.'], "-");
    let name = format!("Fuji apple {tag}");

    let res = client
        .post(server.url("/products"))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("  {name} "), "unitPrice": 32000, "unit": "10kg box" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await?;
    assert_eq!(product["name"], name.as_str());
    let id = product["id"].as_i64().expect("id");

    // Reads need no token
    let res = client.get(server.url(&format!("/products/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "unitPrice": 30000 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["unitPrice"], 30000);
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["unit"], "10kg box");

    let res = client
        .get(server.url("/products"))
        .query(&[("search", tag.to_uppercase().as_str()), ("take", "100")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await?;
    assert_eq!(page["take"], 100);
    assert_eq!(page["total"], 1);
    assert!(page["list"]
        .as_array()
        .expect("list")
        .iter()
        .any(|p| p["id"] == id));

    let res = client
        .delete(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty());

    let res = client
        .delete(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(server.url(&format!("/products/{id}"))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Product not found");

    let res = client
        .put(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "name": "Gone" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn sales_link_products_and_customers() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let token = signed_in(&client, &server).await?;

    let product: Value = client
        .post(server.url("/products"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Hongro", "unitPrice": 25000, "unit": "box" }))
        .send()
        .await?
        .json()
        .await?;
    let customer: Value = client
        .post(server.url("/customers"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kim", "phone": "010-1234-5678", "memo": "weekly" }))
        .send()
        .await?
        .json()
        .await?;
    let (product_id, customer_id) = (&product["id"], &customer["id"]);

    // Unknown product collapses to 404
    let res = client
        .post(server.url("/sales"))
        .bearer_auth(&token)
        .json(&json!({
            "date": "2024-03-01",
            "quantity": 1,
            "totalPrice": 25000,
            "productId": 2147483647
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(server.url("/sales"))
        .bearer_auth(&token)
        .json(&json!({
            "date": "2024-03-01",
            "quantity": 2,
            "totalPrice": 50000,
            "productId": product_id,
            "customerId": customer_id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await?;
    assert_eq!(sale["customerId"], *customer_id);
    let sale_id = sale["id"].as_i64().expect("id");

    let res = client
        .post(server.url("/sales"))
        .bearer_auth(&token)
        .json(&json!({
            "date": "2024-03-02T09:30:00Z",
            "quantity": 1,
            "totalPrice": 25000,
            "productId": product_id
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let page: Value = client
        .get(server.url(&format!("/products/{product_id}/sales")))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 2);
    let list = page["list"].as_array().expect("list");
    // Newest first; the walk-in sale has no customer
    assert_eq!(list[0]["customerName"], Value::Null);
    assert_eq!(list[1]["customerName"], "Kim");
    assert_eq!(list[1]["productName"], "Hongro");

    let page: Value = client
        .get(server.url(&format!("/customers/{customer_id}/sales")))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 1);

    let page: Value = client
        .get(server.url(&format!("/sales?customerId={customer_id}")))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 1);

    // Explicit null detaches the customer
    let res = client
        .put(server.url(&format!("/sales/{sale_id}")))
        .bearer_auth(&token)
        .json(&json!({ "customerId": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let sale: Value = res.json().await?;
    assert_eq!(sale["customerId"], Value::Null);
    assert_eq!(sale["quantity"], 2);
    Ok(())
}

#[tokio::test]
async fn posts_round_trip_and_ready_reports_ok() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let token = signed_in(&client, &server).await?;

    let res = client.get(server.url("/ready")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/posts"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Harvest notes", "content": "Started picking today." }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let post: Value = res.json().await?;
    let id = post["id"].as_i64().expect("id");

    let res = client
        .put(server.url(&format!("/posts/{id}")))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let unchanged: Value = res.json().await?;
    assert_eq!(unchanged["title"], "Harvest notes");

    let res = client
        .delete(server.url(&format!("/posts/{id}")))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn customer_lifecycle_and_memo_clearing() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let token = signed_in(&client, &server).await?;

    let res = client
        .post(server.url("/customers"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Park", "phone": "010-9876-5432", "memo": "prefers morning delivery" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let customer: Value = res.json().await?;
    let id = customer["id"].as_i64().expect("id");
    let url = server.url(&format!("/customers/{id}"));

    let res = client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await?;
    assert_eq!(fetched["memo"], "prefers morning delivery");

    // Absent memo is left alone
    let res = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "phone": "010-1111-2222" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["phone"], "010-1111-2222");
    assert_eq!(updated["memo"], "prefers morning delivery");

    // Explicit null clears it
    let res = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "memo": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared: Value = res.json().await?;
    assert_eq!(cleared["memo"], Value::Null);
    assert_eq!(cleared["name"], "Park");

    let fetched: Value = client.get(&url).send().await?.json().await?;
    assert_eq!(fetched["memo"], Value::Null);

    let res = client.delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Customer not found");
    Ok(())
}

#[tokio::test]
async fn referenced_rows_and_broken_updates_are_404() -> Result<()> {
    let Some(server) = TestServer::start().await? else {
        return Ok(());
    };
    let client = Client::new();
    let token = signed_in(&client, &server).await?;

    let product: Value = client
        .post(server.url("/products"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Gamhong", "unitPrice": 28000, "unit": "box" }))
        .send()
        .await?
        .json()
        .await?;
    let customer: Value = client
        .post(server.url("/customers"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Choi", "phone": "010-5555-0000" }))
        .send()
        .await?
        .json()
        .await?;
    let (product_id, customer_id) = (&product["id"], &customer["id"]);

    let sale: Value = client
        .post(server.url("/sales"))
        .bearer_auth(&token)
        .json(&json!({
            "date": "2024-04-10",
            "quantity": 3,
            "totalPrice": 84000,
            "productId": product_id,
            "customerId": customer_id
        }))
        .send()
        .await?
        .json()
        .await?;
    let sale_url = server.url(&format!("/sales/{}", sale["id"]));
    let product_url = server.url(&format!("/products/{product_id}"));
    let customer_url = server.url(&format!("/customers/{customer_id}"));

    // A sale still points at both
    let res = client.delete(&product_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Product not found");

    let res = client.delete(&customer_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(&product_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Foreign key violation on update
    let res = client
        .put(&sale_url)
        .bearer_auth(&token)
        .json(&json!({ "productId": 2147483647 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Sale not found or invalid data");

    let unchanged: Value = client.get(&sale_url).send().await?.json().await?;
    assert_eq!(unchanged["productId"], *product_id);

    // Once the sale is gone both parents can be deleted
    let res = client.delete(&sale_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.delete(&product_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.delete(&customer_url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}
