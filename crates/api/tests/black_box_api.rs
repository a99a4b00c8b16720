use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use conrod_api::app::services::AppServices;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        conrod_observability::init_for_tests();

        // Same router as prod over an in-memory store, bound to an ephemeral port.
        let app = conrod_api::app::router(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.patch(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.delete(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn product(&self, name: &str, product_type: &str, quantity: i64) -> (StatusCode, Value) {
        self.post(
            "/api/products",
            json!({
                "productName": name,
                "productType": product_type,
                "quantity": quantity,
                "date": "2024-05-01",
            }),
        )
        .await
    }

    async fn conrod(&self, name: &str, pin: &str, ball_bearing: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/conrods",
                json!({ "name": name, "pin": pin, "ballBearing": ball_bearing }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn quantity_of(&self, name: &str) -> i64 {
        let (_, products) = self.get("/api/products").await;
        products
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["productName"] == name)
            .and_then(|p| p["quantity"].as_i64())
            .unwrap()
    }

    async fn production_quantity(&self, id: &str) -> i64 {
        let (_, records) = self.get("/api/production").await;
        records
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == id)
            .and_then(|r| r["quantity"].as_i64())
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public_and_ok() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn assemble_bill_and_reverse_end_to_end() {
    let srv = TestServer::spawn().await;

    srv.product("P1", "Pin", 10).await;
    srv.product("BB1", "Ball Bearing", 10).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;
    assert_eq!(conrod["srNo"], 1);

    let (status, record) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 4, "date": "2024-05-02" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{record}");
    assert_eq!(record["quantity"], 4);
    assert_eq!(srv.quantity_of("P1").await, 6);
    assert_eq!(srv.quantity_of("BB1").await, 6);

    let record_id = record["id"].as_str().unwrap().to_string();
    let (status, bill) = srv
        .post(
            "/api/bills",
            json!({
                "invoiceNo": "INV-1",
                "productId": record_id,
                "quantity": 3,
                "amount": 300,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{bill}");
    assert_eq!(bill["amount"], "300");
    assert_eq!(srv.production_quantity(&record_id).await, 1);

    let (status, deleted) = srv
        .delete(&format!("/api/bills/{}", bill["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deletedBillId"], bill["id"]);
    assert_eq!(deleted["updatedProductionRecord"]["quantity"], 4);
    assert_eq!(srv.production_quantity(&record_id).await, 4);
}

#[tokio::test]
async fn duplicate_product_is_topped_up() {
    let srv = TestServer::spawn().await;

    let (status, created) = srv.product("Bolt", "Pin", 5).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, merged) = srv.product("bolt", " Pin", 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["id"], created["id"]);
    assert_eq!(merged["quantity"], 8);

    let (_, products) = srv.get("/api/products").await;
    assert_eq!(products.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn shortfall_is_reported_and_nothing_changes() {
    let srv = TestServer::spawn().await;

    srv.product("P1", "Pin", 10).await;
    srv.product("BB1", "Ball Bearing", 3).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;

    let (status, plan) = srv
        .get(&format!(
            "/api/production/plan?conrodId={}&quantity=4",
            conrod["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["pin"]["sufficient"], true);
    assert_eq!(plan["ballBearing"]["sufficient"], false);
    assert_eq!(plan["ballBearing"]["available"], 3);

    let (status, err) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 4, "date": "2024-05-02" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "insufficient_stock");

    let (_, records) = srv.get("/api/production").await;
    assert!(records.as_array().unwrap().is_empty());
    assert_eq!(srv.quantity_of("P1").await, 10);
}

#[tokio::test]
async fn missing_component_is_distinguished_from_shortfall() {
    let srv = TestServer::spawn().await;

    srv.product("BB1", "Ball Bearing", 10).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;

    let (status, err) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 1, "date": "2024-05-02" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "component_unavailable");
}

#[tokio::test]
async fn serials_are_not_reused_after_delete() {
    let srv = TestServer::spawn().await;

    let first = srv.conrod("CR-A", "P1", "BB1").await;
    let (status, _) = srv
        .delete(&format!("/api/conrods/{}", first["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let second = srv.conrod("CR-B", "P1", "BB1").await;
    assert_eq!(second["srNo"], 2);
}

#[tokio::test]
async fn import_assigns_increasing_serials() {
    let srv = TestServer::spawn().await;

    let mut rows: Vec<Value> = (0..50)
        .map(|n| json!({ "name": format!("CR-{n}"), "pin": "P1", "ballBearing": "BB1" }))
        .collect();
    rows.push(json!({ "name": "", "pin": "P1", "ballBearing": "BB1" }));

    let (status, report) = srv.post("/api/conrods/import", Value::Array(rows)).await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(report["failed"][0]["row"], 50);

    let serials: Vec<i64> = report["imported"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["srNo"].as_i64().unwrap())
        .collect();
    assert_eq!(serials, (1..=50).collect::<Vec<i64>>());
}

#[tokio::test]
async fn invoice_lines_are_billed_and_grouped() {
    let srv = TestServer::spawn().await;

    srv.product("P1", "Pin", 20).await;
    srv.product("BB1", "Ball Bearing", 20).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;
    let (_, record) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 10, "date": "2024-05-02" }),
        )
        .await;
    let (_, customer) = srv
        .post("/api/customers", json!({ "name": "Acme Motors", "address": "Pune" }))
        .await;

    let (status, outcome) = srv
        .post(
            "/api/invoices",
            json!({
                "invoiceNo": "INV-7",
                "customerId": customer["id"],
                "lines": [
                    { "productId": record["id"], "quantity": 2, "unitRate": 100 },
                    { "productId": record["id"], "quantity": 3, "unitRate": 90 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{outcome}");
    assert_eq!(outcome["created"].as_array().unwrap().len(), 2);
    assert_eq!(srv.production_quantity(record["id"].as_str().unwrap()).await, 5);

    let (_, invoices) = srv.get("/api/invoices").await;
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["invoiceNo"], "INV-7");
    assert_eq!(invoices[0]["customerId"], customer["id"]);
    assert_eq!(invoices[0]["subtotal"], "470");
}

#[tokio::test]
async fn manual_production_update_rejects_negative_quantity() {
    let srv = TestServer::spawn().await;

    srv.product("P1", "Pin", 10).await;
    srv.product("BB1", "Ball Bearing", 10).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;
    let (_, record) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 2, "date": "2024-05-02" }),
        )
        .await;
    let path = format!("/api/production/{}", record["id"].as_str().unwrap());

    let (status, err) = srv.patch(&path, json!({ "quantity": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");

    let (status, updated) = srv.patch(&path, json!({ "quantity": 7, "size": "STD" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], 7);
    assert_eq!(updated["size"], "STD");
}

#[tokio::test]
async fn bad_ids_and_unknown_rows() {
    let srv = TestServer::spawn().await;

    let (status, err) = srv.delete("/api/bills/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "invalid_id");

    let (status, err) = srv
        .delete("/api/bills/01890a5d-ac96-774b-bcce-b302099a8057")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "not_found");

    let (status, _) = srv
        .patch(
            "/api/products/01890a5d-ac96-774b-bcce-b302099a8057",
            json!({ "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_are_json_validation_errors() {
    let srv = TestServer::spawn().await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;

    let (status, err) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
    assert!(err["message"].as_str().unwrap().contains("date"));

    let (status, err) = srv
        .post("/api/bills", json!({ "invoiceNo": "INV-1", "quantity": "three" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");

    let (status, err) = srv.get("/api/production/plan?quantity=4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
}

#[tokio::test]
async fn oversized_invoice_lines_fail_without_breaking_the_listing() {
    let srv = TestServer::spawn().await;

    srv.product("P1", "Pin", 10).await;
    srv.product("BB1", "Ball Bearing", 10).await;
    let conrod = srv.conrod("CR-A", "P1", "BB1").await;
    let (_, record) = srv
        .post(
            "/api/production",
            json!({ "conrodId": conrod["id"], "quantity": 5, "date": "2024-05-02" }),
        )
        .await;

    let (status, outcome) = srv
        .post(
            "/api/invoices",
            json!({
                "invoiceNo": "INV-8",
                "lines": [
                    { "productId": record["id"], "quantity": i64::MAX, "unitRate": "100000000000" },
                    { "productId": record["id"], "quantity": 1, "unitRate": 40 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::MULTI_STATUS, "{outcome}");
    assert_eq!(outcome["failed"][0]["line"], 0);
    assert_eq!(outcome["created"].as_array().unwrap().len(), 1);

    let (status, invoices) = srv.get("/api/invoices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoices[0]["subtotal"], "40");
}
