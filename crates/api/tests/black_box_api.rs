use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build the app (same router as prod, in-memory backend by default),
        // bound to an ephemeral port.
        let app = corebank_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_account(
    client: &reqwest::Client,
    base_url: &str,
    customer_id: &str,
    balance: i64,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/accounts", base_url))
        .json(&json!({
            "customerId": customer_id,
            "balance": balance,
            "name": "example account",
            "type": "Checking",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn create_then_search_by_customer_returns_materialized_balances() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_account(&client, &server.base_url, "cust-bb-1", 100).await;
    assert_eq!(created["type"], "checking"); // case-normalized
    assert_eq!(created["status"], "open");
    // Balances materialize from ledger lines on read, not on the create response.
    assert_eq!(created["balance"], 0);

    let res = client
        .get(format!("{}/accounts/search", server.base_url))
        .query(&[("customerId", "cust-bb-1")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let accounts: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["id"], created["id"]);
    assert_eq!(accounts[0]["balance"], 100);
    assert_eq!(accounts[0]["balancePending"], 0);
    assert_eq!(accounts[0]["balanceAvailable"], 100);
    assert!(accounts[0]["createdAt"].is_string());
}

#[tokio::test]
async fn routing_number_search_requires_the_exact_triple() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_account(&client, &server.base_url, "cust-bb-2", 250).await;
    let number = created["accountNumber"].as_str().unwrap();
    let routing = created["routingNumber"].as_str().unwrap();

    let res = client
        .get(format!("{}/accounts/search", server.base_url))
        .query(&[("number", number), ("routingNumber", routing), ("type", "checking")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let accounts: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["id"], created["id"]);
    assert_eq!(accounts[0]["balance"], 250);

    // A wrong triple is not-found, never a wrong account.
    let res = client
        .get(format!("{}/accounts/search", server.base_url))
        .query(&[("number", number), ("routingNumber", "000000000"), ("type", "checking")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_search_parameters_are_a_bad_request_not_a_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/accounts/search", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing_parameters");

    // An unknown customer is a 404 (distinct category).
    let res = client
        .get(format!("{}/accounts/search", server.base_url))
        .query(&[("customerId", "nobody")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sub_minimum_opening_balance_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/accounts", server.base_url))
        .json(&json!({
            "customerId": "cust-bb-3",
            "balance": 99,
            "name": "example account",
            "type": "checking",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn request_id_is_echoed_and_minted() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");

    // Without a caller-supplied id, one is minted.
    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(!res.headers()["x-request-id"].is_empty());
}
