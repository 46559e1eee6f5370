use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fintrack_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config).unwrap(),
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, json) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::OK, "POST {uri} failed: {json}");
        json
    }
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_openapi_are_served_outside_the_api_prefix() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (status, _) = app.get("/readyz").await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = app.get("/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/accounts"].is_object());
}

#[tokio::test]
async fn expense_moves_balance_and_credit_limit_is_enforced() {
    let app = test_app().await;
    let account = app
        .create(
            "/api/v1/accounts",
            json!({ "name": "Checking", "accountType": "CHECKING", "currency": "USD", "balance": 100 }),
        )
        .await;
    let account_id = id_of(&account);
    let category = app
        .create(
            "/api/v1/categories",
            json!({ "name": "Groceries", "kind": "EXPENSE" }),
        )
        .await;

    let txn = app
        .create(
            "/api/v1/transactions",
            json!({
                "accountId": account_id,
                "categoryId": id_of(&category),
                "kind": "EXPENSE",
                "amount": 40,
                "transactionDate": "2024-03-15"
            }),
        )
        .await;
    assert_eq!(txn["kind"], "EXPENSE");

    let (_, account) = app.get(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(account["balance"].as_f64(), Some(60.0));

    // No credit limit: the balance may not go below zero.
    let (status, body) = app
        .post(
            "/api/v1/transactions",
            json!({
                "accountId": account_id,
                "categoryId": id_of(&category),
                "kind": "EXPENSE",
                "amount": 61,
                "transactionDate": "2024-03-16"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (_, account) = app.get(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(account["balance"].as_f64(), Some(60.0));
    let (_, page) = app
        .get(&format!("/api/v1/transactions?accountId={account_id}"))
        .await;
    assert_eq!(page["total"], 1);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/transactions/{}", id_of(&txn)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, account) = app.get(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(account["balance"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn errors_carry_status_code_and_message() {
    let app = test_app().await;

    let (status, body) = app.get("/api/v1/accounts/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["message"].as_str().unwrap().contains("missing"));

    let (status, body) = app
        .post(
            "/api/v1/accounts",
            json!({ "name": "  ", "accountType": "CHECKING", "currency": "USD" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn second_budget_for_a_fiscal_year_conflicts() {
    let app = test_app().await;
    let budget = json!({ "name": "Plan 2024", "fiscalYear": 2024, "lines": [] });
    app.create("/api/v1/budgets", budget.clone()).await;

    let (status, body) = app.post("/api/v1/budgets", budget).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, list) = app.get("/api/v1/budgets?fiscalYear=2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn crossing_a_budget_threshold_raises_a_notification() {
    let app = test_app().await;
    let account = app
        .create(
            "/api/v1/accounts",
            json!({ "name": "Checking", "currency": "USD", "balance": 1000 }),
        )
        .await;
    let groceries = app
        .create(
            "/api/v1/categories",
            json!({ "name": "Groceries", "kind": "EXPENSE" }),
        )
        .await;
    let budget = app
        .create(
            "/api/v1/budgets",
            json!({
                "name": "Plan 2024",
                "fiscalYear": 2024,
                "lines": [{ "categoryId": id_of(&groceries), "amount": 200 }]
            }),
        )
        .await;

    app.create(
        "/api/v1/transactions",
        json!({
            "accountId": id_of(&account),
            "categoryId": id_of(&groceries),
            "kind": "EXPENSE",
            "amount": 170,
            "transactionDate": "2024-05-01"
        }),
    )
    .await;

    let (_, count) = app.get("/api/v1/notifications/unread-count").await;
    assert_eq!(count["count"], 1);

    let (_, vs_actual) = app
        .get(&format!("/api/v1/budgets/{}/vs-actual", id_of(&budget)))
        .await;
    assert_eq!(vs_actual["lines"][0]["actual"].as_f64(), Some(170.0));
    assert_eq!(vs_actual["lines"][0]["overBudget"], false);

    let (status, updated) = app.post("/api/v1/notifications/read-all", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["updated"], 1);
    let (_, page) = app.get("/api/v1/notifications?unreadOnly=true").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn deleting_a_category_with_replacement_moves_its_transactions() {
    let app = test_app().await;
    let account = app
        .create(
            "/api/v1/accounts",
            json!({ "name": "Checking", "currency": "USD", "balance": 500 }),
        )
        .await;
    let old = app
        .create("/api/v1/categories", json!({ "name": "Dining", "kind": "EXPENSE" }))
        .await;
    let new = app
        .create("/api/v1/categories", json!({ "name": "Food", "kind": "EXPENSE" }))
        .await;
    let txn = app
        .create(
            "/api/v1/transactions",
            json!({
                "accountId": id_of(&account),
                "categoryId": id_of(&old),
                "kind": "EXPENSE",
                "amount": 25,
                "transactionDate": "2024-02-02"
            }),
        )
        .await;

    // Still referenced, so a plain delete is refused.
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/categories/{}", id_of(&old)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!(
                "/api/v1/categories/{}?replacementId={}",
                id_of(&old),
                id_of(&new)
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reassignedTransactions"], 1);

    let (_, txn) = app
        .get(&format!("/api/v1/transactions/{}", id_of(&txn)))
        .await;
    assert_eq!(txn["categoryId"], Value::String(id_of(&new)));
}

#[tokio::test]
async fn tier_status_and_progress_follow_spend() {
    let app = test_app().await;
    let account = app
        .create(
            "/api/v1/accounts",
            json!({ "name": "Checking", "currency": "USD", "balance": 900 }),
        )
        .await;
    let category = app
        .create("/api/v1/categories", json!({ "name": "Travel", "kind": "EXPENSE" }))
        .await;
    let benefit = app
        .create("/api/v1/benefits", json!({ "name": "Lounge access" }))
        .await;
    app.create(
        "/api/v1/tiers",
        json!({
            "name": "Silver",
            "minSpend": 0, "maxSpend": 1000,
            "minBalance": 0, "maxBalance": 5000
        }),
    )
    .await;
    let gold = app
        .create(
            "/api/v1/tiers",
            json!({
                "name": "Gold",
                "minSpend": 1000,
                "minBalance": 5000,
                "benefitIds": [id_of(&benefit)]
            }),
        )
        .await;
    assert_eq!(gold["benefits"][0]["name"], "Lounge access");

    app.create(
        "/api/v1/transactions",
        json!({
            "accountId": id_of(&account),
            "categoryId": id_of(&category),
            "kind": "EXPENSE",
            "amount": 400,
            "transactionDate": "2024-03-01"
        }),
    )
    .await;

    let (status, tiers) = app.get("/api/v1/tiers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tiers[0]["name"], "Silver");
    assert_eq!(tiers[1]["name"], "Gold");

    let (_, membership) = app.get("/api/v1/tiers/status?asOf=2024-06-30").await;
    assert_eq!(membership["spend"].as_f64(), Some(400.0));
    assert_eq!(membership["currentTier"]["name"], "Silver");
    assert_eq!(membership["nextTier"]["name"], "Gold");

    let (status, progress) = app
        .get("/api/v1/reports/tier-progress?asOf=2024-06-30&width=300")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["width"].as_f64(), Some(300.0));

    let (status, _) = app
        .get("/api/v1/reports/tier-progress?width=-1")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_chart_and_cash_flow_cover_the_requested_window() {
    let app = test_app().await;
    let account = app
        .create(
            "/api/v1/accounts",
            json!({ "name": "Checking", "currency": "USD", "balance": 0 }),
        )
        .await;
    let salary = app
        .create("/api/v1/categories", json!({ "name": "Salary", "kind": "INCOME" }))
        .await;
    let rent = app
        .create("/api/v1/categories", json!({ "name": "Rent", "kind": "EXPENSE" }))
        .await;
    for (category, kind, amount, date) in [
        (&salary, "INCOME", 3000, "2024-01-05"),
        (&rent, "EXPENSE", 1200, "2024-01-06"),
        (&salary, "INCOME", 3000, "2024-02-05"),
    ] {
        app.create(
            "/api/v1/transactions",
            json!({
                "accountId": id_of(&account),
                "categoryId": id_of(category),
                "kind": kind,
                "amount": amount,
                "transactionDate": date
            }),
        )
        .await;
    }

    let (status, chart) = app
        .get("/api/v1/reports/category-chart?startDate=2024-01-01&endDate=2024-01-31")
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = chart["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(chart["domain"]["maxPositive"].as_f64().unwrap() >= 3000.0);

    let (status, months) = app
        .get("/api/v1/reports/cash-flow?startDate=2024-01-01&endDate=2024-02-29")
        .await;
    assert_eq!(status, StatusCode::OK);
    let months = months.as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], "2024-01");
    assert_eq!(months[0]["net"].as_f64(), Some(1800.0));
    assert_eq!(months[1]["income"].as_f64(), Some(3000.0));

    let (status, dashboard) = app.get("/api/v1/reports/dashboard?asOf=2024-02-10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["totalBalance"].as_f64(), Some(4800.0));
}

#[tokio::test]
async fn partners_are_searchable_and_names_unique() {
    let app = test_app().await;
    app.create(
        "/api/v1/partners",
        json!({ "name": "Acme Airlines", "category": "travel" }),
    )
    .await;
    app.create("/api/v1/partners", json!({ "name": "Book Nook" }))
        .await;

    let (status, _) = app
        .post("/api/v1/partners", json!({ "name": "acme airlines" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, page) = app.get("/api/v1/partners?search=acme").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["name"], "Acme Airlines");
}

#[tokio::test]
async fn out_of_range_pages_and_dates_do_not_break_listings() {
    let app = test_app().await;
    app.create("/api/v1/partners", json!({ "name": "100% Cashback" }))
        .await;
    app.create("/api/v1/partners", json!({ "name": "Book Nook" }))
        .await;

    for uri in [
        "/api/v1/transactions?page=9223372036854775807",
        "/api/v1/partners?page=9223372036854775807",
        "/api/v1/notifications?page=9223372036854775807",
    ] {
        let (status, page) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}: {page}");
        assert!(page["data"].as_array().unwrap().is_empty());
    }

    let (_, page) = app.get("/api/v1/partners?search=%25").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["name"], "100% Cashback");

    let (status, months) = app
        .get("/api/v1/reports/cash-flow?startDate=%2B262142-11-01&endDate=%2B262142-12-30")
        .await;
    assert_eq!(status, StatusCode::OK, "{months}");
    assert_eq!(months.as_array().unwrap().len(), 2);
}
