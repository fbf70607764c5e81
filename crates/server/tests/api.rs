use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use ledger::Ledger;
use migration::MigratorTrait;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let ledger = Ledger::builder().database(db.clone()).build().await.unwrap();
    server::app(ledger, db)
}

fn basic_auth(user: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{user}:password"));
    format!("Basic {encoded}")
}

fn request(method: &str, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(user))
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Creates an org and a project for alice, returning `(org_id, project_id)`.
async fn org_with_project(app: &Router) -> (String, String) {
    let (status, body) = send(
        app,
        request("POST", "/orgs", "alice", Some(json!({"name": "Bluegate Builders"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let org_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects"),
            "alice",
            Some(json!({
                "name": "Lakeside Villa",
                "budget_minor": 1_000_000,
                "start_date": "2026-05-01",
                "end_date": null,
                "client_party_id": null,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    (org_id, project_id)
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/orgs")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    // Missing Authorization header is rejected by the typed-header extractor.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = test_app().await;

    let encoded = base64::engine::general_purpose::STANDARD.encode("alice:wrong");
    let req = Request::builder()
        .method("GET")
        .uri("/orgs")
        .header(header::AUTHORIZATION, format!("Basic {encoded}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_org_returns_success_envelope() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request("POST", "/orgs", "alice", Some(json!({"name": "Bluegate Builders"}))),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Bluegate Builders"));
    assert_eq!(body["data"]["owner"], json!("alice"));
}

#[tokio::test]
async fn foreign_org_is_invisible() {
    let app = test_app().await;
    let (org_id, _) = org_with_project(&app).await;

    let (status, body) = send(&app, request("GET", &format!("/orgs/{org_id}"), "bob", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("not_found"));
}

#[tokio::test]
async fn duplicate_org_name_conflicts() {
    let app = test_app().await;

    let payload = json!({"name": "Bluegate Builders"});
    let (status, _) = send(&app, request("POST", "/orgs", "alice", Some(payload.clone()))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, request("POST", "/orgs", "alice", Some(payload))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("conflict"));
}

#[tokio::test]
async fn expense_with_immediate_payment_flows_into_finance_summary() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "alice",
            Some(json!({"name": "Cement"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    // 450.00 per bag × 10 bags, 200.00 settled on the spot
    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses"),
            "alice",
            Some(json!({
                "party_id": null,
                "stage_id": null,
                "category_id": category_id,
                "rate_minor": 45_000,
                "quantity_milli": 10_000,
                "mode": "CASH",
                "expense_date": "2026-05-03",
                "immediate_payment": {
                    "amount_minor": 200_000,
                    "mode": "ONLINE",
                    "reference_number": "TXN-77",
                    "notes": null,
                },
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["expense"]["amount_minor"], json!(450_000));
    assert_eq!(body["data"]["payment"]["amount_minor"], json!(200_000));
    assert_eq!(body["data"]["payment"]["kind"], json!("OUT"));

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/orgs/{org_id}/projects/{project_id}/summaries/finance"),
            "alice",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_expenses_minor"], json!(450_000));
    assert_eq!(body["data"]["total_out_minor"], json!(200_000));
    assert_eq!(body["data"]["balance_minor"], json!(-450_000));
    assert_eq!(body["data"]["budget_used_percent"], json!(45.0));
}

#[tokio::test]
async fn expense_list_is_paginated() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "alice",
            Some(json!({"name": "Timber"})),
        ),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    for day in 1..=3 {
        let (status, _) = send(
            &app,
            request(
                "POST",
                &format!("/orgs/{org_id}/projects/{project_id}/expenses"),
                "alice",
                Some(json!({
                    "party_id": null,
                    "stage_id": null,
                    "category_id": category_id,
                    "rate_minor": 10_000,
                    "quantity_milli": 1_000,
                    "mode": "CASH",
                    "expense_date": format!("2026-05-0{day}"),
                    "immediate_payment": null,
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses?page=1&limit=2"),
            "alice",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], json!(3));
    assert_eq!(body["data"]["pages"], json!(2));
}

#[tokio::test]
async fn page_zero_is_rejected_and_limit_is_clamped() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses?page=0"),
            "alice",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("bad_request"));

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses?limit=1000"),
            "alice",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["limit"], json!(100));
}

#[tokio::test]
async fn viewer_cannot_write() {
    let app = test_app().await;
    let (org_id, _) = org_with_project(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/members"),
            "alice",
            Some(json!({"username": "bob", "role": "viewer"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "bob",
            Some(json!({"name": "Cement"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], json!("forbidden"));

    // Reads still work for a viewer.
    let (status, _) = send(
        &app,
        request("GET", &format!("/orgs/{org_id}/categories"), "bob", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn project_patch_clears_end_date_with_explicit_null() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/orgs/{org_id}/projects/{project_id}"),
            "alice",
            Some(json!({"end_date": "2026-12-31"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["end_date"], json!("2026-12-31"));

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            &format!("/orgs/{org_id}/projects/{project_id}"),
            "alice",
            Some(json!({"end_date": null})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["end_date"], json!(null));
}

#[tokio::test]
async fn approving_twice_is_a_validation_error() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "alice",
            Some(json!({"name": "Cement"})),
        ),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses"),
            "alice",
            Some(json!({
                "party_id": null,
                "stage_id": null,
                "category_id": category_id,
                "rate_minor": 5_000,
                "quantity_milli": 1_000,
                "mode": "CASH",
                "expense_date": "2026-05-05",
                "immediate_payment": null,
            })),
        ),
    )
    .await;
    let expense_id = body["data"]["expense"]["id"].as_str().unwrap().to_string();

    let approve_uri = format!("/orgs/{org_id}/expenses/{expense_id}/approve");
    let (status, body) = send(&app, request("POST", &approve_uri, "alice", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("APPROVED"));

    let (status, body) = send(&app, request("POST", &approve_uri, "alice", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("validation"));
}

#[tokio::test]
async fn outstanding_is_signed_unless_pending_view_is_requested() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "alice",
            Some(json!({"name": "Bricks"})),
        ),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/parties"),
            "alice",
            Some(json!({"name": "Kiln Works", "phone": null, "location": null, "kind": "VENDOR"})),
        ),
    )
    .await;
    let party_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses"),
            "alice",
            Some(json!({
                "party_id": party_id,
                "stage_id": null,
                "category_id": category_id,
                "rate_minor": 10_000,
                "quantity_milli": 1_000,
                "mode": "CASH",
                "expense_date": "2026-05-02",
                "immediate_payment": null,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Overpay the vendor: 150.00 against 100.00 owed.
    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects/{project_id}/payments"),
            "alice",
            Some(json!({
                "party_id": party_id,
                "expense_id": null,
                "kind": "OUT",
                "mode": "CASH",
                "amount_minor": 15_000,
                "payment_date": "2026-05-03",
                "reference_number": null,
                "notes": null,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let base = format!("/orgs/{org_id}/projects/{project_id}/parties/{party_id}/outstanding");
    let (status, body) = send(&app, request("GET", &base, "alice", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outstanding_minor"], json!(-5_000));

    let (status, body) =
        send(&app, request("GET", &format!("{base}?pending_only=true"), "alice", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outstanding_minor"], json!(0));
}

#[tokio::test]
async fn credits_summary_buckets_by_party_kind() {
    let app = test_app().await;
    let (org_id, project_id) = org_with_project(&app).await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/categories"),
            "alice",
            Some(json!({"name": "Steel"})),
        ),
    )
    .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/parties"),
            "alice",
            Some(json!({"name": "Steel & Sons", "phone": null, "location": null, "kind": "VENDOR"})),
        ),
    )
    .await;
    let vendor_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/orgs/{org_id}/projects/{project_id}/expenses"),
            "alice",
            Some(json!({
                "party_id": vendor_id,
                "stage_id": null,
                "category_id": category_id,
                "rate_minor": 30_000,
                "quantity_milli": 1_000,
                "mode": "CASH",
                "expense_date": "2026-05-04",
                "immediate_payment": {
                    "amount_minor": 10_000,
                    "mode": "CASH",
                    "reference_number": null,
                    "notes": null,
                },
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        request("GET", &format!("/orgs/{org_id}/summaries/credits"), "alice", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vendors"]["count"], json!(1));
    assert_eq!(body["data"]["vendors"]["balance_minor"], json!(20_000));
    assert_eq!(body["data"]["labours"]["count"], json!(0));
    assert_eq!(body["data"]["total_minor"], json!(20_000));
}
