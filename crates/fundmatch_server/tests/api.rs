use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fundmatch_core::db::open_db_in_memory;
use fundmatch_server::{build_router, AppState, Database, DEFAULT_MAX_BODY_BYTES};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let conn = open_db_in_memory().unwrap();
    build_router(AppState::new(Database::new(conn), DEFAULT_MAX_BODY_BYTES))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|value| value.to_string())).await
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body)),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_investor(app: &Router, total: f64, individual: f64, deadline: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/investors",
        Some(json!({
            "total_amount": total,
            "individual_amount": individual,
            "project_delivery_deadline": deadline,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_project(app: &Router, amount: f64, delivery_date: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/projects",
        Some(json!({ "amount": amount, "delivery_date": delivery_date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn id(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

fn amount(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[tokio::test]
async fn healthz_reports_version() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn create_and_list_projects() {
    let app = app();
    let first = create_project(&app, 500.0, "2024-06-01").await;
    let second = create_project(&app, 12.5, "2024-07-01").await;

    assert_eq!(first["funded"], false);
    assert_eq!(amount(&first["amount"]), 500.0);
    assert_eq!(first["delivery_date"], "2024-06-01");

    let (status, body) = send(&app, Method::GET, "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([first.clone(), second]));

    let (status, body) = send(&app, Method::GET, &format!("/projects/{}", id(&first)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, first);
}

#[tokio::test]
async fn create_investor_starts_with_full_remaining_amount() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    assert_eq!(amount(&investor["remaining_amount"]), 1000.0);

    let (status, body) = send(&app, Method::GET, "/investors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([investor]));
}

#[tokio::test]
async fn invalid_payloads_report_field_errors() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some(json!({ "amount": -1, "funded": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["amount"][0].as_str().unwrap().contains("greater than or equal to 0"));
    assert_eq!(body["delivery_date"], json!(["This field is required."]));

    let (status, body) = send(
        &app,
        Method::POST,
        "/investors",
        Some(json!({
            "total_amount": 10.001,
            "individual_amount": 5,
            "project_delivery_deadline": "2025-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["total_amount"].is_array());
}

#[tokio::test]
async fn malformed_json_is_a_non_field_error() {
    let app = app();
    let (status, body) =
        send_raw(&app, Method::POST, "/projects", Some("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"][0].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some(json!({ "amount": 10, "delivery_date": "next week" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["non_field_errors"].is_array());
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();
    for uri in [
        format!("/projects/{missing}"),
        format!("/investors/{missing}"),
        format!("/projects/{missing}/investors"),
        format!("/investors/{missing}/projects"),
        "/projects/42".to_string(),
    ] {
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "details": "Not found." }));
    }

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/investors/{missing}"),
        Some(json!({ "total_amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_and_put_projects() {
    let app = app();
    let project = create_project(&app, 500.0, "2024-06-01").await;
    let uri = format!("/projects/{}", id(&project));

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "amount": 450 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["amount"]), 450.0);
    assert_eq!(body["delivery_date"], "2024-06-01");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "amount": 300 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["delivery_date"], json!(["This field is required."]));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "amount": 300, "delivery_date": "2024-08-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["amount"]), 300.0);
    assert_eq!(body["delivery_date"], "2024-08-01");
}

#[tokio::test]
async fn investor_total_update_keeps_committed_capital() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    let project = create_project(&app, 500.0, "2024-06-01").await;
    let invest_uri = format!(
        "/investors/{}/projects/{}/invest",
        id(&investor),
        id(&project)
    );
    let (status, _) = send(&app, Method::POST, &invest_uri, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/investors/{}", id(&investor));
    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "total_amount": 1200 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["remaining_amount"]), 700.0);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "total_amount": 400 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["total_amount"][0]
        .as_str()
        .unwrap()
        .contains("committed amount"));
}

#[tokio::test]
async fn successful_investment_funds_project() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    let project = create_project(&app, 500.0, "2024-06-01").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/investors/{}/projects/{}/invest", id(&investor), id(&project)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(amount(&body["remaining_amount"]), 500.0);
    assert_eq!(body["funded_project"]["id"], project["id"]);
    assert_eq!(body["funded_project"]["funded"], true);

    let (_, stored) = send(
        &app,
        Method::GET,
        &format!("/investors/{}", id(&investor)),
        None,
    )
    .await;
    assert_eq!(amount(&stored["remaining_amount"]), 500.0);
}

#[tokio::test]
async fn rejected_investment_reports_reason_and_changes_nothing() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    let project = create_project(&app, 700.0, "2024-06-01").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/investors/{}/projects/{}/invest", id(&investor), id(&project)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "details": "Project amount exceeds investor's individual amount." })
    );

    let (_, stored_investor) = send(
        &app,
        Method::GET,
        &format!("/investors/{}", id(&investor)),
        None,
    )
    .await;
    assert_eq!(stored_investor, investor);
    let (_, stored_project) =
        send(&app, Method::GET, &format!("/projects/{}", id(&project)), None).await;
    assert_eq!(stored_project, project);
}

#[tokio::test]
async fn funded_project_rejects_investment_edits_and_candidate_listing() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    let project = create_project(&app, 500.0, "2024-06-01").await;
    let invest_uri = format!(
        "/investors/{}/projects/{}/invest",
        id(&investor),
        id(&project)
    );
    let (status, _) = send(&app, Method::POST, &invest_uri, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, &invest_uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "details": "Project has already been funded." }));

    let project_uri = format!("/projects/{}", id(&project));
    for (method, payload) in [
        (Method::PATCH, Some(json!({ "amount": 1 }))),
        (Method::PUT, Some(json!({}))),
        (Method::PATCH, None),
    ] {
        let (status, body) = match payload {
            Some(payload) => send(&app, method, &project_uri, Some(payload)).await,
            None => send_raw(&app, method, &project_uri, Some("garbage".to_string())).await,
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "details": "Cannot edit funded project." }));
    }

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/projects/{}/investors", id(&project)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "details": "This project has been funded." }));

    let (_, stored_investor) = send(
        &app,
        Method::GET,
        &format!("/investors/{}", id(&investor)),
        None,
    )
    .await;
    assert_eq!(amount(&stored_investor["remaining_amount"]), 500.0);
}

#[tokio::test]
async fn eligibility_endpoints_filter_by_caps_and_dates() {
    let app = app();
    let investor = create_investor(&app, 1000.0, 600.0, "2025-01-01").await;
    let other = create_investor(&app, 100.0, 100.0, "2030-01-01").await;
    let fits = create_project(&app, 600.0, "2025-01-01").await;
    let too_large = create_project(&app, 600.01, "2024-01-01").await;
    let too_late = create_project(&app, 10.0, "2025-01-02").await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/investors/{}/projects", id(&investor)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([fits]));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/projects/{}/investors", id(&too_late)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([other]));

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/projects/{}/investors", id(&too_large)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let app = build_router(AppState::new(Database::new(conn), 16));
    let (status, _) = send(
        &app,
        Method::POST,
        "/projects",
        Some(json!({ "amount": 500, "delivery_date": "2024-06-01" })),
    )
    .await;
    assert_ne!(status, StatusCode::CREATED);
    assert!(status.is_client_error());
}
