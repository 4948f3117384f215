#![cfg(feature = "server")]

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use chub_domain::config::ApiConfig;
use chub_kernel::server::ApiState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let config = ApiConfig::default();
    let database = common::memory_database().await;
    let slice = chub_customer::init(&config, &database).expect("customer slice");
    let state = ApiState::builder()
        .config(config)
        .db(database)
        .register_slice(slice)
        .build()
        .expect("api state");

    let (router, _api) = chub_customer::server::router().with_state(state).split_for_parts();
    router
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("infallible router")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn create(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/customers/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn seed(app: &Router) {
    for (id, name, email) in [(1, "Alice", "alice@example.com"), (2, "Bob", "bob@example.com")] {
        let response =
            send(app, create(&json!({"customerId": id, "customerName": name, "email": email})))
                .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn create_then_fetch_by_id() {
    let app = app().await;

    let response = send(
        &app,
        create(&json!({"customerId": 7, "customerName": "Alice", "email": "alice@example.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(text(response).await, "Data created for : Alice");

    let response = send(&app, get("/customers/get/7")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"customerId": 7, "customerName": "Alice", "email": "alice@example.com"})
    );
}

#[tokio::test]
async fn empty_store_reports_no_data() {
    let app = app().await;

    let response = send(&app, get("/customers/get")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["message"], "No customers are found in database");
}

#[tokio::test]
async fn listing_returns_every_customer() {
    let app = app().await;
    seed(&app).await;

    let response = send(&app, get("/customers/get")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([
            {"customerId": 1, "customerName": "Alice", "email": "alice@example.com"},
            {"customerId": 2, "customerName": "Bob", "email": "bob@example.com"}
        ])
    );
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = app().await;

    let response = send(&app, get("/customers/get/99")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Customer does not exist: 99");

    let response = send(&app, get("/customers/get/abc")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_payload_is_rejected_before_storage() {
    let app = app().await;

    let response = send(
        &app,
        create(&json!({"customerId": 1, "customerName": "", "email": "alice@example.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(
        body["violations"],
        json!([{"field": "customerName", "message": "Customer name cannot be empty"}])
    );

    let response = send(
        &app,
        create(&json!({"customerId": 1, "customerName": "Alice", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["violations"][0]["message"], "check the email id format");

    let response = send(&app, create(&json!({"customerName": "Alice"}))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<Value> = json_body(response).await["violations"]
        .as_array()
        .expect("violations")
        .iter()
        .map(|v| v["field"].clone())
        .collect();
    assert_eq!(fields, [json!("customerId"), json!("email")]);

    let response = send(&app, get("/customers/get")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_request_edge_cases() {
    let app = app().await;

    let empty = Request::builder()
        .method("POST")
        .uri("/customers/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .expect("request");
    let response = send(&app, empty).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let plain = Request::builder()
        .method("POST")
        .uri("/customers/create")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("customer"))
        .expect("request");
    let response = send(&app, plain).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let malformed = Request::builder()
        .method("POST")
        .uri("/customers/create")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from("{\"customerId\": "))
        .expect("request");
    let response = send(&app, malformed).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_customer_conflicts() {
    let app = app().await;
    seed(&app).await;

    let response = send(
        &app,
        create(&json!({"customerId": 1, "customerName": "Again", "email": "again@example.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn emails_from_matrix_variables_keep_request_order() {
    let app = app().await;
    seed(&app).await;

    let response = send(
        &app,
        get("/customers/get-emails/lookup;email=bob@example.com;email=alice@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&Value> =
        body.as_array().expect("array").iter().map(|c| &c["customerName"]).collect();
    assert_eq!(names, [&json!("Bob"), &json!("Alice")]);

    let response =
        send(&app, get("/customers/get-emails/lookup;email=alice@example.com,bob@example.com"))
            .await;
    assert_eq!(json_body(response).await.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn plain_email_segment_is_a_single_lookup() {
    let app = app().await;
    seed(&app).await;

    let response = send(&app, get("/customers/get-emails/bob@example.com")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([{"customerId": 2, "customerName": "Bob", "email": "bob@example.com"}])
    );
}

#[tokio::test]
async fn missing_email_fails_the_whole_lookup() {
    let app = app().await;
    seed(&app).await;

    let response = send(
        &app,
        get("/customers/get-emails/lookup;email=alice@example.com;email=ghost@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["message"],
        "Customer does not exist: ghost@example.com"
    );
}

#[tokio::test]
async fn matrix_values_are_decoded_after_splitting() {
    let app = app().await;
    seed(&app).await;

    let response = send(&app, get("/customers/get-emails/lookup;email=alice%40example.com")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await[0]["customerName"], "Alice");

    let response = send(
        &app,
        get("/customers/get-emails/lookup;email=alice%40example.com%2Cbob%40example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["message"],
        "Customer does not exist: alice@example.com,bob@example.com"
    );
}
