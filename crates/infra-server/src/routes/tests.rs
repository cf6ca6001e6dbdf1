use crate::{AppState, config::ServerConfig, create_router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use infra_registry::{
    ApplicationDocument, Registries, search::MemorySearchIndex, storage::MemoryStorage,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(config: ServerConfig, documents: Vec<ApplicationDocument>) -> Router {
    create_router(AppState {
        registries: Registries::new(Arc::new(MemoryStorage::new())),
        search: Arc::new(MemorySearchIndex::with_documents(documents)),
        config,
    })
}

fn app() -> Router {
    app_with(ServerConfig::default(), Vec::new())
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send_raw(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_raw(app, request).await
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let response = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let response = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_user_crud() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "Alice", "email": "alice@example.com", "password": "s3cret"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["data"]["id"].as_i64().unwrap();
    assert_eq!(
        response.headers[header::LOCATION],
        format!("/api/users/{}", id)
    );
    assert!(response.body["data"].get("password").is_none());
    assert!(response.body["data"].get("password_hash").is_none());

    let response = send(&app, Method::GET, "/api/users/by-name/Alice", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "alice@example.com");

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/users/{}", id),
        Some(json!({"name": "Alice L.", "email": ""})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Alice L.");
    assert_eq!(response.body["data"]["email"], "alice@example.com");

    let response = send(&app, Method::DELETE, &format!("/api/users/{}", id), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &format!("/api/users/{}", id), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_invalid_bodies_are_bad_requests() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"name": "Bob", "email": "not-an-address", "password": "pw"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send_raw(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);

    let response = send(&app, Method::POST, "/api/appteams", Some(json!({"name": "  "}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_project_owner_resolution() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(json!({"name": "P1"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(json!({"name": "P1", "owner_name": "Nobody"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let owner = create(
        &app,
        "/api/users",
        json!({"name": "Alice", "email": "alice@example.com", "password": "pw"}),
    )
    .await;
    let project = create(
        &app,
        "/api/projects",
        json!({"name": "P1", "description": "first", "ownerName": "Alice"}),
    )
    .await;
    assert_eq!(project["owner_id"], owner["id"]);
    assert_eq!(project["owner_name"], "Alice");

    send(
        &app,
        Method::DELETE,
        &format!("/api/users/{}", owner["id"]),
        None,
    )
    .await;

    let response = send(&app, Method::GET, "/api/projects/by-name/P1", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["owner_name"].is_null());
}

#[tokio::test]
async fn test_application_flow() {
    let app = app();

    create(
        &app,
        "/api/users",
        json!({"name": "Alice", "email": "alice@example.com", "password": "pw"}),
    )
    .await;
    let project = create(
        &app,
        "/api/projects",
        json!({"name": "P1", "owner_name": "Alice"}),
    )
    .await;
    let team = create(&app, "/api/appteams", json!({"name": "Core"})).await;
    assert_eq!(team["members"], json!([]));

    let response = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(json!({"name": "billing", "project_id": project["id"]})),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(json!({"name": "billing", "team_id": 999, "project_id": 998})),
    )
    .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"].as_str().unwrap().contains("Team"));

    let response = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(json!({"name": "billing", "team_id": team["id"], "project_id": project["id"]})),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["data"]["id"].as_i64().unwrap();
    assert_eq!(
        response.headers[header::LOCATION],
        format!("/api/applications/{}", id)
    );

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/applications/{}", id),
        Some(json!({"name": "billing-api", "description": "invoices"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "billing-api");
    assert_eq!(response.body["data"]["description"], "invoices");
    assert_eq!(response.body["data"]["team_id"], team["id"]);
    assert_eq!(response.body["data"]["project_id"], project["id"]);
}

#[tokio::test]
async fn test_team_members_and_paging() {
    let app = app();

    let alice = create(
        &app,
        "/api/users",
        json!({"name": "Alice", "email": "alice@example.com", "password": "pw"}),
    )
    .await;
    let team = create(
        &app,
        "/api/appteams",
        json!({"name": "team-00", "memberIds": [alice["id"]]}),
    )
    .await;
    assert_eq!(team["members"][0]["name"], "Alice");
    assert!(team["members"][0].get("password_hash").is_none());

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/appteams/{}", team["id"]),
        Some(json!({"name": "team-00", "member_ids": []})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["members"], json!([]));

    for i in 1..15 {
        create(&app, "/api/appteams", json!({"name": format!("team-{:02}", i)})).await;
    }

    let response = send(&app, Method::GET, "/api/appteams?page=1&size=10", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 5);
    assert_eq!(response.body["pagination"]["total"], 15);
    assert_eq!(response.body["pagination"]["total_pages"], 2);
    assert_eq!(response.body["pagination"]["has_more"], false);

    let response = send(&app, Method::GET, "/api/appteams?size=0", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search() {
    let documents = vec![
        ApplicationDocument {
            id: Some(1),
            name: Some("billing".into()),
            search_text: Some("billing invoices core".into()),
            ..Default::default()
        },
        ApplicationDocument {
            id: Some(2),
            name: Some("auth".into()),
            search_text: Some("auth login edge".into()),
            ..Default::default()
        },
    ];
    let app = app_with(ServerConfig::default(), documents);

    let response = send(&app, Method::GET, "/api/search?searchText=Invoices", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"][0]["name"], "billing");
    assert_eq!(response.body["pagination"]["total"], 1);

    let response = send(&app, Method::GET, "/api/search", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, Method::GET, "/api/search?searchText=%20", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bearer_token_gate() {
    let config = ServerConfig {
        api_tokens: vec!["secret".to_string()],
        ..ServerConfig::default()
    };
    let app = app_with(config, Vec::new());

    let response = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], 401);

    let request = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send_raw(&app, request).await.status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send_raw(&app, request).await.status, StatusCode::OK);

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unparseable_path_and_query_are_json_errors() {
    let app = app();

    for uri in [
        "/api/users/abc",
        "/api/applications/1.5",
        "/api/appteams?size=abc",
        "/api/search?searchText=x&page=-1",
    ] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers[header::CONTENT_TYPE],
            "application/json",
            "{}",
            uri
        );
        assert_eq!(response.body["status"], 400, "{}", uri);
        assert!(response.body["error"].is_string(), "{}", uri);
        assert!(response.body["timestamp"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_delete_routes_leave_dependents_dangling() {
    let app = app();

    create(
        &app,
        "/api/users",
        json!({"name": "Alice", "email": "alice@example.com", "password": "pw"}),
    )
    .await;
    let project = create(
        &app,
        "/api/projects",
        json!({"name": "P1", "owner_name": "Alice"}),
    )
    .await;
    let team = create(&app, "/api/appteams", json!({"name": "Core"})).await;
    let application = create(
        &app,
        "/api/applications",
        json!({"name": "billing", "team_id": team["id"], "project_id": project["id"]}),
    )
    .await;

    let project_uri = format!("/api/projects/{}", project["id"]);
    let team_uri = format!("/api/appteams/{}", team["id"]);
    let application_uri = format!("/api/applications/{}", application["id"]);

    let response = send(&app, Method::DELETE, &project_uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, Method::DELETE, &team_uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(
        send(&app, Method::GET, &project_uri, None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&app, Method::GET, &team_uri, None).await.status,
        StatusCode::NOT_FOUND
    );

    let response = send(&app, Method::GET, &application_uri, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["team_id"], team["id"]);
    assert_eq!(response.body["data"]["project_id"], project["id"]);

    let response = send(&app, Method::DELETE, &application_uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(
        send(&app, Method::GET, &application_uri, None).await.status,
        StatusCode::NOT_FOUND
    );

    // Unknown ids delete silently
    let response = send(&app, Method::DELETE, &application_uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}
