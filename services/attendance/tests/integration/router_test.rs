use axum_test::TestServer;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use uuid::Uuid;

use presenza_attendance::router::build_router;
use presenza_attendance::state::AppState;

fn test_server() -> TestServer {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    TestServer::new(build_router(AppState { db })).unwrap()
}

#[tokio::test]
async fn should_answer_health_probes() {
    let server = test_server();

    let healthz = server.get("/healthz").await;
    let readyz = server.get("/readyz").await;

    healthz.assert_status_ok();
    readyz.assert_status_ok();
}

#[tokio::test]
async fn should_return_not_found_for_unknown_route() {
    let server = test_server();

    let response = server.get("/attendance/nope").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn should_reject_heartbeat_with_latitude_but_no_longitude() {
    let server = test_server();

    let response = server
        .post("/attendance/heartbeat")
        .json(&json!({
            "tenant_id": Uuid::new_v4(),
            "employee_id": Uuid::new_v4(),
            "session_id": Uuid::new_v4(),
            "latitude": 24.7136,
            "permission_state": "granted",
        }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_heartbeat_with_out_of_range_coordinates() {
    let server = test_server();

    let response = server
        .post("/attendance/heartbeat")
        .json(&json!({
            "tenant_id": Uuid::new_v4(),
            "employee_id": Uuid::new_v4(),
            "session_id": Uuid::new_v4(),
            "latitude": 95.0,
            "longitude": 200.0,
            "permission_state": "granted",
        }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}
