//! Integration tests for the two-phase merge pipeline.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestServer;
use common::fixtures::{dup_left_csv, left_csv, right_csv, right_xlsx};
use granary_core::{FileFormat, Value as Cell, codec};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Vec<u8>>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(match body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        })
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Upload a file and return its catalog id.
async fn upload(server: &TestServer, filename: &str, data: &[u8]) -> i64 {
    let (status, body) = send(
        &server.router,
        "PUT",
        &format!("/v1/files/{filename}"),
        Some(data.to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "upload {filename}: {body}");
    body["id"].as_i64().unwrap()
}

async fn merge(
    server: &TestServer,
    id_1: i64,
    id_2: i64,
    column: &str,
) -> (StatusCode, Value) {
    send(
        &server.router,
        "GET",
        &format!("/v1/merge?file_id_1={id_1}&file_id_2={id_2}&join_column={column}"),
        None,
    )
    .await
}

async fn commit(server: &TestServer, cache_key: &str, new_filename: &str) -> (StatusCode, Value) {
    send(
        &server.router,
        "POST",
        &format!("/v1/merge/commit?cache_key={cache_key}&new_filename={new_filename}"),
        None,
    )
    .await
}

#[tokio::test]
async fn merge_stages_result_and_returns_preview() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (status, body) = merge(&server, a, b, "id").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Inner join keeps only id=1; columns are left layout then right's
    // non-join columns.
    assert_eq!(body["preview"], json!([{"id": 1, "x": "a", "y": "p"}]));

    let cache_key = body["cache_key"].as_str().unwrap();
    assert!(body["message"].as_str().unwrap().contains(cache_key));
    assert_eq!(server.state.staging.len(), 1);
}

#[tokio::test]
async fn merge_joins_across_formats() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.xlsx", &right_xlsx()).await;

    let (status, body) = merge(&server, a, b, "id").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["preview"], json!([{"id": 1, "x": "a", "y": "p"}]));
}

#[tokio::test]
async fn duplicate_join_keys_produce_cross_product() {
    let server = TestServer::new().await;
    let a = upload(&server, "dup.csv", dup_left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (status, body) = merge(&server, a, b, "id").await;
    assert_eq!(status, StatusCode::OK);
    // Two left rows with id=1 against one right row: exactly two output rows.
    assert_eq!(body["preview"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn merge_unknown_id_is_not_found() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;

    let (status, body) = merge(&server, a, 999, "id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("one or both file IDs not found")
    );
}

#[tokio::test]
async fn merge_missing_column_never_touches_the_cache() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (status, body) = merge(&server, a, b, "nonexistent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("'nonexistent'"));
    assert!(server.state.staging.is_empty());
}

#[tokio::test]
async fn preview_is_capped_at_five_rows() {
    let server = TestServer::new().await;
    let mut left = String::from("id,x\n");
    let mut right = String::from("id,y\n");
    for i in 0..7 {
        left.push_str(&format!("{i},l{i}\n"));
        right.push_str(&format!("{i},r{i}\n"));
    }
    let a = upload(&server, "left.csv", left.as_bytes()).await;
    let b = upload(&server, "right.csv", right.as_bytes()).await;

    let (status, body) = merge(&server, a, b, "id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preview"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn commit_round_trips_the_join() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (_, merged) = merge(&server, a, b, "id").await;
    let cache_key = merged["cache_key"].as_str().unwrap();

    let (status, body) = commit(&server, cache_key, "joined.csv").await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["filename"], "joined.csv");
    assert_eq!(body["format"], "csv");

    // Decoding the committed blob yields exactly the inner join of A and B.
    let blob = server.storage().get("joined.csv").await.unwrap();
    let table = codec::decode(&blob, FileFormat::Csv).unwrap();
    assert_eq!(table.columns(), &["id", "x", "y"]);
    assert_eq!(
        table.rows(),
        &[vec![
            Cell::Int(1),
            Cell::Text("a".into()),
            Cell::Text("p".into())
        ]]
    );

    // The staged entry was consumed: a second commit of the same key fails.
    let (status, _) = commit(&server, cache_key, "joined2.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn commit_can_change_format() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (_, merged) = merge(&server, a, b, "id").await;
    let cache_key = merged["cache_key"].as_str().unwrap();

    let (status, body) = commit(&server, cache_key, "joined.xlsx").await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["format"], "xlsx");

    let blob = server.storage().get("joined.xlsx").await.unwrap();
    let table = codec::decode(&blob, FileFormat::Xlsx).unwrap();
    assert_eq!(table.columns(), &["id", "x", "y"]);
    assert_eq!(table.row_count(), 1);
}

#[tokio::test]
async fn commit_expired_key_is_indistinguishable_from_unknown() {
    let server = TestServer::with_staging_ttl_secs(0).await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (_, merged) = merge(&server, a, b, "id").await;
    let expired_key = merged["cache_key"].as_str().unwrap();

    let (status, expired_body) = commit(&server, expired_key, "late.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, unknown_body) = commit(
        &server,
        &uuid::Uuid::new_v4().to_string(),
        "late.csv",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Same code, same message: callers cannot tell the two causes apart.
    assert_eq!(expired_body, unknown_body);
}

#[tokio::test]
async fn commit_bad_extension_keeps_the_staged_entry() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;

    let (_, merged) = merge(&server, a, b, "id").await;
    let cache_key = merged["cache_key"].as_str().unwrap();

    let (status, _) = commit(&server, cache_key, "joined.txt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Validation failed before the cleanup step, so a retry with a valid
    // name still finds the staged dataset.
    let (status, _) = commit(&server, cache_key, "joined.csv").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn commit_duplicate_filename_conflicts_but_consumes_the_entry() {
    let server = TestServer::new().await;
    let a = upload(&server, "left.csv", left_csv()).await;
    let b = upload(&server, "right.csv", right_csv()).await;
    upload(&server, "taken.csv", b"id,z\n9,zz\n").await;

    let (_, merged) = merge(&server, a, b, "id").await;
    let cache_key = merged["cache_key"].as_str().unwrap();

    let (status, body) = commit(&server, cache_key, "taken.csv").await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    // The blob write happened before the catalog insert and is not rolled
    // back: the stored bytes are now the merged dataset.
    let blob = server.storage().get("taken.csv").await.unwrap();
    let table = codec::decode(&blob, FileFormat::Csv).unwrap();
    assert_eq!(table.columns(), &["id", "x", "y"]);

    // Cleanup is unconditional, so the staged entry is gone despite the
    // conflict.
    let (status, _) = commit(&server, cache_key, "other.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
