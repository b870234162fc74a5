#![cfg(feature = "web")]

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use sheetlens::backend::{CleaningClient, ServiceError};
use sheetlens::row::{Row, Value as Cell};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> CleaningClient {
    CleaningClient::new(base, Duration::from_secs(5)).unwrap()
}

fn rows() -> Vec<Row> {
    vec![
        Row::from_iter([("name", Cell::from(" Ann ")), ("age", Cell::from("41"))]),
        Row::from_iter([("name", Cell::from("Ben")), ("age", Cell::Null)]),
    ]
}

#[tokio::test]
async fn clean_posts_rows_and_reads_reply() {
    async fn trim_names(Json(rows): Json<Vec<Value>>) -> Json<Value> {
        let cleaned: Vec<Value> = rows
            .into_iter()
            .map(|r| json!({ "name": r["name"].as_str().unwrap_or("").trim(), "age": r["age"] }))
            .collect();
        Json(json!({
            "cleaned_data": cleaned,
            "describe": { "age": { "count": 1 } },
            "rows_dropped": 0,
        }))
    }

    let base = spawn_backend(Router::new().route("/clean", post(trim_names))).await;
    let reply = client(&base).clean(&rows()).await.unwrap();

    assert_eq!(reply.cleaned_data.len(), 2);
    assert_eq!(reply.cleaned_data[0].get("name"), Some(&Cell::from("Ann")));
    assert_eq!(reply.cleaned_data[1].get("age"), Some(&Cell::Null));
    assert_eq!(
        reply.cleaned_data[0].columns().collect::<Vec<_>>(),
        vec!["name", "age"]
    );
    assert!(reply.numeric_stats.is_none());
    assert_eq!(reply.extra["rows_dropped"], 0);

    let summary = reply.summary();
    assert_eq!(summary.describe.unwrap()["age"]["count"], 1);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    async fn ok() -> Json<Value> {
        Json(json!({ "cleaned_data": [] }))
    }
    let base = spawn_backend(Router::new().route("/clean", post(ok))).await;
    let client = client(&format!("{}/", base));
    assert_eq!(client.base_url(), base);
    assert!(client.clean(&[]).await.unwrap().cleaned_data.is_empty());
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    async fn fail() -> (StatusCode, &'static str) {
        (StatusCode::UNPROCESSABLE_ENTITY, "no rows")
    }
    let base = spawn_backend(Router::new().route("/clean", post(fail))).await;

    match client(&base).clean(&rows()).await {
        Err(ServiceError::Status { status, body }) => {
            assert_eq!(status, 422);
            assert_eq!(body, "no rows");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_reply_is_a_decode_error() {
    async fn garbage() -> &'static str {
        "<html>oops</html>"
    }
    let base = spawn_backend(Router::new().route("/clean", post(garbage))).await;

    let err = client(&base).clean(&rows()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .clean(&rows())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)), "{err:?}");
}
