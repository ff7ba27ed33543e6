mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert!(body["success"].as_bool().unwrap_or(false), "success flag false or missing: {}", body);
    assert!(body["data"]["name"].is_string(), "missing service name: {}", body);
    Ok(())
}

#[tokio::test]
async fn health_reports_up_with_echoes() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url("/health/some-path?echo=hello"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let health = &body["data"];
    assert_eq!(health["status"], 200);
    assert_eq!(health["status_message"], "OK");
    assert_eq!(health["echo"], "hello");
    assert_eq!(health["path_echo"], "some-path");
    assert!(health["ip_address"].as_str().map(|ip| !ip.is_empty()).unwrap_or(false));

    let ts = health["timestamp"].as_str().unwrap_or_default();
    assert!(ts.ends_with('Z'), "timestamp should be UTC: {}", ts);
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "not RFC 3339: {}", ts);
    Ok(())
}

#[tokio::test]
async fn health_without_echo_leaves_fields_null() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = server.client.get(server.url("/health")).send().await?.json::<Value>().await?;
    assert!(body["data"]["echo"].is_null());
    assert!(body["data"]["path_echo"].is_null());
    Ok(())
}
