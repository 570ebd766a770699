mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::{emails, lead_json, TestServer};

async fn seed(server: &TestServer, count: usize) -> Result<()> {
    for i in 1..=count {
        server.add_lead(lead_json(&format!("lead{:02}@example.com", i))).await?;
        // Distinct creation times
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    Ok(())
}

#[tokio::test]
async fn defaults_and_totals() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server, 25).await?;

    let res = server.get("/leads/getleads").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["total"], 25);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(20));
    Ok(())
}

#[tokio::test]
async fn limit_is_clamped_to_the_maximum() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server, 3).await?;

    let body = server.get("/leads/getleads?limit=200").send().await?.json::<Value>().await?;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn second_page_is_records_eleven_to_twenty_newest_first() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server, 25).await?;

    let body = server.get("/leads/getleads?page=2&limit=10").send().await?.json::<Value>().await?;
    let expected: Vec<String> = (6..=15).rev().map(|i| format!("lead{:02}@example.com", i)).collect();
    assert_eq!(emails(&body["data"]), expected);
    assert_eq!(body["totalPages"], 3);
    Ok(())
}

#[tokio::test]
async fn invalid_page_values_are_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    for query in ["page=0", "page=abc", "limit=-1"] {
        let res = server.get(&format!("/leads/getleads?{}", query)).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {}", query);
    }
    Ok(())
}
