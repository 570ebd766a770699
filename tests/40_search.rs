mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{emails, lead_json, with_fields, TestServer};

/// A (score 10, new), B (score 20, contacted, Acme), C (score 30, won)
async fn seed(server: &TestServer) -> Result<()> {
    let leads = [
        with_fields(lead_json("a@example.com"), json!({ "score": 10, "status": "new", "is_qualified": true })),
        with_fields(
            lead_json("b@example.com"),
            json!({ "score": 20, "status": "contacted", "company": "ACME Corp", "is_qualified": false }),
        ),
        with_fields(lead_json("c@example.com"), json!({ "score": 30, "status": "won", "city": "Springfield" })),
    ];
    for lead in leads {
        server.add_lead(lead).await?;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    Ok(())
}

async fn search(server: &TestServer, query: &str) -> Result<Vec<String>> {
    let res = server.get(&format!("/leads/search?{}", query)).send().await?;
    assert_eq!(res.status(), StatusCode::OK, "query {}", query);
    let body = res.json::<Value>().await?;
    Ok(emails(&body["leads"]))
}

#[tokio::test]
async fn score_range_and_bounds() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server).await?;

    assert_eq!(search(&server, "score_between=15,25").await?, vec!["b@example.com"]);
    assert_eq!(search(&server, "score_gt=10&score_lt=30").await?, vec!["b@example.com"]);
    assert_eq!(search(&server, "score=30").await?, vec!["c@example.com"]);
    Ok(())
}

#[tokio::test]
async fn status_sets_and_free_text() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server).await?;

    assert_eq!(search(&server, "status_in=new,won").await?, vec!["c@example.com", "a@example.com"]);
    assert_eq!(search(&server, "q=acme").await?, vec!["b@example.com"]);
    assert_eq!(search(&server, "city_contains=spring").await?, vec!["c@example.com"]);
    Ok(())
}

#[tokio::test]
async fn qualification_flag() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server).await?;

    assert_eq!(search(&server, "is_qualified=true").await?, vec!["a@example.com"]);
    // Anything other than "true" means false; a lead with no flag matches neither
    assert_eq!(search(&server, "is_qualified=yes").await?, vec!["b@example.com"]);
    Ok(())
}

#[tokio::test]
async fn no_parameters_returns_everything_newest_first() -> Result<()> {
    let server = TestServer::spawn().await?;
    seed(&server).await?;

    assert_eq!(
        search(&server, "").await?,
        vec!["c@example.com", "b@example.com", "a@example.com"]
    );
    Ok(())
}

#[tokio::test]
async fn malformed_parameters_are_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    for query in ["score_gt=lots", "score_between=5", "status=cold", "created_after=yesterday"] {
        let res = server.get(&format!("/leads/search?{}", query)).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "query {}", query);
        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert!(body["field_errors"].is_object());
    }
    Ok(())
}

#[tokio::test]
async fn repeated_query_parameters_get_a_json_error() -> Result<()> {
    let server = TestServer::spawn().await?;

    for path in ["/leads/search?q=a&q=b", "/leads/getleads?page=1&page=2"] {
        let res = server.get(path).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "path {}", path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
        assert!(body["error"].is_string());
    }
    Ok(())
}
