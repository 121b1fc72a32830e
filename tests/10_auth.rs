mod common;

use agency_collab_api::auth::{encode_token, Claims};
use agency_collab_api::server;
use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

async fn call(request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = server::app().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn get(uri: &str, authorization: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    Ok(builder.body(Body::empty())?)
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let (status, body) = call(get("/", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Agency Collaboration API");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    for uri in ["/api/me", "/api/companies", "/api/collaborations", "/api/dashboard"] {
        let (status, body) = call(get(uri, None)?).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not authenticated");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_is_rejected() -> Result<()> {
    for value in ["Token abc", "Bearer ", "Bearer not-a-jwt"] {
        let (status, _) = call(get("/api/me", Some(value))?).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", value);
    }
    Ok(())
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() -> Result<()> {
    let token = encode_token(&Claims::new(Uuid::new_v4(), 1)?, "some-other-secret")?;
    let (status, body) = call(get("/api/me", Some(&format!("Bearer {}", token)))?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected_by_running_server() -> Result<()> {
    let server = common::ensure_server().await?;
    let mut claims = Claims::new(Uuid::new_v4(), 1)?;
    claims.aud = None;
    claims.exp = claims.iat - 3600;
    let token = encode_token(&claims, common::TEST_SECRET)?;

    let res = reqwest::Client::new()
        .get(server.url("/api/me"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new().get(server.url("/health")).send().await?;

    // OK or SERVICE_UNAVAILABLE depending on whether a database is reachable
    assert!(
        res.status() == reqwest::StatusCode::OK || res.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    let body = res.json::<Value>().await?;
    assert!(body["data"]["status"].is_string());
    Ok(())
}
