mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    let _body = res.json::<serde_json::Value>().await?;
    Ok(())
}

#[tokio::test]
async fn register_login_me_round_trip() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = common::unique_email("roundtrip");
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "email": email,
            "password": "secret99",
            "name": "Round Trip",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let registered = res.json::<serde_json::Value>().await?;
    assert_eq!(registered["user"]["email"], email.as_str());
    assert_eq!(registered["user"]["role"], "USER");
    assert!(registered["user"].get("password").is_none(), "password leaked");

    // Same credentials log in and yield a usable token
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": email, "password": "secret99" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login = res.json::<serde_json::Value>().await?;
    let token = login["token"].as_str().unwrap();

    let res = client
        .get(format!("{}/auth/me", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me = res.json::<serde_json::Value>().await?;
    assert_eq!(me["user"]["email"], email.as_str());

    Ok(())
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = common::unique_email("dup");
    let body = serde_json::json!({
        "email": email,
        "password": "secret99",
        "name": "First",
    });

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["error"], "User already exists");
    assert!(payload["message"].is_string());

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = common::unique_email("wrongpw");
    client
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "email": email,
            "password": "secret99",
            "name": "User",
        }))
        .send()
        .await?;

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": email, "password": "not-it" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["error"], "Invalid credentials");

    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/me", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/leads", server.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn short_password_is_a_validation_error() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&serde_json::json!({
            "email": common::unique_email("short"),
            "password": "abc",
            "name": "User",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["error"], "Validation error");
    assert_eq!(payload["details"][0]["field"], "password");

    Ok(())
}
