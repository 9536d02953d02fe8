mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn profile_carries_lead_count() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;
    let category_id =
        common::create_category(&client, &server.base_url, &token, &common::unique("prof")).await?;

    let res = client
        .post(format!("{}/leads", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "counted", "categoryId": category_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/users/profile", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["user"]["leadCount"], 1);

    Ok(())
}

#[tokio::test]
async fn profile_email_cannot_steal_another_account() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, first_user) = common::register_user(&client, &server.base_url).await?;
    let (second_token, _) = common::register_user(&client, &server.base_url).await?;

    let res = client
        .put(format!("{}/users/profile", server.base_url))
        .bearer_auth(&second_token)
        .json(&json!({ "email": first_user["email"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["error"], "Email already exists");

    Ok(())
}

#[tokio::test]
async fn change_password_requires_the_current_one() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = common::unique_email("pwchange");
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "email": email, "password": "oldpass1", "name": "Pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let token = res.json::<serde_json::Value>().await?["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Wrong current password is rejected
    let res = client
        .put(format!("{}/users/change-password", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "not-it", "newPassword": "newpass1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Correct current password succeeds and the new one logs in
    let res = client
        .put(format!("{}/users/change-password", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "oldpass1", "newPassword": "newpass1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "newpass1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn deleted_account_invalidates_its_token() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;

    let res = client
        .delete(format!("{}/users/account", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The credential is cryptographically valid but the identity is gone;
    // re-verification on every request rejects it
    let res = client
        .get(format!("{}/auth/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn user_listing_is_admin_only() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;

    let res = client
        .get(format!("{}/users", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["error"], "Access denied");

    Ok(())
}
