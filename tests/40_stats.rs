mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn empty_account_reports_zeroes_everywhere() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;

    let res = client
        .get(format!("{}/leads/stats/overview", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let stats = res.json::<serde_json::Value>().await?;

    assert_eq!(stats["total"], 0);
    assert_eq!(stats["totalValue"], 0.0);
    // No priced leads: the average guards against dividing by zero
    assert_eq!(stats["avgValue"], 0.0);
    assert_eq!(stats["recent"], 0);

    // All enum keys present even with nothing observed
    assert_eq!(stats["byStatus"].as_object().unwrap().len(), 7);
    assert_eq!(stats["byPriority"].as_object().unwrap().len(), 4);
    assert_eq!(stats["byStatus"]["FOLLOW_UP"], 0);
    assert_eq!(stats["byPriority"]["URGENT"], 0);

    Ok(())
}

#[tokio::test]
async fn partnership_scenario_matches_expected_aggregates() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;
    let category_id =
        common::create_category(&client, &server.base_url, &token, &common::unique("Partnerships"))
            .await?;

    let res = client
        .post(format!("{}/leads", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Acme deal",
            "categoryId": category_id,
            "value": 5000.0,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let lead = res.json::<serde_json::Value>().await?;
    assert_eq!(lead["status"], "NEW", "status should default to NEW");

    let stats = client
        .get(format!("{}/leads/stats/overview", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(stats["total"], 1);
    assert_eq!(stats["byStatus"]["NEW"], 1);
    assert_eq!(stats["totalValue"], 5000.0);
    assert_eq!(stats["avgValue"], 5000.0);
    assert_eq!(stats["recent"], 1);

    Ok(())
}

#[tokio::test]
async fn status_counts_sum_to_total_and_won_value_is_surfaced() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(&client, &server.base_url).await?;
    let category_id =
        common::create_category(&client, &server.base_url, &token, &common::unique("sum")).await?;

    for (title, status, value) in [
        ("a", "WON", Some(1000.0)),
        ("b", "WON", Some(2500.0)),
        ("c", "LOST", Some(400.0)),
        ("d", "NEW", None),
    ] {
        let mut body = json!({
            "title": title,
            "categoryId": category_id,
            "status": status,
        });
        if let Some(v) = value {
            body["value"] = json!(v);
        }
        let res = client
            .post(format!("{}/leads", server.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let stats = client
        .get(format!("{}/leads/stats/overview", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;

    let by_status = stats["byStatus"].as_object().unwrap();
    let sum: i64 = by_status.values().map(|v| v.as_i64().unwrap()).sum();
    assert_eq!(sum, stats["total"].as_i64().unwrap());
    assert_eq!(stats["byStatus"]["WON"], 2);

    // Average divides by priced leads only (3 of the 4 carry a value)
    assert_eq!(stats["totalValue"], 3900.0);
    assert_eq!(stats["avgValue"], 1300.0);

    // Sum of value restricted to WON
    assert_eq!(stats["wonValue"], 3500.0);

    Ok(())
}
