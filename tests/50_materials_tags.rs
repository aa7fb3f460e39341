//! Material ownership and tag management end-to-end.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn material_mutation_follows_ownership_policy() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let (owner_id, owner_token) = common::register_user(&client, &server.base_url, "user").await?;
    let (_, other_token) = common::register_user(&client, &server.base_url, "user").await?;
    let (_, admin_token) = common::register_user(&client, &server.base_url, "admin").await?;

    let res = client
        .post(format!("{}/api/materials", server.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({
            "title": common::unique("Big-O cheatsheet "),
            "content": "n, n log n, n^2",
            "type": "cheatsheet",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let material: Value = res.json().await?;
    let id = material["id"].as_i64().unwrap();
    assert_eq!(material["userId"], owner_id);

    // Public read without authentication
    let res = client
        .get(format!("{}/api/materials/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Non-owner plain user is denied
    let res = client
        .put(format!("{}/api/materials/{}", server.base_url, id))
        .bearer_auth(&other_token)
        .json(&json!({ "title": "mine now", "content": "x", "type": "article" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin elevation wins
    let res = client
        .delete(format!("{}/api/materials/{}", server.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn duplicate_tag_names_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();
    let (_, admin_token) = common::register_user(&client, &server.base_url, "admin").await?;

    let name = common::unique("tag-");
    let res = client
        .post(format!("{}/api/tags", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/api/tags", server.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "name": name }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Tag already exists");

    // Listing is public and carries problem counts
    let res = client.get(format!("{}/api/tags", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let tags: Value = res.json().await?;
    assert!(tags.as_array().unwrap().iter().any(|t| t["name"] == name.as_str()));
    Ok(())
}

#[tokio::test]
async fn registration_rejects_duplicate_emails_and_bad_input() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let name = common::unique("dup");
    let payload = json!({
        "username": name,
        "email": format!("{}@example.com", name),
        "password": "secret123",
    });

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut duplicate = payload.clone();
    duplicate["username"] = json!(common::unique("dup"));
    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&duplicate)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Email already in use");

    // Short password fails validation before any storage write
    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({
            "username": common::unique("shorty"),
            "email": format!("{}@example.com", common::unique("shorty")),
            "password": "abc",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_round_trip_and_bad_credentials() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let name = common::unique("login");
    let email = format!("{}@example.com", name);
    client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "username": name, "email": email, "password": "secret123" }))
        .send()
        .await?
        .error_for_status()?;

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["token"].as_str().is_some());
    assert!(body["user"].get("password").is_none());

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid credentials");
    Ok(())
}
