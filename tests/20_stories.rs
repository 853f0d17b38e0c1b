mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn crud_walkthrough() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = &server.client;

    assert_eq!(server.create_story("first").await?, 1);
    assert_eq!(server.create_story("second").await?, 2);

    // List returns both, in id order
    let res = server.authed(client.get(server.stories(""))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = res.json::<Value>().await?;
    let titles: Vec<&str> = list
        .as_array()
        .expect("list body should be an array")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["first", "second"]);

    // Unknown id
    let (status, body) = server.get_story("3").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "StoryNotFound" }));

    // Create reports the new id
    let res = server
        .authed(client.post(server.stories("")))
        .json(&json!({ "title": "X" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({ "ID": 3 }));

    // Update, then observe the change
    let res = server
        .authed(client.put(server.stories("/3")))
        .json(&json!({ "title": "Y" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let (status, body) = server.get_story("3").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["title"], "Y");

    // Delete, then it is gone
    let res = server.authed(client.delete(server.stories("/3"))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, body) = server.get_story("3").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "StoryNotFound" }));
    Ok(())
}

#[tokio::test]
async fn get_returns_the_stored_record() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .authed(server.client.post(server.stories("")))
        .json(&json!({ "title": "Dune", "content": "A desert planet." }))
        .send()
        .await?;
    let id = res.json::<Value>().await?["ID"].as_i64().unwrap_or_default();

    let (status, body) = server.get_story(&id.to_string()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["content"], "A desert planet.");
    assert!(body["created_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn update_of_missing_story_is_not_found_and_changes_nothing() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.create_story("kept").await?;

    let res = server
        .authed(server.client.put(server.stories("/42")))
        .json(&json!({ "title": "ghost" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "StoryNotFound" }));

    let list = server
        .authed(server.client.get(server.stories("")))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["title"], "kept");
    Ok(())
}

#[tokio::test]
async fn delete_of_missing_story_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.authed(server.client.delete(server.stories("/7"))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "StoryNotFound" }));
    Ok(())
}

#[tokio::test]
async fn non_numeric_ids_are_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.create_story("only").await?;

    let (status, body) = server.get_story("abc").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "StoryNotFound" }));
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    server
        .authed(server.client.post(server.stories("")))
        .json(&json!({ "title": "Draft", "content": "Body text" }))
        .send()
        .await?;

    let res = server
        .authed(server.client.put(server.stories("/1")))
        .json(&json!({ "content": "Revised" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, body) = server.get_story("1").await?;
    assert_eq!(body["title"], "Draft");
    assert_eq!(body["content"], "Revised");
    Ok(())
}

#[tokio::test]
async fn null_content_clears_and_absent_content_keeps() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .authed(server.client.post(server.stories("")))
        .json(&json!({ "title": "Draft", "content": "first pass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = server
        .authed(server.client.put(server.stories("/1")))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get_story("1").await?;
    assert_eq!(body["content"], "first pass");

    let res = server
        .authed(server.client.put(server.stories("/1")))
        .json(&json!({ "content": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, body) = server.get_story("1").await?;
    assert_eq!(body["title"], "Renamed");
    assert!(body["content"].is_null());
    Ok(())
}
