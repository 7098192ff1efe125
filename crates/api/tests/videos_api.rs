//! Integration tests for the gallery endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, get, post_json, put_json, seed_record,
    wait_until_settled, Script, FAKE_VIDEO,
};
use serde_json::json;

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn empty_gallery_lists_nothing() {
    let app = build_test_app(Script::Succeed).await;
    let json = body_json(get(&app, "/api/v1/videos").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn list_defaults_to_newest_first() {
    let app = build_test_app(Script::Succeed).await;
    seed_record(&app, "one", 1).await;
    seed_record(&app, "three", 3).await;
    seed_record(&app, "two", 2).await;

    let response = get(&app, "/api/v1/videos").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), ["three", "two", "one"]);
}

#[tokio::test]
async fn list_honours_sort_query() {
    let app = build_test_app(Script::Succeed).await;
    seed_record(&app, "Banana", 1).await;
    seed_record(&app, "apple", 2).await;
    seed_record(&app, "Cherry", 3).await;

    let json = body_json(get(&app, "/api/v1/videos?sort=title-asc").await).await;
    assert_eq!(titles(&json), ["apple", "Banana", "Cherry"]);

    let json = body_json(get(&app, "/api/v1/videos?sort=date-asc").await).await;
    assert_eq!(titles(&json), ["Banana", "apple", "Cherry"]);
}

#[tokio::test]
async fn list_falls_back_to_persisted_preference() {
    let app = build_test_app(Script::Succeed).await;
    seed_record(&app, "b", 1).await;
    seed_record(&app, "a", 2).await;
    seed_record(&app, "c", 3).await;

    let response = put_json(
        &app,
        "/api/v1/preferences/sort-order",
        json!({"sort_order": "title-desc"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app, "/api/v1/videos").await).await;
    assert_eq!(titles(&json), ["c", "b", "a"]);
}

#[tokio::test]
async fn list_rejects_unknown_sort() {
    let app = build_test_app(Script::Succeed).await;
    let response = get(&app, "/api/v1/videos?sort=random").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_video_includes_data_uri() {
    let app = build_test_app(Script::Succeed).await;
    let record = seed_record(&app, "Sunset", 1).await;

    let response = get(&app, &format!("/api/v1/videos/{}", record.id())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Sunset");
    assert_eq!(json["data"]["artifact"]["media_type"], "video/mp4");
    assert!(json["data"]["artifact"]["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:video/mp4;base64,"));
}

#[tokio::test]
async fn get_unknown_video_returns_404() {
    let app = build_test_app(Script::Succeed).await;
    let response = get(&app, &format!("/api/v1/videos/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn artifact_endpoint_returns_decoded_bytes() {
    let app = build_test_app(Script::Succeed).await;
    let record = seed_record(&app, "clip", 1).await;

    let response = get(&app, &format!("/api/v1/videos/{}/artifact", record.id())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "video/mp4");
    assert_eq!(body_bytes(response).await, FAKE_VIDEO);
}

#[tokio::test]
async fn create_video_generates_and_prepends_record() {
    let app = build_test_app(Script::Succeed).await;
    seed_record(&app, "older", 1).await;

    let response = post_json(&app, "/api/v1/videos", json!({"prompt": "  A fox in snow  "})).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"]["state"]["status"], "running");

    wait_until_settled(&app).await;

    assert_eq!(app.client.submitted(), vec!["A fox in snow".to_string()]);

    let gallery = app.state.orchestrator.gallery().read().await;
    assert_eq!(gallery.len(), 2);
    let newest = gallery.iter().next().unwrap();
    assert_eq!(newest.title(), "New: \"A fox in snow...\"");
    assert_eq!(newest.description(), "A fox in snow");
}

#[tokio::test]
async fn create_video_rejects_blank_prompt() {
    let app = build_test_app(Script::Succeed).await;
    let response = post_json(&app, "/api/v1/videos", json!({"prompt": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(app.client.submitted().is_empty());
}

#[tokio::test]
async fn create_video_while_running_returns_409() {
    let app = build_test_app(Script::Hang).await;

    let first = post_json(&app, "/api/v1/videos", json!({"prompt": "slow"})).await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = post_json(&app, "/api/v1/videos", json!({"prompt": "again"})).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");

    app.state.orchestrator.cancel_current();
    wait_until_settled(&app).await;
    assert!(app.state.orchestrator.gallery().read().await.is_empty());
}

#[tokio::test]
async fn remix_titles_new_record_after_origin() {
    let app = build_test_app(Script::Succeed).await;
    let origin = seed_record(&app, "Ocean Waves", 1).await;

    let response = post_json(
        &app,
        &format!("/api/v1/videos/{}/remix", origin.id()),
        json!({"description": "ocean waves at night"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"]["state"]["context"], "remix");

    wait_until_settled(&app).await;

    let gallery = app.state.orchestrator.gallery().read().await;
    let newest = gallery.iter().next().unwrap();
    assert_eq!(newest.title(), "Remix of \"Ocean Waves\"");
    assert_eq!(newest.description(), "ocean waves at night");
    // The origin is untouched.
    assert_eq!(gallery.get(origin.id()).unwrap().description(), origin.description());
}

#[tokio::test]
async fn remix_of_unknown_video_returns_404() {
    let app = build_test_app(Script::Succeed).await;
    let response = post_json(
        &app,
        &format!("/api/v1/videos/{}/remix", uuid::Uuid::new_v4()),
        json!({"description": "x"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.client.submitted().is_empty());
}
