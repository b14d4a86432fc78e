use api_lib::adapters::{LocalAssetUploader, MemoryDocumentStore};
use api_lib::config::Config;
use api_lib::web::{router, AppState, DraftRegistry};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn test_app() -> TestApp {
    test_app_with(&[])
}

fn test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let upload_dir = std::env::temp_dir().join(format!("course-api-{}", Uuid::new_v4()));
    let config = Config::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| (key == "DOCUMENT_STORE").then(|| "memory".to_string()))
    })
    .expect("memory config");
    let state = Arc::new(AppState {
        store: Arc::new(MemoryDocumentStore::new()),
        uploader: Arc::new(LocalAssetUploader::new(upload_dir.clone(), "/assets")),
        config: Arc::new(config),
        drafts: Arc::new(DraftRegistry::new()),
    });
    TestApp {
        router: router(state),
        upload_dir,
    }
}

async fn call(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

fn post(uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn open_draft(app: &TestApp) -> String {
    let (status, view) = call(app, post("/drafts", None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["step"], 1);
    view["draft_id"].as_str().unwrap().to_string()
}

async fn command(app: &TestApp, draft: &str, body: Value) -> (StatusCode, Value) {
    call(app, post(&format!("/drafts/{}/commands", draft), Some(body))).await
}

#[tokio::test]
async fn next_is_refused_until_basic_info_is_filled() {
    let app = test_app();
    let draft = open_draft(&app).await;

    let (status, view) = call(&app, post(&format!("/drafts/{}/next", draft), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(view["step"], 1);
    assert!(view["notice"]["message"].as_str().unwrap().contains("Course name"));

    let (status, view) = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/drafts/{}/notice", draft))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(view["notice"].is_null());
}

#[tokio::test]
async fn refused_command_returns_notice() {
    let app = test_app();
    let draft = open_draft(&app).await;

    let (status, _) = command(&app, &draft, json!({ "type": "add_feature", "text": "Signals" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, view) = command(&app, &draft, json!({ "type": "add_feature", "text": "Signals" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(view["course"]["features"], json!(["Signals"]));
    assert!(view["notice"]["message"].as_str().unwrap().contains("already listed"));
}

#[tokio::test]
async fn draft_count_is_capped() {
    let app = test_app_with(&[("MAX_DRAFTS", "1")]);
    let draft = open_draft(&app).await;

    let (status, _) = call(&app, post("/drafts", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/drafts/{}", draft))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    open_draft(&app).await;
}

#[tokio::test]
async fn unknown_draft_is_not_found() {
    let app = test_app();
    let (status, _) = call(&app, get(&format!("/drafts/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_wizard_commits_course() {
    let app = test_app();
    let draft = open_draft(&app).await;

    let commands = vec![
        json!({ "type": "set_field", "field": "name", "value": "Options Income" }),
        json!({ "type": "set_field", "field": "instructor", "value": "L. Fernandes" }),
        json!({ "type": "set_field", "field": "description", "value": "Covered calls and spreads" }),
        json!({ "type": "set_field", "field": "price", "value": 79.5 }),
        json!({ "type": "set_banner", "url": "https://cdn.example.com/banner.png" }),
        json!({ "type": "add_chapter", "title": "Basics", "duration": "1h" }),
        json!({ "type": "select_chapter", "index": 0 }),
        json!({ "type": "set_lesson_field", "field": "title", "value": "Intro" }),
        json!({ "type": "set_lesson_field", "field": "type", "value": "video" }),
        json!({ "type": "set_lesson_field", "field": "duration", "value": "10m" }),
        json!({ "type": "add_key_point", "title": "Point A" }),
        json!({ "type": "add_quiz_question", "question": "Q1?", "options": ["A", "B", "C", "D"], "correct_answer": 1 }),
        json!({ "type": "commit_lesson" }),
    ];
    for body in commands {
        let (status, view) = command(&app, &draft, body.clone()).await;
        assert_eq!(status, StatusCode::OK, "{} -> {}", body, view["notice"]);
    }

    let (status, _) = call(&app, post(&format!("/drafts/{}/submit", draft), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    for expected in [2, 3, 4] {
        let (status, view) = call(&app, post(&format!("/drafts/{}/next", draft), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], expected);
    }
    let (_, view) = call(&app, get(&format!("/drafts/{}", draft))).await;
    assert_eq!(view["review"]["lesson_count"], 1);

    let (status, body) = call(&app, post(&format!("/drafts/{}/submit", draft), None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = body["course_id"].as_str().unwrap().to_string();
    assert_eq!(course_id.len(), 6);

    let (_, view) = call(&app, get(&format!("/drafts/{}", draft))).await;
    assert_eq!(view["step"], 1);
    assert!(view["course"]["chapters"].as_array().unwrap().is_empty());

    let (status, stored) = call(&app, get(&format!("/courses/{}", course_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["name"], "Options Income");
    assert_eq!(stored["status"], "draft");
    let lesson = &stored["chapters"][0]["lessons"][0];
    assert_eq!(lesson["type"], "video");
    assert_eq!(lesson["keyPoints"][0]["title"], "Point A");
    assert_eq!(lesson["quiz"][0]["correctAnswer"], 1);
}

fn multipart(file_name: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "X-COURSE-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

fn upload(draft: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let (header, body) = multipart(file_name, content_type, data);
    Request::builder()
        .method("POST")
        .uri(format!("/drafts/{}/banner", draft))
        .header("content-type", header)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn banner_upload_sets_url_in_background() {
    let app = test_app();
    let draft = open_draft(&app).await;

    let (status, view) = call(&app, upload(&draft, "deck.pdf", "application/pdf", b"%PDF")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(view["notice"]["message"].as_str().unwrap().contains("image"));

    let (status, _) = call(&app, upload(&draft, "banner.png", "image/png", &[1, 2, 3, 4])).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let mut banner = String::new();
    for _ in 0..100 {
        let (_, view) = call(&app, get(&format!("/drafts/{}", draft))).await;
        if view["banner_upload"]["pending"] == false {
            banner = view["course"]["banner"].as_str().unwrap_or_default().to_string();
            assert_eq!(view["banner_upload"]["progress"], 100);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(banner.starts_with("/assets/"), "banner was {:?}", banner);
    assert!(banner.ends_with(".png"));
}
