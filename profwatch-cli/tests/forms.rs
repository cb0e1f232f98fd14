use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use httpmock::prelude::*;
use profwatch_api::model::monitor::ListPolicy;
use profwatch_api::serde_json::{self, json};
use profwatch_api::API;
use profwatch_cli::helper::ctx::{Args, OutputFormat};
use profwatch_cli::helper::detect::{Detector, FETCH_ERROR};
use profwatch_cli::helper::form::{Component, Form};
use profwatch_cli::helper::monitor::{Monitor, MONITOR_ERROR};
use profwatch_cli::helper::session::{run_interactive, submit_once};
use profwatch_cli::helper::utils::build_api;
use tokio::sync::mpsc;

fn args(server: &MockServer) -> Args {
    Args::builder()
        .api_base_url(server.base_url())
        .build()
        .unwrap()
}

/// A line source that ends once `items` are consumed.
fn lines(items: &[&str]) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(items.len().max(1));
    for item in items {
        tx.try_send((*item).to_owned()).unwrap();
    }
    rx
}

fn slow_body() -> serde_json::Value {
    json!([{
        "username": "slow",
        "followers_count": 1,
        "following_count": 1,
        "subscriptions_count": 0,
        "is_verified": false,
        "status": "Fake"
    }])
}

fn alice_body() -> serde_json::Value {
    json!([{
        "username": "alice",
        "followers_count": 10,
        "following_count": 5,
        "subscriptions_count": 2,
        "is_verified": true,
        "status": "ok"
    }])
}

#[tokio::test]
async fn detect_once_renders_profile() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect_profile")
                .json_body(json!({ "username": "alice" }));
            then.status(200).json_body(alice_body());
        })
        .await;

    let args = args(&server);
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Detector::new());
    let mut out = Vec::new();

    let ok = submit_once(&&args, &api, &mut form, "alice", &mut out, &AtomicBool::new(false))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(ok);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Username: alice"));
    assert!(text.contains("Followers Count: 10"));
    assert!(text.contains("Is Verified: Yes"));
}

#[tokio::test]
async fn detect_error_clears_previous_profile() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect_profile")
                .json_body(json!({ "username": "alice" }));
            then.status(200).json_body(alice_body());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect_profile")
                .json_body(json!({ "username": "mallory" }));
            then.status(503);
        })
        .await;

    let api = API::try_with_base_url(&server.base_url()).unwrap();
    let mut form = Form::new(Detector::new());

    let detector = form.submit(&api, "alice").await;
    assert!(detector.view().data().is_some());

    let detector = form.submit(&api, "mallory").await;
    assert_eq!(detector.view().data(), None);
    assert_eq!(detector.view().render(OutputFormat::Text), FETCH_ERROR);
    assert_eq!(detector.username(), "mallory");

    let args = args(&server);
    let mut out = Vec::new();
    let ok = submit_once(&&args, &api, &mut form, "mallory", &mut out, &AtomicBool::new(false))
        .await
        .unwrap();
    assert!(!ok);
    assert_eq!(String::from_utf8(out).unwrap(), format!("{FETCH_ERROR}\n"));
}

#[tokio::test]
async fn monitor_replaces_results_each_submit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/monitor")
                .json_body(json!({ "profiles": ["a", "b", "c"] }));
            then.status(200)
                .json_body(json!([{ "status": "fake" }, { "status": "real" }]));
        })
        .await;

    let api = API::try_with_base_url(&server.base_url()).unwrap();
    let mut form = Form::new(Monitor::new(ListPolicy::default()));

    let first = form
        .submit(&api, "a, b ,c")
        .await
        .view()
        .render(OutputFormat::Text);
    let second = form
        .submit(&api, "a, b ,c")
        .await
        .view()
        .render(OutputFormat::Text);

    mock.assert_hits_async(2).await;
    assert_eq!(first, "Status: fake\n----\nStatus: real\n----");
    assert_eq!(first, second);
}

#[tokio::test]
async fn monitor_failure_is_shown_to_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/monitor");
            then.status(200).body("not json");
        })
        .await;

    let args = args(&server);
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Monitor::new(ListPolicy::default()));
    let mut out = Vec::new();

    let ok = submit_once(&&args, &api, &mut form, "a,b", &mut out, &AtomicBool::new(false))
        .await
        .unwrap();

    assert!(!ok);
    assert_eq!(String::from_utf8(out).unwrap(), format!("{MONITOR_ERROR}\n"));
}

#[tokio::test]
async fn interactive_drops_stale_responses() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect_profile")
                .json_body(json!({ "username": "slow" }));
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(slow_body());
        })
        .await;
    let fast = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/detect_profile")
                .json_body(json!({ "username": "alice" }));
            then.status(200).json_body(alice_body());
        })
        .await;

    let args = args(&server);
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Detector::new());
    let mut out = Vec::new();

    let stop = AtomicBool::new(false);
    run_interactive(
        &&args,
        &api,
        &mut form,
        lines(&["slow", "", "alice"]),
        &mut out,
        &stop,
    )
    .await
    .unwrap();

    slow.assert_async().await;
    fast.assert_async().await;
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Username: alice"));
    assert!(!text.contains("Username: slow"));
    assert_eq!(form.component().view().data().map(|r| r.username.as_str()), Some("alice"));
}

#[tokio::test]
async fn json_format_prints_records() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/monitor");
            then.status(200)
                .json_body(json!([{ "username": "bob", "status": "Genuine" }]));
        })
        .await;

    let args = Args::builder()
        .api_base_url(server.base_url())
        .format(OutputFormat::Json)
        .build()
        .unwrap();
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Monitor::new(ListPolicy::default()));
    let mut out = Vec::new();

    submit_once(&&args, &api, &mut form, "bob", &mut out, &AtomicBool::new(false))
        .await
        .unwrap();

    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed, json!([{ "username": "bob", "status": "Genuine" }]));
}

#[tokio::test]
async fn interactive_drains_pending_request_after_interrupt() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/detect_profile");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(slow_body());
        })
        .await;

    let args = args(&server);
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Detector::new());
    let mut out = Vec::new();
    let stop = AtomicBool::new(false);

    // the sender stays alive for the whole test, so input never reaches EOF
    let (tx, rx) = mpsc::channel(4);
    let ctx = &args;
    let session = run_interactive(&ctx, &api, &mut form, rx, &mut out, &stop);
    let interrupt = async {
        tx.send("slow".to_owned()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop.store(true, Ordering::Relaxed);
    };

    let (finished, ()) = tokio::join!(
        tokio::time::timeout(Duration::from_secs(5), session),
        interrupt
    );
    finished.expect("session did not end after interrupt").unwrap();

    slow.assert_async().await;
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Username: slow"));
    assert!(tx.send("late".to_owned()).await.is_err());
}

#[tokio::test]
async fn submit_once_returns_on_interrupt() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/monitor");
            then.status(200)
                .delay(Duration::from_secs(30))
                .json_body(json!([{ "status": "fake" }]));
        })
        .await;

    let args = args(&server);
    let api = build_api(&&args).unwrap();
    let mut form = Form::new(Monitor::new(ListPolicy::default()));
    let mut out = Vec::new();
    let stop = AtomicBool::new(false);

    let ctx = &args;
    let submit = submit_once(&ctx, &api, &mut form, "a,b", &mut out, &stop);
    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop.store(true, Ordering::Relaxed);
    };

    let (result, ()) = tokio::join!(
        tokio::time::timeout(Duration::from_secs(5), submit),
        interrupt
    );
    let result = result.expect("request was not abandoned after interrupt");

    assert!(result.is_err());
    assert!(out.is_empty());
    assert_eq!(form.component().view(), &profwatch_cli::helper::view::View::Idle);
}
