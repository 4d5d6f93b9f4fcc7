mod common;

use common::{healthy_backend, url_json, MockBackend};
use serde_json::json;
use std::sync::Arc;
use uptime_dashboard::{Actions, Fetchers, NewUrl, Notice, ViewStore};

fn actions(backend: Arc<MockBackend>) -> (Actions, Arc<ViewStore>) {
    let store = Arc::new(ViewStore::default());
    (Actions::new(Fetchers::new(backend, store.clone())), store)
}

#[tokio::test]
async fn blank_form_sends_nothing() {
    let backend = healthy_backend(24);
    let (actions, _store) = actions(backend.clone());

    let notice = actions.add_url(NewUrl::new("", "https://a.example")).await;
    assert_eq!(notice, Notice::error("Name and URL are required"));

    let notice = actions.add_url(NewUrl::new("A", "")).await;
    assert_eq!(notice, Notice::error("Name and URL are required"));

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn added_url_reloads_list_and_stats() {
    let backend = healthy_backend(24);
    backend.respond(
        "POST",
        "urls",
        json!({ "success": true, "url": url_json(3, "Blog") }),
    );
    let (actions, store) = actions(backend.clone());

    let notice = actions.add_url(NewUrl::new("Blog", "https://blog.example")).await;
    assert_eq!(notice, Notice::info("Now monitoring Blog"));
    assert_eq!(
        backend.calls(),
        vec!["POST urls".to_string(), "GET urls".to_string(), "GET stats".to_string()]
    );
    assert_eq!(store.snapshot().urls.len(), 2);
}

#[tokio::test]
async fn duplicate_url_shows_the_rejection() {
    let backend = healthy_backend(24);
    backend.respond(
        "POST",
        "urls",
        json!({ "success": false, "error": "URL already exists" }),
    );
    let (actions, store) = actions(backend.clone());

    let notice = actions.add_url(NewUrl::new("Shop", "https://shop.example")).await;
    assert_eq!(notice, Notice::error("URL already exists"));
    assert_eq!(backend.count("GET urls"), 0);
    assert!(store.snapshot().urls.is_empty());
}

#[tokio::test]
async fn delete_reloads_urls() {
    let backend = healthy_backend(24);
    backend.respond("DELETE", "urls/2", json!({ "success": true, "message": "URL deleted" }));
    let (actions, _store) = actions(backend.clone());

    let notice = actions.delete_url(2).await;
    assert_eq!(notice, Notice::info("URL deleted"));
    assert_eq!(backend.count("GET urls"), 1);
    assert_eq!(backend.count("GET stats"), 1);
}

#[tokio::test]
async fn failed_delete_is_an_error_notice() {
    let backend = healthy_backend(24);
    let (actions, _store) = actions(backend.clone());

    let notice = actions.delete_url(9).await;
    assert!(notice.is_error());
    assert!(notice.text().starts_with("Failed to remove URL"));
    assert_eq!(backend.count("GET urls"), 0);
}

#[tokio::test]
async fn deleting_the_selected_url_clears_its_history() {
    let backend = healthy_backend(24);
    backend.respond("GET", "urls/2/history", json!({ "history": [] }));
    backend.respond("DELETE", "urls/2", json!({ "success": true }));
    let (actions, store) = actions(backend.clone());

    actions.open_history(2).await;
    assert_eq!(store.selection().selected_url_id, Some(2));

    backend.respond("GET", "urls", json!({ "urls": [url_json(1, "Shop")] }));
    actions.delete_url(2).await;
    assert_eq!(store.selection().selected_url_id, None);
}

#[tokio::test]
async fn opening_another_test_drops_the_result_selection() {
    let backend = healthy_backend(24);
    backend.respond("GET", "synthetic-tests/1/results", json!({ "results": [common::result_json(7, 1)] }));
    backend.respond("GET", "synthetic-tests/1/results/7/steps", json!({ "steps": [] }));
    backend.respond("GET", "synthetic-tests/2/results", json!({ "results": [] }));
    let (actions, store) = actions(backend);

    actions.open_results(1).await;
    actions.open_steps(1, 7).await;
    assert_eq!(store.selection().selected_result_id, Some(7));

    actions.open_results(2).await;
    let selection = store.selection();
    assert_eq!(selection.selected_test_id, Some(2));
    assert_eq!(selection.selected_result_id, None);
    assert!(store.snapshot().result_steps.is_empty());
}
