//! Helper functions shared across the UI layer: background fetch spawning,
//! panic capture for spawned tasks, and small layout utilities.

use crate::app::{App, AppEvent, FetchRequest};
use futures::FutureExt;
use ratatui::layout::Rect;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Loading spinner animation frames.
pub(super) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Wraps a future to catch panics and convert them to errors.
///
/// A panic inside a spawned task would otherwise vanish into the runtime
/// and leave the UI waiting for an event that never comes.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Spawn the gateway call for `request`.
///
/// The task reports back through `AppEvent::ArticlesLoaded` carrying the
/// request's generation; the handle is kept on the app so a newer selection
/// (or dropping the app) can abort it.
pub(super) fn spawn_fetch(app: &mut App, request: FetchRequest, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous fetch task");
    }

    let gateway = Arc::clone(&app.gateway);
    let tx = event_tx.clone();
    let FetchRequest {
        generation,
        category_id,
        category_name,
    } = request;

    tracing::debug!(category = category_id, generation, "Spawning fetch task");

    app.fetch_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(gateway.fetch_articles(category_name)).await {
            Ok(result) => {
                if let Err(e) = tx
                    .send(AppEvent::ArticlesLoaded { generation, result })
                    .await
                {
                    tracing::warn!(error = %e, event = "ArticlesLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "fetch_articles", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "fetch_articles",
                        generation,
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Spawn `request` if there is one.
pub(super) fn maybe_spawn_fetch(
    app: &mut App,
    request: Option<FetchRequest>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(request) = request {
        spawn_fetch(app, request, event_tx);
    }
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y.min(100)) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadState;
    use crate::config::Config;
    use crate::storage::Database;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn app_against(base_url: &str) -> App {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_base_url: Some(base_url.to_string()),
            ..Config::default()
        };
        App::new(db, &config).await.unwrap()
    }

    fn gemini_body(articles_json: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": articles_json }] } }]
        })
    }

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        let result = catch_task_panic(async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_captures_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("kaboom") }).await;
        assert_eq!(result, Err("kaboom".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_formatted_message() {
        let n = 3;
        let result: Result<(), String> = catch_task_panic(async move { panic!("bad {}", n) }).await;
        assert_eq!(result, Err("bad 3".to_string()));
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_centered_rect_wide_terminal() {
        let r = centered_rect(80, 80, Rect::new(0, 0, 1000, 900));
        assert_eq!(r, Rect::new(100, 90, 800, 720));
    }

    #[tokio::test]
    async fn test_spawn_fetch_delivers_articles() {
        let server = MockServer::start().await;
        let payload = r#"{"articles":[{"id":"w1","headline":"H","subheadline":"S","summaryPoints":["p"],"content":"C","imageUrl":"https://img.example.com/1.jpg","sourceUri":"https://news.example.com/w1","sourceTitle":"Wire"}]}"#;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(payload)))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_against(&server.uri()).await;
        let (tx, mut rx) = mpsc::channel(8);

        let request = app.select_category(1).unwrap();
        spawn_fetch(&mut app, request, &tx);
        assert!(app.fetch_handle.is_some());

        match rx.recv().await.unwrap() {
            AppEvent::ArticlesLoaded { generation, result } => {
                assert!(app.apply_fetch_result(generation, result));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(app.visible_articles()[0].id, "w1");
    }

    #[tokio::test]
    async fn test_spawn_fetch_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_against(&server.uri()).await;
        let (tx, mut rx) = mpsc::channel(8);

        let request = app.select_category(2).unwrap();
        spawn_fetch(&mut app, request, &tx);

        let Some(AppEvent::ArticlesLoaded { generation, result }) = rx.recv().await else {
            panic!("expected ArticlesLoaded");
        };
        assert!(result.is_err());
        assert!(app.apply_fetch_result(generation, result));
        assert!(app.error().is_some());
    }
}
