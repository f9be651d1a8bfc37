//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the current view
//! and dispatched to the controller. Transitions that need the gateway hand
//! back a fetch request, which is spawned here.

use crate::app::{App, AppEvent, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::maybe_spawn_fetch;
use super::Action;

fn view_to_context(view: View) -> KbContext {
    match view {
        View::List => KbContext::List,
        View::Detail => KbContext::Detail,
    }
}

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        handle_help_input(app, code);
        return Action::Continue;
    }

    let context = view_to_context(app.view());
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::ShowHelp => app.show_help = true,
        KbAction::ToggleTheme => {
            let variant = app.toggle_theme().await;
            app.set_status(format!("Theme: {}", variant.name()));
        }

        KbAction::NextCategory => {
            let request = app.next_category();
            maybe_spawn_fetch(app, request, event_tx);
        }
        KbAction::PrevCategory => {
            let request = app.prev_category();
            maybe_spawn_fetch(app, request, event_tx);
        }
        KbAction::JumpToCategory(index) => {
            let request = app.select_category(usize::from(index));
            maybe_spawn_fetch(app, request, event_tx);
        }
        KbAction::Retry => {
            let request = app.retry();
            maybe_spawn_fetch(app, request, event_tx);
        }

        KbAction::ToggleSave => {
            app.toggle_save_current().await;
        }
        KbAction::OpenSource => app.open_source(),

        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Open => {
            app.open_selected();
        }

        KbAction::Back => app.close_article(),
        KbAction::ToggleReaderMode => app.toggle_reader_mode(),
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_detail_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(page_size(app));
            app.clamp_detail_scroll();
        }
        KbAction::PageUp => app.scroll_up(page_size(app)),
    }
    Action::Continue
}

/// Half a viewport, at least one line.
fn page_size(app: &App) -> usize {
    (app.detail_visible_lines / 2).max(1)
}

/// Input while the help overlay is visible: scroll or dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadState;
    use crate::config::Config;
    use crate::news::test_article;
    use crate::storage::Database;

    /// App whose gateway points at a closed loopback port, so nothing
    /// spawned here leaves the machine.
    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config {
            gemini_base_url: Some("http://127.0.0.1:9".to_string()),
            ..Config::default()
        };
        App::new(db, &config).await.unwrap()
    }

    async fn press(app: &mut App, code: KeyCode) -> Action {
        let (tx, _rx) = mpsc::channel(8);
        handle_input(app, code, KeyModifiers::NONE, &tx).await
    }

    fn load(app: &mut App, ids: &[&str]) {
        let req = app.select_category(1).unwrap();
        let batch = ids.iter().map(|id| test_article(id)).collect();
        app.apply_fetch_result(req.generation, Ok(batch));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app().await;
        assert!(matches!(press(&mut app, KeyCode::Char('q')).await, Action::Quit));
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('?')).await;
        assert!(app.show_help);

        // 'q' closes help instead of quitting.
        assert!(matches!(press(&mut app, KeyCode::Char('q')).await, Action::Continue));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_digit_jumps_to_saved_without_fetch() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('6')).await;
        assert!(app.current_category().is_saved());
        assert!(app.fetch_handle.is_none());
        assert_eq!(app.load_state, LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_digit_jump_spawns_fetch() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('2')).await;
        assert_eq!(app.current_category().id, "world");
        assert!(app.is_loading());
        assert!(app.fetch_handle.is_some());
    }

    #[tokio::test]
    async fn test_open_and_back() {
        let mut app = test_app().await;
        load(&mut app, &["a1", "a2"]);

        press(&mut app, KeyCode::Char('j')).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.view(), View::Detail);
        assert_eq!(app.selected_article.as_ref().unwrap().id, "a2");

        press(&mut app, KeyCode::Esc).await;
        assert_eq!(app.view(), View::List);
        assert_eq!(app.list_cursor, 1);
    }

    #[tokio::test]
    async fn test_j_scrolls_in_detail() {
        let mut app = test_app().await;
        load(&mut app, &["a1", "a2"]);
        press(&mut app, KeyCode::Enter).await;
        app.detail_content_lines = 50;
        app.detail_visible_lines = 10;

        press(&mut app, KeyCode::Char('j')).await;
        assert_eq!(app.scroll_offset, 1);
        assert_eq!(app.list_cursor, 0);
    }

    #[tokio::test]
    async fn test_scroll_is_clamped() {
        let mut app = test_app().await;
        load(&mut app, &["a1"]);
        press(&mut app, KeyCode::Enter).await;
        app.detail_content_lines = 12;
        app.detail_visible_lines = 10;

        let (tx, _rx) = mpsc::channel(8);
        for _ in 0..5 {
            handle_input(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL, &tx).await;
        }
        assert_eq!(app.scroll_offset, 2);
    }

    #[tokio::test]
    async fn test_reader_mode_key_only_in_detail() {
        let mut app = test_app().await;
        load(&mut app, &["a1"]);
        press(&mut app, KeyCode::Char('r')).await;
        assert!(!app.reader_mode);

        press(&mut app, KeyCode::Enter).await;
        press(&mut app, KeyCode::Char('r')).await;
        assert!(app.reader_mode);
    }

    #[tokio::test]
    async fn test_save_key_in_detail() {
        let mut app = test_app().await;
        load(&mut app, &["a1"]);
        press(&mut app, KeyCode::Enter).await;
        press(&mut app, KeyCode::Char('s')).await;
        assert!(app.is_saved("a1"));
        press(&mut app, KeyCode::Char('s')).await;
        assert!(!app.is_saved("a1"));
    }

    #[tokio::test]
    async fn test_theme_key_sets_status() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('T')).await;
        assert_eq!(app.status_message.as_ref().unwrap().0, "Theme: Light");
    }

    #[tokio::test]
    async fn test_unbound_key_is_ignored() {
        let mut app = test_app().await;
        assert!(matches!(press(&mut app, KeyCode::Char('z')).await, Action::Continue));
        assert_eq!(app.view(), View::List);
    }
}
