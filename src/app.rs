use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::news::gemini::FETCH_ERROR_MESSAGE;
use crate::news::{Article, Category, GatewayError, GeminiClient, CATEGORIES};
use crate::storage::{Database, JsonStore, SavedArticles};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::validate_source_url;
use anyhow::Result;
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// KV key holding the persisted theme name.
pub const THEME_KEY: &str = "theme";

/// Seconds a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// State Types
// ============================================================================

/// Lifecycle of the article list for the current category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet (before the first fetch is spawned).
    Idle,
    Loading,
    Loaded,
    /// Last fetch failed. `message` is the user-facing text.
    Errored { message: String },
}

/// Which screen is showing. Derived from `selected_article`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

/// A fetch the UI layer must spawn.
///
/// Returned by the transitions that need the gateway. `generation` must be
/// echoed back in [`AppEvent::ArticlesLoaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub category_id: &'static str,
    pub category_name: &'static str,
}

/// Completion events sent from background tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    ArticlesLoaded {
        generation: u64,
        result: Result<Vec<Article>, GatewayError>,
    },
    /// A background task panicked. `generation` is the fetch generation the
    /// task was spawned for.
    TaskPanicked {
        task: &'static str,
        generation: u64,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub store: JsonStore,
    pub gateway: Arc<GeminiClient>,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub categories: &'static [Category],
    /// Index into `categories`. Always valid.
    pub selected_category: usize,

    /// Last list produced for the current category (fetched or derived
    /// from the saved set).
    pub articles: Arc<Vec<Article>>,
    /// Open article. `Some` means the detail view is showing.
    pub selected_article: Option<Article>,
    pub load_state: LoadState,
    pub saved: SavedArticles,

    /// Cursor into `visible_articles()`.
    pub list_cursor: usize,

    /// Detail view shows only the body and the source link.
    pub reader_mode: bool,
    pub scroll_offset: usize,
    /// Detail viewport height from the last frame (inside borders).
    pub detail_visible_lines: usize,
    /// Wrapped detail line count from the last frame.
    pub detail_content_lines: usize,

    /// Bumped on every fetch and every invalidation. Results carrying an
    /// older value are dropped.
    pub fetch_generation: u64,
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub spinner_frame: usize,
}

impl App {
    /// Build the controller over an opened database.
    ///
    /// Loads the saved set once. The theme is the persisted value, else the
    /// configured one, else dark. Keybinding overrides from the config are
    /// applied here; invalid entries are logged and skipped.
    pub async fn new(db: Database, config: &Config) -> Result<Self> {
        let gateway = Arc::new(GeminiClient::from_config(config)?);
        let store = JsonStore::new(db);
        let saved = SavedArticles::load(store.clone()).await;

        let persisted: Option<String> = store.load(THEME_KEY, None).await;
        let theme_variant = persisted
            .as_deref()
            .and_then(ThemeVariant::from_str_name)
            .or_else(|| ThemeVariant::from_str_name(&config.theme))
            .unwrap_or(ThemeVariant::Dark);

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(%warning, "Ignoring keybinding override");
        }

        Ok(Self {
            store,
            gateway,
            theme_variant,
            theme: StyleMap::for_variant(theme_variant),
            keybindings,
            categories: &CATEGORIES,
            selected_category: 0,
            articles: Arc::new(Vec::new()),
            selected_article: None,
            load_state: LoadState::Idle,
            saved,
            list_cursor: 0,
            reader_mode: false,
            scroll_offset: 0,
            detail_visible_lines: 0,
            detail_content_lines: 0,
            fetch_generation: 0,
            fetch_handle: None,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
        })
    }

    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    pub fn view(&self) -> View {
        if self.selected_article.is_some() {
            View::Detail
        } else {
            View::List
        }
    }

    pub fn current_category(&self) -> &'static Category {
        &self.categories[self.selected_category]
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Errored { message } => Some(message),
            _ => None,
        }
    }

    /// Articles the list view shows. Empty while loading or after an error,
    /// even if an older list is still held.
    pub fn visible_articles(&self) -> &[Article] {
        match self.load_state {
            LoadState::Loaded => &self.articles,
            _ => &[],
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    pub fn cursor_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.list_cursor)
    }

    // ------------------------------------------------------------------------
    // Category transitions
    // ------------------------------------------------------------------------

    /// Initial transition: fetch (or derive) the default category.
    pub fn start(&mut self) -> Option<FetchRequest> {
        self.enter_category(self.selected_category)
    }

    /// Select a category by catalog index.
    ///
    /// Always returns to the list view. The saved pseudo-category is
    /// derived synchronously and invalidates any in-flight fetch.
    /// Re-selecting the current non-saved category keeps its list.
    pub fn select_category(&mut self, index: usize) -> Option<FetchRequest> {
        if index >= self.categories.len() {
            tracing::debug!(index, "Ignoring out-of-range category index");
            return None;
        }
        self.selected_article = None;
        self.scroll_offset = 0;

        let category = &self.categories[index];
        let same = index == self.selected_category;
        if same && !category.is_saved() && self.load_state != LoadState::Idle {
            tracing::debug!(category = category.id, "Category already selected");
            return None;
        }
        self.enter_category(index)
    }

    pub fn next_category(&mut self) -> Option<FetchRequest> {
        let next = (self.selected_category + 1) % self.categories.len();
        self.select_category(next)
    }

    pub fn prev_category(&mut self) -> Option<FetchRequest> {
        let len = self.categories.len();
        let prev = (self.selected_category + len - 1) % len;
        self.select_category(prev)
    }

    /// Refetch the current category. Only offered after a failure.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.error().is_none() {
            return None;
        }
        self.enter_category(self.selected_category)
    }

    fn enter_category(&mut self, index: usize) -> Option<FetchRequest> {
        let categories = self.categories;
        let category = &categories[index];
        self.selected_category = index;
        self.list_cursor = 0;

        if category.is_saved() {
            self.cancel_fetch();
            self.derive_saved_view();
            return None;
        }

        self.cancel_fetch();
        self.load_state = LoadState::Loading;
        self.spinner_frame = 0;
        tracing::debug!(
            category = category.id,
            generation = self.fetch_generation,
            "Fetch requested"
        );
        Some(FetchRequest {
            generation: self.fetch_generation,
            category_id: category.id,
            category_name: category.name,
        })
    }

    /// Abort the running fetch and bump the generation so a result that
    /// still arrives is dropped.
    fn cancel_fetch(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted in-flight fetch");
        }
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
    }

    fn derive_saved_view(&mut self) {
        self.articles = Arc::new(self.saved.all().to_vec());
        self.load_state = LoadState::Loaded;
        self.clamp_cursor();
    }

    /// Apply a finished fetch. Returns false when the result was stale.
    pub fn apply_fetch_result(
        &mut self,
        generation: u64,
        result: Result<Vec<Article>, GatewayError>,
    ) -> bool {
        if generation != self.fetch_generation || !self.is_loading() {
            tracing::debug!(
                generation,
                current = self.fetch_generation,
                "Discarding stale fetch result"
            );
            return false;
        }
        self.fetch_handle = None;

        match result {
            Ok(articles) => {
                tracing::info!(
                    category = self.current_category().id,
                    count = articles.len(),
                    "Articles loaded"
                );
                self.articles = Arc::new(articles);
                self.load_state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(
                    category = self.current_category().id,
                    error = %e,
                    "Fetch failed"
                );
                self.load_state = LoadState::Errored {
                    message: FETCH_ERROR_MESSAGE.to_string(),
                };
            }
        }
        self.clamp_cursor();
        true
    }

    /// A background task died. A dead fetch task would otherwise leave the
    /// list spinning forever. Panics from superseded fetches are only logged.
    pub fn handle_task_panic(&mut self, task: &str, generation: u64, error: &str) {
        tracing::error!(task, generation, error, "Background task panicked");
        if generation != self.fetch_generation {
            tracing::debug!(
                generation,
                current = self.fetch_generation,
                "Ignoring panic from stale task"
            );
            return;
        }
        if task == "fetch_articles" && self.is_loading() {
            self.fetch_handle = None;
            self.load_state = LoadState::Errored {
                message: FETCH_ERROR_MESSAGE.to_string(),
            };
        }
        self.set_status(format!("Internal error in {}", task));
    }

    // ------------------------------------------------------------------------
    // List navigation
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        self.list_cursor = self.list_cursor.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.visible_articles().len();
        if self.list_cursor + 1 < len {
            self.list_cursor += 1;
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_articles().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    // ------------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------------

    /// Open an article. List and category are left alone.
    pub fn open_article(&mut self, article: Article) {
        self.selected_article = Some(article);
        self.reader_mode = false;
        self.scroll_offset = 0;
        self.detail_content_lines = 0;
    }

    /// Open the article under the list cursor. Returns false on an empty list.
    pub fn open_selected(&mut self) -> bool {
        match self.cursor_article().cloned() {
            Some(article) => {
                self.open_article(article);
                true
            }
            None => false,
        }
    }

    pub fn close_article(&mut self) {
        self.selected_article = None;
        self.reader_mode = false;
        self.scroll_offset = 0;
    }

    pub fn toggle_reader_mode(&mut self) {
        if self.selected_article.is_some() {
            self.reader_mode = !self.reader_mode;
            self.scroll_offset = 0;
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Keep the scroll offset inside the content.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Clamp against the sizes recorded by the last detail render.
    pub fn clamp_detail_scroll(&mut self) {
        self.clamp_scroll(self.detail_content_lines, self.detail_visible_lines);
    }

    // ------------------------------------------------------------------------
    // Saved set
    // ------------------------------------------------------------------------

    /// Flip membership of `article` in the saved set. While the saved
    /// category is selected its list is re-derived right away; the open
    /// article (if any) is left showing.
    pub async fn toggle_save(&mut self, article: &Article) -> bool {
        let now_saved = self.saved.toggle(article).await;
        if self.current_category().is_saved() {
            self.derive_saved_view();
        }
        now_saved
    }

    /// Toggle the open article, or the one under the list cursor.
    pub async fn toggle_save_current(&mut self) -> Option<bool> {
        let article = self
            .selected_article
            .clone()
            .or_else(|| self.cursor_article().cloned())?;
        let now_saved = self.toggle_save(&article).await;
        self.set_status(if now_saved { "Saved" } else { "Removed from saved" });
        Some(now_saved)
    }

    // ------------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------------

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::for_variant(variant);
        self.needs_redraw = true;
    }

    /// Switch between dark and light and persist the choice.
    pub async fn toggle_theme(&mut self) -> ThemeVariant {
        let next = self.theme_variant.toggled();
        self.set_theme(next);
        self.store.save(THEME_KEY, next.as_str()).await;
        next
    }

    // ------------------------------------------------------------------------
    // Source link
    // ------------------------------------------------------------------------

    /// Open the source of the open (or highlighted) article in the browser.
    pub fn open_source(&mut self) {
        let Some(uri) = self
            .selected_article
            .as_ref()
            .or_else(|| self.cursor_article())
            .map(|a| a.source_uri.clone())
        else {
            return;
        };

        match validate_source_url(&uri) {
            Ok(url) => {
                if let Err(e) = open::that(url.as_str()) {
                    tracing::warn!(error = %e, "Failed to open browser");
                    self.set_status("Could not open browser");
                } else {
                    self.set_status("Opened in browser");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, uri = %uri, "Refusing to open source link");
                self.set_status(format!("Cannot open link: {}", e));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Drop the status message once it is old enough.
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted fetch task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::{test_article, SAVED_CATEGORY_ID};
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Duration};

    const SAVED_INDEX: usize = 5;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        App::new(db, &Config::default()).await.unwrap()
    }

    fn batch(ids: &[&str]) -> Vec<Article> {
        ids.iter().map(|id| test_article(id)).collect()
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_initial_state() {
        let app = test_app().await;
        assert_eq!(app.current_category().id, "foryou");
        assert_eq!(app.load_state, LoadState::Idle);
        assert_eq!(app.view(), View::List);
        assert_eq!(app.theme_variant, ThemeVariant::Dark);
        assert!(app.saved.is_empty());
    }

    #[tokio::test]
    async fn test_start_requests_default_category() {
        let mut app = test_app().await;
        let req = app.start().unwrap();
        assert_eq!(req.category_name, "For You");
        assert_eq!(req.generation, app.fetch_generation);
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_success_loads_articles() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        assert_eq!(req.category_name, "World");
        assert!(app.visible_articles().is_empty());

        assert!(app.apply_fetch_result(req.generation, Ok(batch(&["a1", "a2"]))));
        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(ids(app.visible_articles()), vec!["a1", "a2"]);
        assert!(app.error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_fixed_message() {
        let mut app = test_app().await;
        let req = app.select_category(2).unwrap();
        assert!(app.apply_fetch_result(req.generation, Err(GatewayError::HttpStatus(503))));
        assert_eq!(app.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(!app.is_loading());
        assert!(app.visible_articles().is_empty());
    }

    #[tokio::test]
    async fn test_error_hides_previous_list() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1"])));
        let req = app.select_category(2).unwrap();
        app.apply_fetch_result(req.generation, Err(GatewayError::EmptyResponse));
        assert_eq!(app.articles.len(), 1);
        assert!(app.visible_articles().is_empty());
    }

    #[tokio::test]
    async fn test_stale_result_discarded() {
        let mut app = test_app().await;
        let first = app.select_category(1).unwrap();
        let second = app.select_category(2).unwrap();
        assert_ne!(first.generation, second.generation);

        assert!(!app.apply_fetch_result(first.generation, Ok(batch(&["old"]))));
        assert!(app.is_loading());

        assert!(app.apply_fetch_result(second.generation, Ok(batch(&["new"]))));
        assert_eq!(ids(app.visible_articles()), vec!["new"]);
    }

    #[tokio::test]
    async fn test_late_failure_after_switch_is_ignored() {
        let mut app = test_app().await;
        let first = app.select_category(1).unwrap();
        let second = app.select_category(3).unwrap();
        app.apply_fetch_result(second.generation, Ok(batch(&["t1"])));

        assert!(!app.apply_fetch_result(first.generation, Err(GatewayError::Timeout)));
        assert!(app.error().is_none());
        assert_eq!(ids(app.visible_articles()), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_ignored() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        assert!(app.apply_fetch_result(req.generation, Ok(batch(&["a1"]))));
        assert!(!app.apply_fetch_result(req.generation, Ok(batch(&["b1"]))));
        assert_eq!(ids(app.visible_articles()), vec!["a1"]);
    }

    #[tokio::test]
    async fn test_saved_view_makes_no_request() {
        let mut app = test_app().await;
        app.saved.add(&test_article("s1")).await;
        app.saved.add(&test_article("s2")).await;

        assert!(app.select_category(SAVED_INDEX).is_none());
        assert_eq!(app.current_category().id, SAVED_CATEGORY_ID);
        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(ids(app.visible_articles()), vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn test_switching_to_saved_invalidates_fetch() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.select_category(SAVED_INDEX);

        assert!(!app.apply_fetch_result(req.generation, Ok(batch(&["late"]))));
        assert!(app.visible_articles().is_empty());
        assert!(app.error().is_none());
    }

    #[tokio::test]
    async fn test_reselect_same_category_keeps_list() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1"])));
        app.open_selected();
        assert_eq!(app.view(), View::Detail);

        assert!(app.select_category(1).is_none());
        assert_eq!(app.view(), View::List);
        assert_eq!(ids(app.visible_articles()), vec!["a1"]);
    }

    #[tokio::test]
    async fn test_reselect_while_loading_keeps_request() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        assert!(app.select_category(1).is_none());
        assert!(app.apply_fetch_result(req.generation, Ok(batch(&["a1"]))));
    }

    #[tokio::test]
    async fn test_select_out_of_range_ignored() {
        let mut app = test_app().await;
        assert!(app.select_category(42).is_none());
        assert_eq!(app.selected_category, 0);
    }

    #[tokio::test]
    async fn test_retry_only_after_error() {
        let mut app = test_app().await;
        assert!(app.retry().is_none());

        let req = app.select_category(1).unwrap();
        assert!(app.retry().is_none());
        app.apply_fetch_result(req.generation, Err(GatewayError::MissingApiKey));

        let again = app.retry().unwrap();
        assert_eq!(again.category_name, "World");
        assert!(again.generation > req.generation);
        assert!(app.is_loading());
        assert!(app.error().is_none());
    }

    #[tokio::test]
    async fn test_category_cycling_wraps() {
        let mut app = test_app().await;
        assert!(app.prev_category().is_none());
        assert_eq!(app.current_category().id, SAVED_CATEGORY_ID);

        let req = app.next_category().unwrap();
        assert_eq!(req.category_id, "foryou");
    }

    #[tokio::test]
    async fn test_view_follows_selected_article() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1", "a2"])));

        app.nav_down();
        assert!(app.open_selected());
        assert_eq!(app.view(), View::Detail);
        assert_eq!(app.selected_article.as_ref().unwrap().id, "a2");

        app.close_article();
        assert_eq!(app.view(), View::List);
        assert_eq!(app.current_category().id, "world");
        assert_eq!(ids(app.visible_articles()), vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_open_selected_on_empty_list() {
        let mut app = test_app().await;
        assert!(!app.open_selected());
        assert_eq!(app.view(), View::List);
    }

    #[tokio::test]
    async fn test_open_resets_reader_mode_and_scroll() {
        let mut app = test_app().await;
        app.open_article(test_article("a1"));
        app.toggle_reader_mode();
        app.scroll_down(10);
        assert!(app.reader_mode);

        app.open_article(test_article("a2"));
        assert!(!app.reader_mode);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_reader_mode_needs_article() {
        let mut app = test_app().await;
        app.toggle_reader_mode();
        assert!(!app.reader_mode);
    }

    #[tokio::test]
    async fn test_nav_clamps_to_list() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1", "a2"])));
        app.nav_up();
        assert_eq!(app.list_cursor, 0);
        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.list_cursor, 1);
    }

    #[tokio::test]
    async fn test_clamp_scroll() {
        let mut app = test_app().await;
        app.scroll_down(100);
        app.clamp_scroll(30, 20);
        assert_eq!(app.scroll_offset, 10);

        app.clamp_scroll(5, 20);
        assert_eq!(app.scroll_offset, 0);

        app.scroll_down(usize::MAX);
        app.clamp_scroll(usize::MAX, 0);
        assert_eq!(app.scroll_offset, MAX_SCROLL);
    }

    #[tokio::test]
    async fn test_toggle_save_outside_saved_view() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1", "a2"])));

        let a2 = app.visible_articles()[1].clone();
        assert!(app.toggle_save(&a2).await);
        assert!(app.is_saved("a2"));
        assert_eq!(ids(app.visible_articles()), vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_toggle_save_rederives_saved_view() {
        let mut app = test_app().await;
        app.saved.add(&test_article("s1")).await;
        app.saved.add(&test_article("s2")).await;
        app.select_category(SAVED_INDEX);
        app.nav_down();
        assert_eq!(app.list_cursor, 1);

        app.open_selected();
        let s2 = app.selected_article.clone().unwrap();
        assert!(!app.toggle_save(&s2).await);

        assert_eq!(ids(app.visible_articles()), vec!["s1"]);
        assert_eq!(app.list_cursor, 0);
        // The open article is not re-validated.
        assert_eq!(app.view(), View::Detail);
    }

    #[tokio::test]
    async fn test_toggle_save_current_uses_cursor_in_list() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.apply_fetch_result(req.generation, Ok(batch(&["a1"])));

        assert_eq!(app.toggle_save_current().await, Some(true));
        assert!(app.is_saved("a1"));
        assert_eq!(app.status_message.as_ref().unwrap().0, "Saved");
    }

    #[tokio::test]
    async fn test_toggle_save_current_without_target() {
        let mut app = test_app().await;
        assert_eq!(app.toggle_save_current().await, None);
    }

    #[tokio::test]
    async fn test_task_panic_clears_loading() {
        let mut app = test_app().await;
        let req = app.select_category(1).unwrap();
        app.handle_task_panic("fetch_articles", req.generation, "boom");
        assert_eq!(app.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_stale_task_panic_leaves_state_alone() {
        let mut app = test_app().await;
        let world = app.select_category(1).unwrap();
        app.select_category(2).unwrap();
        app.handle_task_panic("fetch_articles", world.generation, "boom");
        assert!(app.is_loading());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_toggle_theme_persists() {
        let mut app = test_app().await;
        let dark_selected = app.style("card_selected");

        assert_eq!(app.toggle_theme().await, ThemeVariant::Light);
        assert_ne!(app.style("card_selected"), dark_selected);

        let stored: Option<String> = app.store.load(THEME_KEY, None).await;
        assert_eq!(stored.as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_persisted_theme_wins_over_config() {
        let db = Database::open(":memory:").await.unwrap();
        JsonStore::new(db.clone()).save(THEME_KEY, "light").await;

        let config = Config {
            theme: "dark".to_string(),
            ..Config::default()
        };
        let app = App::new(db, &config).await.unwrap();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_config_theme_used_without_persisted_value() {
        let db = Database::open(":memory:").await.unwrap();
        let config = Config {
            theme: "light".to_string(),
            ..Config::default()
        };
        let app = App::new(db, &config).await.unwrap();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_saved_set_loaded_at_startup() {
        let db = Database::open(":memory:").await.unwrap();
        {
            let mut saved = SavedArticles::load(JsonStore::new(db.clone())).await;
            saved.add(&test_article("kept")).await;
        }
        let app = App::new(db, &Config::default()).await.unwrap();
        assert!(app.is_saved("kept"));
    }

    #[tokio::test]
    async fn test_config_keybinding_overrides_applied() {
        use crate::keybindings::{Action as KbAction, Context as KbContext};
        use crossterm::event::{KeyCode, KeyModifiers};
        use std::collections::HashMap;

        let db = Database::open(":memory:").await.unwrap();
        let mut overrides = HashMap::new();
        overrides.insert("toggle_save".to_string(), "S".to_string());
        let config = Config {
            keybindings: overrides,
            ..Config::default()
        };
        let app = App::new(db, &config).await.unwrap();

        assert_eq!(
            app.keybindings
                .action_for_key(KeyCode::Char('S'), KeyModifiers::NONE, KbContext::List),
            Some(KbAction::ToggleSave)
        );
    }

    #[tokio::test]
    async fn test_open_source_rejects_private_link() {
        let mut app = test_app().await;
        let mut article = test_article("a1");
        article.source_uri = "http://127.0.0.1/admin".to_string();
        app.open_article(article);

        app.open_source();
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.starts_with("Cannot open link"), "{}", msg);
    }

    // Status message expiry tests
    #[tokio::test]
    async fn test_status_message_persists_before_expiry() {
        let mut app = test_app().await;
        time::pause();

        app.set_status("Test message");
        time::advance(Duration::from_secs(2)).await;

        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_status_message_clears_after_expiry() {
        let mut app = test_app().await;
        time::pause();

        app.set_status("Test message");
        time::advance(Duration::from_secs(3)).await;

        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_clear_expired_status_without_message() {
        let mut app = test_app().await;
        assert!(!app.clear_expired_status());
    }
}
