use std::collections::HashSet;

use crate::news::Article;

use super::json_store::JsonStore;

/// Storage key of the saved set. Matches the browser build's localStorage key.
pub const SAVED_ARTICLES_KEY: &str = "savedArticles";

/// Insertion-ordered set of saved articles, keyed by `Article::id`.
///
/// Loaded once at startup; every mutation writes the full list back through
/// the [`JsonStore`]. A failed write leaves the in-memory set as mutated.
pub struct SavedArticles {
    store: JsonStore,
    articles: Vec<Article>,
}

impl SavedArticles {
    /// Load the persisted set. Absent or corrupt data yields an empty set.
    ///
    /// Duplicate ids in a hand-edited value are collapsed to their first
    /// occurrence.
    pub async fn load(store: JsonStore) -> Self {
        let stored: Vec<Article> = store.load(SAVED_ARTICLES_KEY, Vec::new()).await;
        let before = stored.len();

        let mut seen = HashSet::new();
        let articles: Vec<Article> = stored
            .into_iter()
            .filter(|a| seen.insert(a.id.clone()))
            .collect();

        if articles.len() != before {
            tracing::warn!(
                dropped = before - articles.len(),
                "Saved set contained duplicate ids"
            );
        }
        tracing::debug!(count = articles.len(), "Loaded saved articles");

        Self { store, articles }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.articles.iter().any(|a| a.id == id)
    }

    /// Append `article` if its id is absent. Returns whether it was added.
    pub async fn add(&mut self, article: &Article) -> bool {
        if self.contains(&article.id) {
            return false;
        }
        self.articles.push(article.clone());
        self.persist().await;
        true
    }

    /// Remove the article with `id` if present. Returns whether it was removed.
    pub async fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.articles.iter().position(|a| a.id == id) else {
            return false;
        };
        self.articles.remove(pos);
        self.persist().await;
        true
    }

    /// Add when absent, remove when present. Returns the new membership.
    pub async fn toggle(&mut self, article: &Article) -> bool {
        if self.remove(&article.id).await {
            false
        } else {
            self.add(article).await
        }
    }

    /// Saved articles in insertion order.
    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    async fn persist(&self) {
        self.store.save(SAVED_ARTICLES_KEY, &self.articles).await;
    }
}
