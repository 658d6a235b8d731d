//! Rendering of the current selection.
//!
//! The view never mutates the quote list. It remembers what it showed: the
//! indices of the displayed records go to the session store, the chosen
//! category filter to the persistent store, so a later `restore` can bring
//! the same selection back.

use log::warn;
use quote_common::quote::ALL_CATEGORIES;
use quote_common::storage::{KeyValueStore, StorageKey};
use quote_common::{Quote, QuoteStore};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Placeholder shown when there is nothing to display.
pub const NO_DATA: &str = "No quotes to show.";

/// What ended up on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// One quote.
    Single(Quote),
    /// Every quote of a category.
    Many(Vec<Quote>),
    /// The fixed placeholder.
    NoData,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Single(quote) => write!(f, "{}", quote),
            View::Many(quotes) => {
                let lines: Vec<String> = quotes.iter().map(Quote::to_string).collect();
                write!(f, "{}", lines.join("\n"))
            }
            View::NoData => write!(f, "{}", NO_DATA),
        }
    }
}

/// Selects and records what the user sees.
pub struct ViewController {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl ViewController {
    /// Create a view over the two storage scopes.
    pub fn new(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            session,
        }
    }

    /// One quote picked uniformly at random, or the placeholder.
    pub fn render_random(&self, store: &QuoteStore) -> View {
        self.render_random_with(store, &mut rand::rng())
    }

    /// Same as [`ViewController::render_random`] with a caller-supplied RNG.
    pub fn render_random_with<R: Rng + ?Sized>(&self, store: &QuoteStore, rng: &mut R) -> View {
        if store.is_empty() {
            self.forget();
            return View::NoData;
        }
        let index = rng.random_range(0..store.len());
        self.remember(&[index]);
        View::Single(store.all()[index].clone())
    }

    /// Every quote of `category`; `"all"` falls back to a random quote.
    ///
    /// The category is saved as the user's filter choice.
    pub fn render_filtered(&self, store: &QuoteStore, category: &str) -> View {
        if let Err(e) = self.persistent.set(StorageKey::SelectedCategory, category) {
            warn!("Cannot save selected category: {}", e);
        }
        if category == ALL_CATEGORIES {
            return self.render_random(store);
        }

        let indices: Vec<usize> = store
            .all()
            .iter()
            .enumerate()
            .filter(|(_, q)| q.category == category)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            self.forget();
            return View::NoData;
        }
        self.remember(&indices);
        Self::view_of(store, &indices)
    }

    /// Bring back the last selection of this session.
    ///
    /// Falls back to the saved category filter, then to a random quote.
    pub fn restore(&self, store: &QuoteStore) -> View {
        if let Some(indices) = self.last_viewed() {
            if !indices.is_empty() && indices.iter().all(|&i| i < store.len()) {
                return Self::view_of(store, &indices);
            }
        }
        match self.selected_category() {
            Some(category) => self.render_filtered(store, &category),
            None => self.render_random(store),
        }
    }

    /// Options for the category selector: the "all" sentinel, then each
    /// distinct category.
    pub fn selector(&self, store: &QuoteStore) -> Vec<String> {
        std::iter::once(ALL_CATEGORIES)
            .chain(store.categories())
            .map(str::to_string)
            .collect()
    }

    /// Category filter saved by an earlier session, if any.
    pub fn selected_category(&self) -> Option<String> {
        self.persistent
            .get(StorageKey::SelectedCategory)
            .unwrap_or_else(|e| {
                warn!("Cannot read selected category: {}", e);
                None
            })
    }

    fn last_viewed(&self) -> Option<Vec<usize>> {
        let raw = self.session.get(StorageKey::LastViewedQuote).ok()??;
        serde_json::from_str(&raw).ok()
    }

    fn remember(&self, indices: &[usize]) {
        let result = serde_json::to_string(indices)
            .map_err(Into::into)
            .and_then(|raw| self.session.set(StorageKey::LastViewedQuote, &raw));
        if let Err(e) = result {
            warn!("Cannot record displayed quote: {}", e);
        }
    }

    fn forget(&self) {
        if let Err(e) = self.session.remove(StorageKey::LastViewedQuote) {
            warn!("Cannot clear displayed quote: {}", e);
        }
    }

    fn view_of(store: &QuoteStore, indices: &[usize]) -> View {
        let quotes = store.all();
        match indices {
            [single] => View::Single(quotes[*single].clone()),
            _ => View::Many(indices.iter().map(|&i| quotes[i].clone()).collect()),
        }
    }
}
