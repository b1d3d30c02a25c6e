use std::collections::HashSet;
use std::sync::Mutex;

use crate::feed::{FetchError, PostSource};
use crate::wordpress::types::Post;

/// Observable feed state. The presentation layer gets cheap snapshot clones;
/// all mutation happens inside the loader.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Posts in page arrival order, then in-page order. No duplicate ids.
    pub items: Vec<Post>,
    /// Last successfully loaded page; 0 means no pages loaded yet.
    pub current_page: u32,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub has_more_pages: bool,
    pub load_failed: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            is_loading_initial: false,
            is_loading_more: false,
            has_more_pages: true,
            load_failed: false,
        }
    }
}

impl FeedState {
    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more
    }
}

struct Inner {
    state: FeedState,
    has_loaded_initial: bool,
    last_error: Option<String>,
}

/// Paginated feed state machine over a `PostSource`.
///
/// Guard flags are checked and set in one critical section before the fetch
/// await, so overlapping calls from concurrent tasks collapse into a single
/// in-flight request per loader. Fetch faults become state flags and never
/// propagate; a failed page never discards already-loaded items.
pub struct FeedLoader<S> {
    source: S,
    inner: Mutex<Inner>,
}

impl<S: PostSource> FeedLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                state: FeedState::default(),
                has_loaded_initial: false,
                last_error: None,
            }),
        }
    }

    pub fn state(&self) -> FeedState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Message of the most recent fault, for diagnostics surfaces.
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().unwrap().last_error.clone()
    }

    /// Load or refresh page 1. No-op while any fetch is in flight. A failed
    /// refresh keeps whatever was already on screen.
    pub async fn fetch_initial(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_loading() {
                return;
            }
            inner.state.is_loading_initial = true;
            inner.state.load_failed = false;
            inner.last_error = None;
        }

        let result = self.source.fetch_page(1).await;

        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(page) => {
                inner.state.items.clear();
                append_deduped(&mut inner.state.items, page.posts);
                inner.state.current_page = 1;
                inner.state.has_more_pages = page.has_more;
                inner.has_loaded_initial = true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "initial post fetch failed");
                inner.state.load_failed = true;
                inner.last_error = Some(err.to_string());
            }
        }
        inner.state.is_loading_initial = false;
    }

    /// Fetch the page after `current_page` and append it. No-op when
    /// exhausted, already loading, or sitting in the failed state.
    pub async fn load_more(&self) {
        let next_page = {
            let mut inner = self.inner.lock().unwrap();
            let state = &mut inner.state;
            if !state.has_more_pages || state.is_loading() || state.load_failed {
                return;
            }
            state.is_loading_more = true;
            state.current_page + 1
        };

        let result = self.source.fetch_page(next_page).await;

        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(page) if page.posts.is_empty() => {
                // An empty page means exhaustion even when the source's
                // has_more flag disagrees.
                inner.state.has_more_pages = false;
            }
            Ok(page) => {
                append_deduped(&mut inner.state.items, page.posts);
                inner.state.current_page = next_page;
                inner.state.has_more_pages = page.has_more;
            }
            Err(FetchError::NoMorePages) => {
                tracing::debug!(page = next_page, "feed exhausted");
                inner.state.has_more_pages = false;
                inner.state.load_failed = false;
                inner.last_error = None;
            }
            Err(err) => {
                tracing::warn!(page = next_page, error = %err, "post page fetch failed");
                inner.state.load_failed = true;
                inner.last_error = Some(err.to_string());
            }
        }
        inner.state.is_loading_more = false;
    }

    /// Clear the failed flag and re-attempt: a fresh initial load when
    /// nothing is on screen, otherwise the next page.
    pub async fn retry(&self) {
        let items_empty = {
            let mut inner = self.inner.lock().unwrap();
            inner.state.load_failed = false;
            inner.last_error = None;
            inner.state.items.is_empty()
        };
        if items_empty {
            self.fetch_initial().await;
        } else {
            self.load_more().await;
        }
    }

    /// First-load convenience: fetch page 1 only if no initial load ever
    /// succeeded and nothing is on screen.
    pub async fn ensure_initial(&self) {
        {
            let inner = self.inner.lock().unwrap();
            if inner.has_loaded_initial || !inner.state.items.is_empty() {
                return;
            }
        }
        self.fetch_initial().await;
    }
}

/// Append `incoming` to `items`, skipping any id already present (including
/// duplicates within `incoming` itself).
fn append_deduped(items: &mut Vec<Post>, incoming: Vec<Post>) {
    let mut seen: HashSet<i64> = items.iter().map(|p| p.id).collect();
    for post in incoming {
        if seen.insert(post.id) {
            items.push(post);
        }
    }
}
