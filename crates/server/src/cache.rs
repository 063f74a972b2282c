//! Rendered-page cache keyed by request path.
//!
//! GET handlers store their rendered body here; the engine drops an entry
//! through [`Revalidate`] whenever a write makes it stale.
//!
//! Every path carries a generation bumped on each revalidation. A handler
//! reads the generation before querying the datastore and hands it back to
//! [`PageCache::put`], which ignores bodies rendered before the latest
//! revalidation.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use engine::Revalidate;

#[derive(Debug, Default)]
struct Page {
    generation: u64,
    body: Option<String>,
}

#[derive(Debug, Default)]
pub struct PageCache {
    pages: RwLock<HashMap<String, Page>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .and_then(|page| page.body.clone())
    }

    /// Current generation of `path`, to be passed to [`PageCache::put`].
    pub fn generation(&self, path: &str) -> u64 {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map_or(0, |page| page.generation)
    }

    /// Stores `body` unless `path` was revalidated since `generation` was read.
    ///
    /// Returns whether the body was stored.
    pub fn put(&self, path: &str, generation: u64, body: String) -> bool {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        let page = pages.entry(path.to_string()).or_default();
        if page.generation != generation {
            tracing::debug!(path, generation, current = page.generation, "stale page not cached");
            return false;
        }
        page.body = Some(body);
        true
    }
}

impl Revalidate for PageCache {
    fn revalidate_path(&self, path: &str) {
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        let page = pages.entry(path.to_string()).or_default();
        let dropped = page.body.take().is_some();
        page.generation += 1;
        tracing::debug!(path, dropped, generation = page.generation, "revalidated path");
    }
}
