//! Cache refresh
//!
//! Pull-to-refresh support: forget entries and delete their files so the
//! next render fetches them again. Nothing here downloads.

use crate::cache::key::derive_key;
use crate::cache::resolver::{CacheResolver, Slot};
use crate::error::PlateResult;
use tracing::{debug, info, warn};

impl CacheResolver {
    /// Discard the entry for `url` and its file
    ///
    /// An attempt still in flight for `url` runs to completion, but its
    /// callers get the fallback and its file is deleted. The next resolve
    /// waits for it before starting a fresh download.
    pub async fn invalidate(&self, url: &str) {
        let url = self.source_url(url);
        let key = match derive_key(&url) {
            Ok(key) => key,
            Err(e) => {
                debug!("Nothing to invalidate: {}", e);
                return;
            }
        };

        {
            let mut registry = self.inner.registry.lock();
            if let Some(tombstone) = registry.slots.remove(&key).and_then(Slot::invalidate) {
                debug!(url = %url, "Invalidated while in flight");
                registry.slots.insert(key.clone(), tombstone);
            }
        }

        if let Err(e) = self.inner.store.remove(&key).await {
            warn!(url = %url, error = %e, "Failed to remove cached file");
        }

        debug!(url = %url, key = %key, "Invalidated");
    }

    /// Invalidate every URL in `urls`
    pub async fn invalidate_all<I, S>(&self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            self.invalidate(url.as_ref()).await;
        }
    }

    /// Forget every entry and delete every cached file
    ///
    /// Returns the number of files removed.
    pub async fn clear(&self) -> PlateResult<u32> {
        {
            let mut registry = self.inner.registry.lock();
            let slots = std::mem::take(&mut registry.slots);
            registry.slots = slots
                .into_iter()
                .filter_map(|(key, slot)| slot.invalidate().map(|slot| (key, slot)))
                .collect();
        }
        let removed = self.inner.store.clear().await?;
        info!("Cleared {} cached image(s)", removed);
        Ok(removed)
    }
}
