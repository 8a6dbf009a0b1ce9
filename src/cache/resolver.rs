//! Cache resolution
//!
//! Answers "what should be rendered for this URL right now": a cached file,
//! a fresh download, or a fallback. Resolution never fails; every error path
//! ends in a fallback result.
//!
//! One registry per resolver, shared by every clone. Each key holds either a
//! ready entry or a single in-flight attempt that concurrent callers join.
//! An attempt invalidated mid-flight stays behind as a tombstone until it
//! settles, so a key never has two downloads running.

use crate::cache::entry::{CacheEntry, EntryState, Resolution};
use crate::cache::key::{derive_key, CacheKey};
use crate::cache::optimize::optimize_uri;
use crate::cache::probe::Prober;
use crate::cache::store::{LocalStore, StoreLayout};
use crate::config::{download_timeout, probe_timeout, Config, ConfigManager};
use crate::remote::RemoteSource;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared handle on an in-flight resolution
pub(super) type Flight = Shared<BoxFuture<'static, Resolution>>;

pub(super) enum Slot {
    InFlight {
        generation: u64,
        phase: EntryState,
        source_url: String,
        flight: Flight,
    },
    Ready(CacheEntry),
    /// Invalidated attempt still running; its result is discarded
    Stale { generation: u64, flight: Flight },
}

impl Slot {
    /// Turn a running attempt into a tombstone; other slots are dropped
    pub(super) fn invalidate(self) -> Option<Slot> {
        match self {
            Slot::InFlight {
                generation, flight, ..
            } => Some(Slot::Stale { generation, flight }),
            Slot::Stale { .. } => Some(self),
            Slot::Ready(_) => None,
        }
    }
}

#[derive(Default)]
pub(super) struct Registry {
    pub(super) slots: HashMap<CacheKey, Slot>,
    next_generation: u64,
}

pub(super) struct Inner {
    pub(super) store: LocalStore,
    prober: Prober,
    options: ResolverOptions,
    pub(super) registry: Mutex<Registry>,
}

/// How the resolver falls back and rewrites URLs
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Returned instead of the original URL when an image is unavailable
    pub placeholder: Option<String>,
    /// Rewrite known CDN URLs before keying and fetching
    pub optimize_urls: bool,
}

/// Process-wide image cache front end
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct CacheResolver {
    pub(super) inner: Arc<Inner>,
}

enum Lookup {
    Hit(CacheEntry),
    Join(Flight),
    Wait { generation: u64, flight: Flight },
}

impl CacheResolver {
    /// Create a resolver from its parts
    pub fn new(store: LocalStore, prober: Prober, options: ResolverOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                prober,
                options,
                registry: Mutex::new(Registry::default()),
            }),
        }
    }

    /// Create a resolver wired up from configuration
    pub fn from_config(config: &Config, source: Arc<dyn RemoteSource>) -> Self {
        let layout = StoreLayout {
            dir: ConfigManager::cache_dir(config),
            prefix: config.cache.file_prefix.clone(),
            extension: config.cache.extension.clone(),
            max_file_bytes: config.cache.max_file_bytes,
        };
        let store = LocalStore::new(layout, Arc::clone(&source), download_timeout(config));

        let prober = if config.http.probe {
            Prober::new(source, probe_timeout(config))
        } else {
            Prober::disabled(source)
        };

        Self::new(
            store,
            prober,
            ResolverOptions {
                placeholder: config.cache.placeholder.clone(),
                optimize_urls: config.cache.optimize_urls,
            },
        )
    }

    /// The underlying store
    pub fn store(&self) -> &LocalStore {
        &self.inner.store
    }

    /// Resolve `url` to something renderable
    pub async fn resolve(&self, url: &str) -> Resolution {
        let url = self.source_url(url);
        let key = match derive_key(&url) {
            Ok(key) => key,
            Err(e) => {
                debug!("Not resolving: {}", e);
                return self.inner.fallback(&url);
            }
        };

        loop {
            let lookup = {
                let mut registry = self.inner.registry.lock();
                let existing = match registry.slots.get(&key) {
                    Some(Slot::Ready(entry)) => Some(Lookup::Hit(entry.clone())),
                    Some(Slot::InFlight { flight, .. }) => Some(Lookup::Join(flight.clone())),
                    Some(Slot::Stale { generation, flight }) => Some(Lookup::Wait {
                        generation: *generation,
                        flight: flight.clone(),
                    }),
                    None => None,
                };
                existing.unwrap_or_else(|| {
                    Lookup::Join(Inner::start_flight(
                        &self.inner,
                        &mut registry,
                        key.clone(),
                        url.clone(),
                    ))
                })
            };

            let entry = match lookup {
                Lookup::Join(flight) => return flight.await,
                Lookup::Wait { generation, flight } => {
                    debug!(url = %url, key = %key, "Waiting for invalidated attempt to settle");
                    flight.await;
                    self.inner.settle(&key, generation);
                    continue;
                }
                Lookup::Hit(entry) => entry,
            };

            if self.inner.store.has(&key).await {
                if let Some(resolution) = entry.resolution() {
                    debug!(url = %url, key = %key, "Cache hit");
                    return resolution;
                }
            }

            warn!(url = %url, key = %key, "Cached file disappeared, fetching again");
            self.inner.evict_ready(&key);
        }
    }

    /// Resolve a batch of URLs concurrently, skipping blank ones
    pub async fn prefetch<I, S>(&self, urls: I) -> Vec<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tasks: Vec<_> = urls
            .into_iter()
            .map(|url| url.as_ref().to_string())
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let resolver = self.clone();
                async move { resolver.resolve(&url).await }
            })
            .collect();

        futures_util::future::join_all(tasks).await
    }

    /// Current lifecycle state of `url`
    pub fn state(&self, url: &str) -> EntryState {
        self.entry(url)
            .map(|entry| entry.state)
            .unwrap_or(EntryState::Unresolved)
    }

    /// Snapshot of the registry entry for `url`
    pub fn entry(&self, url: &str) -> Option<CacheEntry> {
        let url = self.source_url(url);
        let key = derive_key(&url).ok()?;
        let registry = self.inner.registry.lock();

        match registry.slots.get(&key)? {
            Slot::Ready(entry) => Some(entry.clone()),
            Slot::InFlight {
                phase, source_url, ..
            } => {
                let mut entry = CacheEntry::new(source_url.clone(), key.clone());
                entry.state = *phase;
                Some(entry)
            }
            Slot::Stale { .. } => None,
        }
    }

    /// Number of keys the registry knows about
    pub fn len(&self) -> usize {
        self.inner
            .registry
            .lock()
            .slots
            .values()
            .filter(|slot| !matches!(slot, Slot::Stale { .. }))
            .count()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn source_url(&self, url: &str) -> String {
        if self.inner.options.optimize_urls {
            optimize_uri(url)
        } else {
            url.to_string()
        }
    }
}

/// Outcome of committing a finished download
enum Commit {
    /// Registry updated
    Committed,
    /// Another attempt owns the key; its file is left alone
    Superseded,
    /// The key was invalidated while downloading; the file is ours to delete
    Orphaned,
}

impl Inner {
    fn start_flight(
        inner: &Arc<Self>,
        registry: &mut Registry,
        key: CacheKey,
        url: String,
    ) -> Flight {
        registry.next_generation += 1;
        let generation = registry.next_generation;

        // Spawned so the attempt finishes even if every caller goes away.
        let task = {
            let inner = Arc::clone(inner);
            let key = key.clone();
            let url = url.clone();
            tokio::spawn(async move { inner.run(key, url, generation).await })
        };

        let fallback = inner.fallback(&url);
        let flight = async move {
            task.await.unwrap_or_else(|e| {
                warn!("Resolve task failed: {}", e);
                fallback
            })
        }
        .boxed()
        .shared();

        registry.slots.insert(
            key,
            Slot::InFlight {
                generation,
                phase: EntryState::Unresolved,
                source_url: url,
                flight: flight.clone(),
            },
        );

        flight
    }

    async fn run(&self, key: CacheKey, url: String, generation: u64) -> Resolution {
        if let Err(e) = self.store.ensure_directory().await {
            warn!(url = %url, error = %e, "Cache unavailable, serving remote URL");
            self.abandon(&key, generation);
            return Resolution::fallback(url);
        }

        if self.store.has(&key).await {
            debug!(url = %url, key = %key, "Found on disk");
            let path = self.store.path_for(&key);
            return self.complete(key, url, path, generation).await;
        }

        self.set_phase(&key, generation, EntryState::Probing);
        if !self.prober.probe(&url).await {
            debug!(url = %url, "Image unavailable, using fallback");
            self.abandon(&key, generation);
            return self.fallback(&url);
        }

        self.set_phase(&key, generation, EntryState::Downloading);
        match self.store.write(&key, &url).await {
            Ok(path) => {
                info!(url = %url, path = %path.display(), "Cached image");
                self.complete(key, url, path, generation).await
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Download failed, using fallback");
                self.abandon(&key, generation);
                self.fallback(&url)
            }
        }
    }

    async fn complete(
        &self,
        key: CacheKey,
        url: String,
        path: PathBuf,
        generation: u64,
    ) -> Resolution {
        let mut entry = CacheEntry::new(url.clone(), key.clone());
        entry.mark_ready(path.clone());

        match self.commit(&key, generation, entry) {
            Commit::Committed => Resolution::cached(&path),
            Commit::Superseded => {
                debug!(url = %url, "Superseded while in flight, discarding");
                self.fallback(&url)
            }
            Commit::Orphaned => {
                debug!(url = %url, "Invalidated while in flight, discarding");
                // The file goes before the tombstone, so the next attempt
                // cannot pick it up as a disk hit.
                if let Err(e) = self.store.remove(&key).await {
                    warn!(url = %url, error = %e, "Failed to discard stale download");
                }
                self.settle(&key, generation);
                self.fallback(&url)
            }
        }
    }

    fn commit(&self, key: &CacheKey, generation: u64, entry: CacheEntry) -> Commit {
        let mut registry = self.registry.lock();
        match registry.slots.get(key) {
            Some(Slot::InFlight { generation: g, .. }) if *g == generation => {
                registry.slots.insert(key.clone(), Slot::Ready(entry));
                Commit::Committed
            }
            Some(Slot::Stale { generation: g, .. }) if *g == generation => Commit::Orphaned,
            Some(_) => Commit::Superseded,
            None => Commit::Orphaned,
        }
    }

    fn set_phase(&self, key: &CacheKey, generation: u64, state: EntryState) {
        let mut registry = self.registry.lock();
        if let Some(Slot::InFlight {
            generation: g,
            phase,
            ..
        }) = registry.slots.get_mut(key)
        {
            if *g == generation {
                *phase = state;
            }
        }
    }

    /// Drop a failed attempt; no negative result is kept
    fn abandon(&self, key: &CacheKey, generation: u64) {
        self.settle(key, generation);
    }

    /// Remove the slot of attempt `generation`, running or tombstoned
    fn settle(&self, key: &CacheKey, generation: u64) {
        let mut registry = self.registry.lock();
        let owned = match registry.slots.get(key) {
            Some(Slot::InFlight { generation: g, .. })
            | Some(Slot::Stale { generation: g, .. }) => *g == generation,
            _ => false,
        };
        if owned {
            registry.slots.remove(key);
        }
    }

    fn evict_ready(&self, key: &CacheKey) {
        let mut registry = self.registry.lock();
        if matches!(registry.slots.get(key), Some(Slot::Ready(_))) {
            registry.slots.remove(key);
        }
    }

    fn fallback(&self, url: &str) -> Resolution {
        Resolution::fallback(
            self.options
                .placeholder
                .clone()
                .unwrap_or_else(|| url.to_string()),
        )
    }
}
