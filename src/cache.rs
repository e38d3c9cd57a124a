//! In-process read cache keyed by request and invalidated by tag.
//!
//! Handlers store serialized read results together with the tags they depend
//! on. A mutation invalidates its tags, which drops every entry carrying any
//! of them.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::RwLock;
use serde_json::Value;

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    tags: Vec<String>,
}

/// Entries in recency order plus, per tag, the keys carrying it.
#[derive(Debug)]
struct CacheState {
    entries: LruCache<String, CacheEntry>,
    by_tag: HashMap<String, HashSet<String>>,
}

impl CacheState {
    fn unindex(&mut self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(keys) = self.by_tag.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.by_tag.remove(tag);
                }
            }
        }
    }
}

/// Bounded read cache. The least recently used entry is evicted once
/// `capacity` entries are stored.
#[derive(Debug)]
pub struct TaggedCache {
    enabled: bool,
    state: RwLock<CacheState>,
}

impl Default for TaggedCache {
    fn default() -> Self {
        Self::new(true, DEFAULT_CAPACITY)
    }
}

impl TaggedCache {
    pub fn new(enabled: bool, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            enabled,
            state: RwLock::new(CacheState {
                entries: LruCache::new(capacity),
                by_tag: HashMap::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn capacity(&self) -> usize {
        self.state.read().entries.cap().get()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        // A hit refreshes recency, so reads take the write lock.
        let mut state = self.state.write();
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: Value, tags: Vec<String>) {
        if !self.enabled {
            return;
        }
        let key = key.into();
        let mut state = self.state.write();

        if let Some(previous) = state.entries.pop(&key) {
            state.unindex(&key, &previous.tags);
        }
        for tag in &tags {
            state
                .by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.clone());
        }
        if let Some((evicted_key, evicted)) = state.entries.push(key, CacheEntry { value, tags }) {
            log::debug!("evicted cache entry {evicted_key}");
            state.unindex(&evicted_key, &evicted.tags);
        }
    }

    /// Removes every entry tagged with any of `tags` and returns how many went.
    pub fn invalidate(&self, tags: &[String]) -> usize {
        if tags.is_empty() {
            return 0;
        }
        let mut state = self.state.write();
        let keys: HashSet<String> = tags
            .iter()
            .filter_map(|tag| state.by_tag.get(tag))
            .flatten()
            .cloned()
            .collect();

        let mut removed = 0;
        for key in keys {
            if let Some(entry) = state.entries.pop(&key) {
                state.unindex(&key, &entry.tags);
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("invalidated {removed} cache entries for {tags:?}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tag names. Collection tags are scoped by organization, item tags by id.
pub mod tags {
    pub fn organizations(user: &str) -> String {
        format!("organizations:{user}")
    }

    pub fn organization(id: i32) -> String {
        format!("organization:{id}")
    }

    pub fn company(organization_id: i32) -> String {
        format!("company:{organization_id}")
    }

    pub fn members(organization_id: i32) -> String {
        format!("members:{organization_id}")
    }

    pub fn invitations(organization_id: i32) -> String {
        format!("invitations:{organization_id}")
    }

    pub fn clients(organization_id: i32) -> String {
        format!("clients:{organization_id}")
    }

    pub fn client(id: i32) -> String {
        format!("client:{id}")
    }

    pub fn suppliers(organization_id: i32) -> String {
        format!("suppliers:{organization_id}")
    }

    pub fn supplier(id: i32) -> String {
        format!("supplier:{id}")
    }

    pub fn addresses(organization_id: i32) -> String {
        format!("addresses:{organization_id}")
    }

    pub fn contacts(organization_id: i32) -> String {
        format!("contacts:{organization_id}")
    }

    pub fn products(organization_id: i32) -> String {
        format!("products:{organization_id}")
    }

    pub fn product(id: i32) -> String {
        format!("product:{id}")
    }

    pub fn categories(organization_id: i32) -> String {
        format!("categories:{organization_id}")
    }

    pub fn tags(organization_id: i32) -> String {
        format!("tags:{organization_id}")
    }

    pub fn fiscal_years(organization_id: i32) -> String {
        format!("fiscal-years:{organization_id}")
    }

    /// Every collection tag of one organization.
    pub fn organization_scope(organization_id: i32) -> Vec<String> {
        vec![
            organization(organization_id),
            company(organization_id),
            members(organization_id),
            invitations(organization_id),
            clients(organization_id),
            suppliers(organization_id),
            addresses(organization_id),
            contacts(organization_id),
            products(organization_id),
            categories(organization_id),
            tags(organization_id),
            fiscal_years(organization_id),
        ]
    }
}
