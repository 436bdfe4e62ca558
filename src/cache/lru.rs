//! LRU Cache Module
//!
//! Byte-budgeted Least Recently Used cache.
//!
//! Entries live in an arena-backed doubly linked list indexed by a HashMap,
//! so promotion and eviction relink nodes instead of rescanning.
//!
//! The cache is not synchronized. Callers sharing it across threads must wrap
//! it in a lock (see [`SharedCache`](crate::cache::SharedCache)).

use std::collections::HashMap;
use std::fmt;

// == Value ==
/// Anything stored in an [`LruCache`] must report its size in bytes.
pub trait Value {
    fn byte_len(&self) -> usize;
}

impl Value for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl Value for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Hook invoked with the key and value of every entry evicted by
/// [`LruCache::remove_oldest`].
///
/// Runs synchronously on the evicting thread, before the mutating call
/// returns. It must not call back into the cache that evicted the entry.
pub type EvictHook<V> = Box<dyn FnMut(&str, &V) + Send>;

// == Node ==
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: Value> Node<V> {
    /// Bytes charged against the budget for this entry.
    fn footprint(&self) -> u64 {
        (self.key.len() + self.value.byte_len()) as u64
    }
}

// == LRU Cache ==
/// Key-value store bounded by a byte budget.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Each entry costs `key.len() + value.byte_len()` bytes. A budget of `0`
/// disables eviction entirely.
pub struct LruCache<V> {
    /// Byte budget, 0 = unbounded
    max_bytes: u64,
    /// Bytes currently charged by all entries
    used_bytes: u64,
    /// Key -> arena slot
    index: HashMap<String, usize>,
    /// Node arena, `None` marks a free slot
    nodes: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evict: Option<EvictHook<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            index: HashMap::new(),
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            on_evict: None,
        }
    }

    /// Installs a hook called for every evicted entry.
    pub fn with_evict_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        self.on_evict = Some(Box::new(hook));
        self
    }

    // == Get ==
    /// Looks up a key, promoting it to most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Add ==
    /// Inserts or replaces a value and promotes it to most recently used.
    ///
    /// Afterwards, least recently used entries are evicted until usage fits
    /// the budget again. A single entry larger than the budget is evicted
    /// as well, leaving the cache empty.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            if let Some(node) = self.nodes[idx].as_mut() {
                let old_len = node.value.byte_len() as u64;
                let new_len = value.byte_len() as u64;
                self.used_bytes = self.used_bytes - old_len + new_len;
                node.value = value;
            }
            self.move_to_front(idx);
        } else {
            let node = Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            };
            self.used_bytes += node.footprint();
            let idx = self.alloc(node);
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and returns it.
    ///
    /// Calls the eviction hook, if any. Returns None if the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        let node = self.detach(idx)?;
        self.index.remove(&node.key);

        if let Some(hook) = self.on_evict.as_mut() {
            hook(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Remove ==
    /// Removes a key explicitly. The eviction hook is not called.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.detach(idx).map(|node| node.value)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without touching it.
    #[cfg(test)]
    fn peek_oldest(&self) -> Option<&str> {
        self.tail
            .and_then(|idx| self.nodes[idx].as_ref())
            .map(|node| node.key.as_str())
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.nodes[cursor?].as_ref()?;
            cursor = node.next;
            Some(node.key.as_str())
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    // == List Plumbing ==
    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Unlinks a node, frees its slot and uncharges its bytes.
    /// The index entry is left for the caller.
    fn detach(&mut self, idx: usize) -> Option<Node<V>> {
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.used_bytes -= node.footprint();
        Some(node)
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(head_idx) = old_head {
            if let Some(head) = self.nodes[head_idx].as_mut() {
                head.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn value(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn test_lru_new() {
        let lru: LruCache<String> = LruCache::new(100);
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.used_bytes(), 0);
        assert_eq!(lru.max_bytes(), 100);
    }

    #[test]
    fn test_lru_get_hit_and_miss() {
        let mut lru = LruCache::new(0);
        lru.add("key1", "1234".to_string());

        assert_eq!(lru.get("key1").map(String::as_str), Some("1234"));
        assert!(lru.get("key2").is_none());
    }

    #[test]
    fn test_lru_budget_scenario() {
        let mut lru = LruCache::new(20);

        // 2-byte keys + 8-byte values = 10 bytes each
        lru.add("k1", value(8));
        lru.add("k2", value(8));
        assert_eq!(lru.used_bytes(), 20);
        assert_eq!(lru.len(), 2);

        lru.add("k3", value(3));
        assert!(!lru.contains("k1"));
        assert_eq!(lru.used_bytes(), 15);
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_get_promotes_entry() {
        let mut lru = LruCache::new(20);

        lru.add("k1", value(8));
        lru.add("k2", value(8));
        // Touch k1 so k2 becomes the eviction candidate
        lru.get("k1");
        lru.add("k3", value(3));

        assert!(lru.contains("k1"));
        assert!(!lru.contains("k2"));
        assert!(lru.contains("k3"));
    }

    #[test]
    fn test_lru_update_adjusts_bytes_by_delta() {
        let mut lru = LruCache::new(0);

        lru.add("key", value(10));
        assert_eq!(lru.used_bytes(), 13);

        lru.add("key", value(4));
        assert_eq!(lru.used_bytes(), 7);

        lru.add("key", value(25));
        assert_eq!(lru.used_bytes(), 28);
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_update_promotes_entry() {
        let mut lru = LruCache::new(0);
        lru.add("a", value(1));
        lru.add("b", value(1));
        lru.add("a", value(2));

        assert_eq!(lru.peek_oldest(), Some("b"));
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_lru_zero_budget_never_evicts() {
        let mut lru = LruCache::new(0);
        for i in 0..1000 {
            lru.add(format!("key{i}"), value(100));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_lru_remove_oldest_empty() {
        let mut lru: LruCache<String> = LruCache::new(10);
        assert!(lru.remove_oldest().is_none());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_remove_oldest_order() {
        let mut lru = LruCache::new(0);
        lru.add("a", value(1));
        lru.add("b", value(1));
        lru.add("c", value(1));

        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("a".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("b".to_string()));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some("c".to_string()));
        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_evict_hook_receives_entries() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut lru = LruCache::new(10).with_evict_hook(move |key: &str, value: &String| {
            sink.lock().push((key.to_string(), value.clone()));
        });

        lru.add("key1", "123456".to_string());
        lru.add("k2", "k2".to_string());
        lru.add("k3", "k3".to_string());
        lru.add("k4", "k4".to_string());

        // key1 (10 bytes) goes when k2 lands, k2 goes when k4 lands
        assert_eq!(
            *evicted.lock(),
            vec![
                ("key1".to_string(), "123456".to_string()),
                ("k2".to_string(), "k2".to_string()),
            ]
        );
        assert_eq!(lru.used_bytes(), 8);
    }

    #[test]
    fn test_lru_explicit_remove_skips_hook() {
        let calls = Arc::new(Mutex::new(0usize));
        let counter = calls.clone();
        let mut lru = LruCache::new(0).with_evict_hook(move |_: &str, _: &String| {
            *counter.lock() += 1;
        });

        lru.add("key", value(3));
        assert_eq!(lru.remove("key"), Some(value(3)));
        assert!(lru.remove("key").is_none());
        assert_eq!(*calls.lock(), 0);
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_oversized_entry_is_evicted() {
        let mut lru = LruCache::new(5);
        lru.add("big", value(10));
        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_slots_are_reused() {
        let mut lru = LruCache::new(0);
        lru.add("a", value(1));
        lru.add("b", value(1));
        lru.remove("a");
        lru.add("c", value(1));

        assert_eq!(lru.nodes.len(), 2);
        assert_eq!(lru.keys().collect::<Vec<_>>(), vec!["c", "b"]);
    }
}
