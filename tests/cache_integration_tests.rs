//! Integration Tests for the public cache API
//!
//! Exercises the crate the way an embedding application would.

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bounded_lru::{
    CacheError, CacheObserver, Config, Insertion, LruCache, SharedCache, TracingObserver,
};
use serde_json::json;

// == Helper Functions ==

static INIT_TRACING: Once = Once::new();

fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "bounded_lru=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl CacheObserver<String> for EventLog {
    fn on_hit(&self, key: &String) {
        self.0.lock().unwrap().push(format!("hit:{key}"));
    }

    fn on_miss(&self, key: &String) {
        self.0.lock().unwrap().push(format!("miss:{key}"));
    }

    fn on_insert(&self, key: &String) {
        self.0.lock().unwrap().push(format!("insert:{key}"));
    }

    fn on_update(&self, key: &String) {
        self.0.lock().unwrap().push(format!("update:{key}"));
    }

    fn on_evict(&self, key: &String) {
        self.0.lock().unwrap().push(format!("evict:{key}"));
    }

    fn on_remove(&self, key: &String) {
        self.0.lock().unwrap().push(format!("remove:{key}"));
    }

    fn on_clear(&self, removed: usize) {
        self.0.lock().unwrap().push(format!("clear:{removed}"));
    }
}

// == Construction ==

#[test]
fn test_zero_capacity_is_rejected() {
    let err = LruCache::<String, String>::new(0).unwrap_err();
    assert_eq!(err, CacheError::InvalidCapacity(0));
    assert!(err.to_string().contains("at least 1"));
}

#[test]
fn test_config_from_json() {
    let config: Config = serde_json::from_value(json!({ "capacity": 2 })).unwrap();
    let mut cache = config.build::<String, u32>().unwrap();

    cache.put("a".into(), 1);
    cache.put("b".into(), 2);
    cache.put("c".into(), 3);

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains_key(&"a".to_string()));
}

#[test]
fn test_config_missing_fields_use_default() {
    let config: Config = serde_json::from_value(json!({})).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_zero_capacity_from_json() {
    let config: Config = serde_json::from_value(json!({ "capacity": 0 })).unwrap();
    assert!(matches!(
        config.build::<String, u32>(),
        Err(CacheError::InvalidCapacity(0))
    ));
}

// == Cache Behaviour ==

#[test]
fn test_eviction_correctness() {
    let capacity = 5;
    let mut cache = LruCache::new(capacity).unwrap();

    for i in 0..=capacity {
        cache.put(format!("k{i}"), i);
    }

    assert_eq!(cache.get(&"k0".to_string()), None);
    for i in 1..=capacity {
        assert_eq!(cache.get(&format!("k{i}")), Some(&i));
    }
}

#[test]
fn test_recency_promotion() {
    let mut cache = LruCache::new(2).unwrap();

    cache.put("a", 1);
    cache.put("b", 2);
    assert_eq!(cache.get(&"a"), Some(&1));
    cache.put("c", 3);

    assert!(cache.contains_key(&"a"));
    assert!(!cache.contains_key(&"b"));
    assert!(cache.contains_key(&"c"));
}

#[test]
fn test_overwrite_does_not_evict() {
    let mut cache = LruCache::new(2).unwrap();

    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("a", 99);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"a"), Some(&99));
    assert!(cache.contains_key(&"b"));
}

#[test]
fn test_clear_is_idempotent() {
    let mut cache = LruCache::new(3).unwrap();
    cache.put("a", 1);
    cache.put("b", 2);

    cache.clear();
    cache.clear();

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), None);
}

#[test]
fn test_keys_and_values_snapshot() {
    let mut cache = LruCache::new(3).unwrap();
    cache.put(1, "one".to_string());
    cache.put(2, "two".to_string());

    let mut keys: Vec<_> = cache.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![1, 2]);

    assert_eq!(cache.values().len(), 2);
    assert!(cache.contains_value(&"two".to_string()));
    assert!(!cache.contains_value(&"three".to_string()));
}

#[test]
fn test_tracing_observer_logs_operations() {
    init_tracing();
    let mut cache = LruCache::with_observer(1, TracingObserver).unwrap();

    cache.put("a", 1);
    cache.get(&"a");
    cache.put("b", 2);
    cache.remove(&"b");
    cache.clear();

    assert!(cache.is_empty());
}

#[test]
fn test_stats_serialize_to_json() {
    let mut cache = LruCache::new(1).unwrap();
    cache.put("a", 1);
    cache.get(&"a");
    cache.get(&"z");
    cache.put("b", 2);

    let json = serde_json::to_value(cache.stats()).unwrap();
    assert_eq!(
        json,
        json!({
            "hits": 1,
            "misses": 1,
            "inserts": 2,
            "updates": 0,
            "evictions": 1,
            "removals": 0,
            "total_entries": 1,
            "capacity": 1
        })
    );
}

// == Shared Cache ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_cache_concurrent_puts_respect_capacity() {
    init_tracing();
    let cache = Config::new(16).build_shared::<u32, u32>().unwrap();

    let mut handles = Vec::new();
    for task in 0..8u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100u32 {
                let key = task * 1000 + i;
                cache.put(key, i).await;
                assert!(cache.len().await <= 16);
                cache.get(&key).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len().await, 16);
    let stats = cache.stats().await;
    assert_eq!(stats.inserts, 800);
    assert_eq!(stats.evictions, 800 - 16);
}

#[tokio::test]
async fn test_shared_cache_observer_runs_outside_lock() {
    type Handle = SharedCache<String, u32, Arc<ReentrantObserver>>;

    #[derive(Default)]
    struct ReentrantObserver {
        cache: Mutex<Option<Handle>>,
        seen: Mutex<Vec<usize>>,
    }

    impl CacheObserver<String> for ReentrantObserver {
        fn on_insert(&self, _key: &String) {
            let Some(cache) = self.cache.lock().unwrap().clone() else {
                return;
            };
            // Reads the same cache from another runtime; times out if the lock is still held
            let len = std::thread::spawn(move || {
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap()
                    .block_on(async {
                        tokio::time::timeout(Duration::from_secs(1), cache.len()).await
                    })
            })
            .join()
            .unwrap()
            .expect("lock was held while notifying the observer");
            self.seen.lock().unwrap().push(len);
        }
    }

    let observer = Arc::new(ReentrantObserver::default());
    let cache: Handle = SharedCache::with_observer(4, Arc::clone(&observer)).unwrap();
    *observer.cache.lock().unwrap() = Some(cache.clone());

    cache.put("a".into(), 1).await;
    cache.put("b".into(), 2).await;

    assert_eq!(*observer.seen.lock().unwrap(), vec![1, 2]);
    observer.cache.lock().unwrap().take();
}

#[tokio::test]
async fn test_shared_cache_observer_events() {
    let cache = SharedCache::with_observer(1, EventLog::default()).unwrap();

    cache.put("a".to_string(), 1).await;
    cache.put("a".to_string(), 2).await;
    assert_eq!(cache.get(&"a".to_string()).await, Some(2));
    assert_eq!(cache.get(&"x".to_string()).await, None);
    assert_eq!(
        cache.insert("b".to_string(), 3).await,
        Insertion::Evicted("a".to_string(), 2)
    );
    cache.remove(&"b".to_string()).await;
    cache.remove(&"b".to_string()).await;
    cache.put("c".to_string(), 4).await;
    cache.clear().await;

    assert_eq!(
        cache.observer().take(),
        vec![
            "insert:a", "update:a", "hit:a", "miss:x", "evict:a", "insert:b", "remove:b",
            "insert:c", "clear:1",
        ]
    );
}
