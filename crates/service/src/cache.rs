use std::time::Duration;

use moka::future::Cache;
use models::restaurant::Restaurant;

/// Read-through cache for point lookups, keyed by restaurant name.
///
/// Entries are populated on store hits and invalidated explicitly on every
/// write or delete. Negative lookups are never cached, so a create becomes
/// visible immediately. Ranked queries bypass this layer entirely.
#[derive(Clone)]
pub struct RestaurantCache {
    inner: Cache<String, Restaurant>,
}

impl RestaurantCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder().max_capacity(capacity).time_to_live(ttl).build();
        Self { inner }
    }

    pub async fn get(&self, name: &str) -> Option<Restaurant> {
        self.inner.get(name).await
    }

    pub async fn insert(&self, record: Restaurant) {
        self.inner.insert(record.name.clone(), record).await;
    }

    pub async fn invalidate(&self, name: &str) {
        self.inner.invalidate(name).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Restaurant {
        Restaurant::new(name.into(), "italian".into(), "north".into())
    }

    #[tokio::test]
    async fn insert_get_invalidate_roundtrip() {
        let cache = RestaurantCache::new(16, Duration::from_secs(60));
        assert!(cache.get("Nonna").await.is_none());

        cache.insert(record("Nonna")).await;
        assert_eq!(cache.get("Nonna").await.unwrap().name, "Nonna");

        cache.invalidate("Nonna").await;
        assert!(cache.get("Nonna").await.is_none());
    }
}
