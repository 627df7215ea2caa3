use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use async_trait::async_trait;
use models::restaurant::Restaurant;

use crate::errors::ServiceError;
use crate::storage::table_store::RestaurantTable;

/// JSON file-backed restaurant table.
///
/// Persists a `HashMap<name, Restaurant>` to a JSON file and serves point
/// lookups, conditional mutations, and ranked index queries over it.
/// Intended for deployments where a managed document store is overkill.
#[derive(Clone)]
pub struct JsonTableStore {
    inner: Arc<RwLock<HashMap<String, Restaurant>>>,
    file_path: PathBuf,
}

impl JsonTableStore {
    /// Open the table from a path. Creates the file with an empty map if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<String, Restaurant> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: HashMap<String, Restaurant> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Store(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Store(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Store(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Store(e.to_string()))?;
        Ok(())
    }

    /// Matching rows ordered by rating descending (name ascending on ties),
    /// truncated to `limit`.
    async fn ranked_page<F>(&self, matches: F, limit: usize) -> Vec<Restaurant>
    where
        F: Fn(&Restaurant) -> bool,
    {
        let map = self.inner.read().await;
        let mut rows: Vec<Restaurant> = map.values().filter(|r| matches(r)).cloned().collect();
        rows.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.name.cmp(&b.name)));
        rows.truncate(limit);
        rows
    }
}

#[async_trait]
impl RestaurantTable for JsonTableStore {
    async fn get(&self, name: &str) -> Result<Option<Restaurant>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(name).cloned())
    }

    async fn put_if_absent(&self, record: Restaurant) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if map.contains_key(&record.name) {
            return Ok(false);
        }
        map.insert(record.name.clone(), record);
        drop(map);
        self.save().await?;
        Ok(true)
    }

    async fn apply_rating(&self, name: &str, value: f64) -> Result<Option<Restaurant>, ServiceError> {
        let mut map = self.inner.write().await;
        let updated = match map.get_mut(name) {
            Some(record) => {
                record.apply_rating(value);
                Some(record.clone())
            }
            None => return Ok(None),
        };
        drop(map);
        self.save().await?;
        Ok(updated)
    }

    async fn remove(&self, name: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(name).is_some();
        drop(map);
        if existed {
            self.save().await?;
        }
        Ok(existed)
    }

    async fn top_by_cuisine(
        &self,
        cuisine: &str,
        limit: usize,
        min_rating: f64,
    ) -> Result<Vec<Restaurant>, ServiceError> {
        // The floor is applied to the already-cut page, matching how a
        // filter expression runs after an index scan with a row limit.
        let mut page = self.ranked_page(|r| r.cuisine == cuisine, limit).await;
        page.retain(|r| r.rating >= min_rating);
        Ok(page)
    }

    async fn top_by_region(&self, region: &str, limit: usize) -> Result<Vec<Restaurant>, ServiceError> {
        Ok(self.ranked_page(|r| r.region == region, limit).await)
    }

    async fn top_by_region_cuisine(
        &self,
        region: &str,
        cuisine: &str,
        limit: usize,
    ) -> Result<Vec<Restaurant>, ServiceError> {
        Ok(self.ranked_page(|r| r.region == region && r.cuisine == cuisine, limit).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(name: &str, cuisine: &str, region: &str, rating: f64, count: u64) -> Restaurant {
        Restaurant {
            name: name.into(),
            cuisine: cuisine.into(),
            region: region.into(),
            rating,
            rating_count: count,
        }
    }

    fn tmp_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("restaurant_table_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn put_if_absent_rejects_duplicates_and_keeps_original() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;

        assert!(store.put_if_absent(record("Nonna", "italian", "north", 0.0, 0)).await?);
        assert!(!store.put_if_absent(record("Nonna", "thai", "south", 0.0, 0)).await?);

        let kept = store.get("Nonna").await?.unwrap();
        assert_eq!(kept.cuisine, "italian");
        assert_eq!(kept.region, "north");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn apply_rating_updates_running_average_atomically() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("Nonna", "italian", "north", 0.0, 0)).await?;

        let after_first = store.apply_rating("Nonna", 5.0).await?.unwrap();
        assert_eq!(after_first.rating, 5.0);
        let after_second = store.apply_rating("Nonna", 3.0).await?.unwrap();
        assert_eq!(after_second.rating, 4.0);
        assert_eq!(after_second.rating_count, 2);

        assert!(store.apply_rating("Ghost", 5.0).await?.is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn remove_reports_existence() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("Nonna", "italian", "north", 0.0, 0)).await?;

        assert!(store.remove("Nonna").await?);
        assert!(!store.remove("Nonna").await?);
        assert!(store.get("Nonna").await?.is_none());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn state_survives_reopen() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("Nonna", "italian", "north", 0.0, 0)).await?;
        store.apply_rating("Nonna", 4.0).await?;

        let reopened = JsonTableStore::open(&tmp).await?;
        let r = reopened.get("Nonna").await?.unwrap();
        assert_eq!(r.rating, 4.0);
        assert_eq!(r.rating_count, 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn cuisine_page_is_rating_descending_and_capped() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("A", "italian", "north", 3.0, 1)).await?;
        store.put_if_absent(record("B", "italian", "south", 4.5, 1)).await?;
        store.put_if_absent(record("C", "italian", "north", 2.0, 1)).await?;
        store.put_if_absent(record("D", "thai", "north", 5.0, 1)).await?;

        let page = store.top_by_cuisine("italian", 2, 0.0).await?;
        let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn cuisine_floor_filters_after_the_page_is_cut() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("A", "italian", "north", 4.8, 1)).await?;
        store.put_if_absent(record("B", "italian", "north", 1.0, 1)).await?;
        store.put_if_absent(record("C", "italian", "north", 4.2, 1)).await?;

        // Page of 2 is [A, C]; the floor then keeps both, B never qualifies.
        let page = store.top_by_cuisine("italian", 2, 4.0).await?;
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|r| r.rating >= 4.0));

        // Page of 3 is [A, C, B]; the floor shrinks the result below the limit
        // even though no further qualifying rows exist.
        let page = store.top_by_cuisine("italian", 3, 4.0).await?;
        assert_eq!(page.len(), 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn region_and_compound_pages_match_keys_exactly() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("A", "italian", "north", 3.0, 1)).await?;
        store.put_if_absent(record("B", "thai", "north", 4.0, 1)).await?;
        store.put_if_absent(record("C", "italian", "south", 5.0, 1)).await?;

        let north = store.top_by_region("north", 10).await?;
        assert_eq!(north.len(), 2);
        assert!(north.iter().all(|r| r.region == "north"));

        let compound = store.top_by_region_cuisine("north", "italian", 10).await?;
        let names: Vec<&str> = compound.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn ties_break_by_name_ascending() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonTableStore::open(&tmp).await?;
        store.put_if_absent(record("Zeta", "italian", "north", 4.0, 1)).await?;
        store.put_if_absent(record("Alpha", "italian", "north", 4.0, 1)).await?;

        let page = store.top_by_cuisine("italian", 10, 0.0).await?;
        let names: Vec<&str> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
