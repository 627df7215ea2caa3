use crate::errors::ServiceError;
use async_trait::async_trait;
use models::restaurant::Restaurant;

/// Trait abstraction for the restaurant table.
/// Implementations can be file-backed, in-memory, or a remote document store.
///
/// All mutations are conditional and atomic at the store: there is no
/// check-then-act across two calls, so concurrent creates cannot both
/// succeed and concurrent rating submissions cannot lose updates.
#[async_trait]
pub trait RestaurantTable: Send + Sync {
    /// Point lookup by primary key.
    async fn get(&self, name: &str) -> Result<Option<Restaurant>, ServiceError>;

    /// Insert only if no record with the same name exists.
    /// Returns `false` when the key was already present (record untouched).
    async fn put_if_absent(&self, record: Restaurant) -> Result<bool, ServiceError>;

    /// Atomically fold one rating into the stored running average and bump
    /// the count. Returns the updated record, or `None` when the key is absent.
    async fn apply_rating(&self, name: &str, value: f64) -> Result<Option<Restaurant>, ServiceError>;

    /// Delete by key; returns whether a record existed.
    async fn remove(&self, name: &str) -> Result<bool, ServiceError>;

    /// Cuisine-index page of at most `limit` records ordered by rating
    /// descending, then filtered by `min_rating`. Because the floor is
    /// applied after the page is cut, the result can hold fewer than
    /// `limit` rows even when more qualifying rows exist beyond the page.
    async fn top_by_cuisine(
        &self,
        cuisine: &str,
        limit: usize,
        min_rating: f64,
    ) -> Result<Vec<Restaurant>, ServiceError>;

    /// Region-index page, rating descending, no floor filter.
    async fn top_by_region(&self, region: &str, limit: usize) -> Result<Vec<Restaurant>, ServiceError>;

    /// Compound (region, cuisine) page, rating descending.
    async fn top_by_region_cuisine(
        &self,
        region: &str,
        cuisine: &str,
        limit: usize,
    ) -> Result<Vec<Restaurant>, ServiceError>;
}
