use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use models::restaurant::{NewRestaurant, RestaurantView};

use crate::cache::RestaurantCache;
use crate::errors::ServiceError;
use crate::query::RankedQuery;
use crate::storage::table_store::RestaurantTable;

/// Rating submission input. `rating` is taken as submitted; only a missing
/// field is a validation error (the query-side floor is validated, the
/// submission side is not).
#[derive(Clone, Debug, Deserialize, Default)]
pub struct RatingSubmission {
    pub name: Option<String>,
    pub rating: Option<f64>,
}

/// Business layer over the restaurant table. Every HTTP handler delegates
/// here; the cache, when present, is consulted for point lookups and
/// invalidated on every mutation.
pub struct Directory {
    table: Arc<dyn RestaurantTable>,
    cache: Option<RestaurantCache>,
}

impl Directory {
    pub fn new(table: Arc<dyn RestaurantTable>, cache: Option<RestaurantCache>) -> Self {
        Self { table, cache }
    }

    /// Create a restaurant with a fresh (zero) rating.
    /// Validation runs before any store access; a duplicate name is a conflict.
    pub async fn create(&self, input: NewRestaurant) -> Result<(), ServiceError> {
        let record = input.into_record()?;
        let name = record.name.clone();
        if !self.table.put_if_absent(record).await? {
            return Err(ServiceError::Conflict(format!("restaurant {name} already exists")));
        }
        if let Some(cache) = &self.cache {
            cache.invalidate(&name).await;
        }
        info!(restaurant = %name, "restaurant created");
        Ok(())
    }

    /// Point lookup, read-through when the cache is enabled.
    pub async fn get(&self, name: &str) -> Result<RestaurantView, ServiceError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(name).await {
                return Ok(hit.view());
            }
        }
        let record = self
            .table
            .get(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("restaurant"))?;
        if let Some(cache) = &self.cache {
            cache.insert(record.clone()).await;
        }
        Ok(record.view())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        if !self.table.remove(name).await? {
            return Err(ServiceError::not_found("restaurant"));
        }
        if let Some(cache) = &self.cache {
            cache.invalidate(name).await;
        }
        info!(restaurant = %name, "restaurant deleted");
        Ok(())
    }

    /// Fold one rating into the stored running average.
    pub async fn submit_rating(&self, submission: RatingSubmission) -> Result<(), ServiceError> {
        let name = match submission.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(ServiceError::Validation("missing required field: name".into())),
        };
        let value = submission
            .rating
            .ok_or_else(|| ServiceError::Validation("missing required field: rating".into()))?;
        let updated = self
            .table
            .apply_rating(&name, value)
            .await?
            .ok_or_else(|| ServiceError::not_found("restaurant"))?;
        if let Some(cache) = &self.cache {
            cache.invalidate(&name).await;
        }
        info!(
            restaurant = %name,
            rating = value,
            average = updated.rating,
            count = updated.rating_count,
            "rating recorded"
        );
        Ok(())
    }

    /// Top-rated restaurants for a cuisine, floor-filtered after the page cut.
    pub async fn top_by_cuisine(
        &self,
        cuisine: &str,
        query: RankedQuery,
    ) -> Result<Vec<RestaurantView>, ServiceError> {
        let min_rating = query.min_rating()?;
        let rows = self.table.top_by_cuisine(cuisine, query.limit(), min_rating).await?;
        Ok(rows.iter().map(|r| r.view()).collect())
    }

    /// Top-rated restaurants for a region; no rating floor on this index.
    pub async fn top_by_region(
        &self,
        region: &str,
        query: RankedQuery,
    ) -> Result<Vec<RestaurantView>, ServiceError> {
        let rows = self.table.top_by_region(region, query.limit()).await?;
        Ok(rows.iter().map(|r| r.view()).collect())
    }

    /// Top-rated restaurants matching both region and cuisine.
    pub async fn top_by_region_cuisine(
        &self,
        region: &str,
        cuisine: &str,
        query: RankedQuery,
    ) -> Result<Vec<RestaurantView>, ServiceError> {
        let rows = self.table.top_by_region_cuisine(region, cuisine, query.limit()).await?;
        Ok(rows.iter().map(|r| r.view()).collect())
    }
}
