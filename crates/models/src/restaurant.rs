use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Stored restaurant record.
/// - `name` is the primary key, unique across the table
/// - `cuisine` and `region` are categorical index keys
/// - `rating` is the running average of all submitted ratings
/// - `rating_count` is the number of submissions behind that average
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub cuisine: String,
    pub region: String,
    pub rating: f64,
    pub rating_count: u64,
}

impl Restaurant {
    /// Fresh record: no ratings yet.
    pub fn new(name: String, cuisine: String, region: String) -> Self {
        Self { name, cuisine, region, rating: 0.0, rating_count: 0 }
    }

    /// Fold one more rating into the running average and bump the count.
    ///
    /// `new = (old * count + value) / (count + 1)`. The value is taken as
    /// submitted; bounds are a caller concern.
    pub fn apply_rating(&mut self, value: f64) {
        let total = self.rating * self.rating_count as f64 + value;
        self.rating_count += 1;
        self.rating = total / self.rating_count as f64;
    }

    pub fn view(&self) -> RestaurantView {
        RestaurantView {
            cuisine: self.cuisine.clone(),
            name: self.name.clone(),
            rating: self.rating,
            region: self.region.clone(),
        }
    }
}

/// External shape returned by every read endpoint. `rating_count` stays
/// internal.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RestaurantView {
    pub cuisine: String,
    pub name: String,
    pub rating: f64,
    pub region: String,
}

/// Creation input: all fields required and non-empty after trimming.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct NewRestaurant {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub region: Option<String>,
}

impl NewRestaurant {
    /// Validate and convert into a fresh record.
    pub fn into_record(self) -> Result<Restaurant, ModelError> {
        let name = required(self.name, "name")?;
        let cuisine = required(self.cuisine, "cuisine")?;
        let region = required(self.region, "region")?;
        Ok(Restaurant::new(name, cuisine, region))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ModelError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ModelError::Validation(format!("missing required field: {field}"))),
    }
}
