use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use models::restaurant::{NewRestaurant, RestaurantView};
use service::directory::RatingSubmission;
use service::query::RankedQuery;

use crate::errors::ApiError;
use crate::state::{AppState, ConfigEcho};

/// Query string accepted by the top-K endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct TopQuery {
    pub limit: Option<u32>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f64>,
}

impl From<TopQuery> for RankedQuery {
    fn from(q: TopQuery) -> Self {
        RankedQuery { limit: q.limit, min_rating: q.min_rating }
    }
}

/// Echo the non-sensitive runtime configuration.
pub async fn config_echo(State(state): State<AppState>) -> Json<ConfigEcho> {
    Json(state.config.clone())
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(input): Json<NewRestaurant>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .create(input)
        .await
        .map_err(ApiError::wrap("create_restaurant"))?;
    Ok(Json(json!({"success": true})))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RestaurantView>, ApiError> {
    let view = state
        .directory
        .get(&name)
        .await
        .map_err(ApiError::wrap("get_restaurant"))?;
    Ok(Json(view))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .delete(&name)
        .await
        .map_err(ApiError::wrap("delete_restaurant"))?;
    Ok(Json(json!({"success": true})))
}

pub async fn submit_rating(
    State(state): State<AppState>,
    Json(submission): Json<RatingSubmission>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .submit_rating(submission)
        .await
        .map_err(ApiError::wrap("submit_rating"))?;
    Ok(Json(json!({"success": true})))
}

pub async fn top_by_cuisine(
    State(state): State<AppState>,
    Path(cuisine): Path<String>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    let rows = state
        .directory
        .top_by_cuisine(&cuisine, query.into())
        .await
        .map_err(ApiError::wrap("top_by_cuisine"))?;
    Ok(Json(rows))
}

pub async fn top_by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    let rows = state
        .directory
        .top_by_region(&region, query.into())
        .await
        .map_err(ApiError::wrap("top_by_region"))?;
    Ok(Json(rows))
}

pub async fn top_by_region_cuisine(
    State(state): State<AppState>,
    Path((region, cuisine)): Path<(String, String)>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    let rows = state
        .directory
        .top_by_region_cuisine(&region, &cuisine, query.into())
        .await
        .map_err(ApiError::wrap("top_by_region_cuisine"))?;
    Ok(Json(rows))
}
