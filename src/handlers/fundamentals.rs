// src/handlers/fundamentals.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::Market;
use crate::services::cache::CacheStore;
use crate::services::fundamentals::get_fundamentals;

use super::error::ApiError;

pub async fn get_fundamentals_data(
    market: String,
    symbol: String,
    cache: Arc<CacheStore>,
) -> Result<Json, Rejection> {
    info!("Handling request for {} fundamentals: {}", market, symbol);

    let market = market.parse::<Market>().map_err(|e| {
        error!("Rejecting fundamentals request: {}", e);
        warp::reject::custom(ApiError::invalid_input(e))
    })?;

    let report = get_fundamentals(&cache, market, &symbol).await;
    info!(
        "Serving {} fundamentals for {} (source: {:?})",
        market, symbol, report.source
    );

    Ok(warp::reply::json(&report))
}
