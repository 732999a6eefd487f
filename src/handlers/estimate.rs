// src/handlers/estimate.rs
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::{EstimateInput, FundamentalsSource, Market};
use crate::services::cache::CacheStore;
use crate::services::calculations::{project_return, round2};
use crate::services::fundamentals::get_fundamentals;

use super::error::ApiError;

fn default_symbol() -> String {
    "600519".to_string()
}

/// Query parameters for the estimate endpoint. Growth and payout arrive as
/// percentages, matching the slider UI this API replaced, and missing
/// parameters take the slider defaults.
#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    pub market: Option<String>,
    pub purchase_price: Option<f64>,
    pub current_eps: Option<f64>,
    pub profit_growth_rate: Option<f64>,
    pub dividend_payout_ratio: Option<f64>,
    pub leverage_ratio: Option<f64>,
    pub future_pe: Option<f64>,
    pub holding_years: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EstimateResponse {
    symbol: String,
    market: Market,
    input: EstimateInput,
    future_price: f64,
    total_dividend: f64,
    total_return: f64,
    annualized_return_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fundamentals_source: Option<FundamentalsSource>,
}

pub async fn get_estimate(
    query: EstimateQuery,
    cache: Arc<CacheStore>,
) -> Result<Json, Rejection> {
    info!("Handling estimate request for symbol {}", query.symbol);

    let market = match query.market.as_deref() {
        Some(raw) => raw.parse::<Market>().map_err(|e| {
            error!("Rejecting estimate request: {}", e);
            warp::reject::custom(ApiError::invalid_input(e))
        })?,
        None => Market::AShare,
    };

    // Only touch the fetcher when the caller left price or EPS blank.
    let mut fundamentals_source = None;
    let (purchase_price, current_eps) = match (query.purchase_price, query.current_eps) {
        (Some(price), Some(eps)) => (price, eps),
        (price, eps) => {
            let report = get_fundamentals(&cache, market, &query.symbol).await;
            fundamentals_source = Some(report.source);
            (
                price.unwrap_or(report.fundamentals.price),
                eps.unwrap_or(report.fundamentals.eps),
            )
        }
    };

    let input = EstimateInput {
        purchase_price,
        current_eps,
        profit_growth_rate: query.profit_growth_rate.unwrap_or(15.0) / 100.0,
        dividend_payout_ratio: query.dividend_payout_ratio.unwrap_or(40.0) / 100.0,
        leverage_ratio: query.leverage_ratio.unwrap_or(1.0),
        future_pe_assumption: query.future_pe.unwrap_or(20.0),
        holding_years: query.holding_years.unwrap_or(1),
    };

    input.validate().map_err(|e| {
        error!("Rejecting estimate request: {}", e);
        warp::reject::custom(ApiError::invalid_input(e.to_string()))
    })?;

    let projection = project_return(&input);
    info!(
        "Computed estimate for {}: annualized return {:.4}",
        query.symbol, projection.annualized_return
    );

    let response = EstimateResponse {
        symbol: query.symbol,
        market,
        input,
        future_price: round2(projection.future_price),
        total_dividend: round2(projection.total_dividend),
        total_return: round2(projection.total_return),
        annualized_return_pct: round2(projection.annualized_return * 100.0),
        fundamentals_source,
    };

    Ok(warp::reply::json(&response))
}
