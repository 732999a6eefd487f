// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::{ApiError, ApiErrorKind};
use crate::handlers::estimate::{get_estimate, EstimateQuery};
use crate::handlers::fundamentals::get_fundamentals_data;
use crate::services::cache::CacheStore;

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::InvalidInput => warp::http::StatusCode::BAD_REQUEST,
            ApiErrorKind::Internal => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    cache: Arc<CacheStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let cache_filter = warp::any().map(move || cache.clone());

    let estimate_route = warp::path!("api" / "v1" / "estimate")
        .and(warp::get())
        .and(warp::query::<EstimateQuery>())
        .and(cache_filter.clone())
        .and_then(get_estimate);

    let fundamentals_route = warp::path!("api" / "v1" / "fundamentals" / String / String)
        .and(warp::get())
        .and(cache_filter.clone())
        .and_then(get_fundamentals_data);

    let health_route = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    info!("All routes configured successfully.");

    estimate_route
        .or(fundamentals_route)
        .or(health_route)
        .recover(handle_rejection)
}
