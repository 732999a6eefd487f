use dotenv::dotenv;
use log::{error, info};

use return_estimator::models::Market;
use return_estimator::services::fundamentals::fetch_fundamentals;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Testing A-share fundamentals fetching...");

    match fetch_fundamentals(Market::AShare, "600519").await {
        Ok(data) => {
            info!("SUCCESS: 600519 fundamentals: {:?}", data);
        }
        Err(e) => {
            error!("ERROR: Failed to fetch 600519 fundamentals: {}", e);
        }
    }

    info!("Testing US fundamentals fetching...");

    match fetch_fundamentals(Market::Us, "AAPL").await {
        Ok(data) => {
            info!("SUCCESS: AAPL fundamentals: {:?}", data);
        }
        Err(e) => {
            error!("ERROR: Failed to fetch AAPL fundamentals: {}", e);
        }
    }

    Ok(())
}
