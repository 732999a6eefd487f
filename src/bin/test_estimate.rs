use log::info;

use return_estimator::models::EstimateInput;
use return_estimator::services::calculations::{project_return, round2};

fn main() {
    env_logger::init();

    info!("Running reference estimate scenarios...");

    let base = EstimateInput {
        purchase_price: 1388.0,
        current_eps: 68.63,
        profit_growth_rate: 0.1538,
        dividend_payout_ratio: 0.40,
        leverage_ratio: 1.0,
        future_pe_assumption: 20.0,
        holding_years: 1,
    };

    let projection = project_return(&base);
    info!(
        "Unleveraged 1y: future price {}, total dividend {}, total return {}, annualized {}%",
        round2(projection.future_price),
        round2(projection.total_dividend),
        round2(projection.total_return),
        round2(projection.annualized_return * 100.0)
    );

    let leveraged = project_return(&EstimateInput {
        leverage_ratio: 2.0,
        ..base.clone()
    });
    info!(
        "2x leverage 1y: capital invested {}, total return {}, annualized {}%",
        round2(leveraged.capital_invested),
        round2(leveraged.total_return),
        round2(leveraged.annualized_return * 100.0)
    );

    let ten_year = project_return(&EstimateInput {
        holding_years: 10,
        ..base
    });
    info!(
        "Unleveraged 10y: future price {}, total dividend {}, annualized {}%",
        round2(ten_year.future_price),
        round2(ten_year.total_dividend),
        round2(ten_year.annualized_return * 100.0)
    );
}
