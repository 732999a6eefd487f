// src/services/calculations.rs
use serde::Serialize;

use crate::models::EstimateInput;

/// Unrounded projection of a holding. Presentation rounding happens at the
/// HTTP boundary, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub future_eps: f64,
    pub future_price: f64,
    pub total_dividend: f64,
    pub total_return: f64,
    pub capital_invested: f64,
    pub annualized_return: f64,
}

/// Closed-form return estimate for holding a stock `holding_years` years.
///
/// Pure arithmetic with no fallible paths; inputs must already satisfy
/// `EstimateInput::validate`. Negative EPS propagates through to negative
/// prices and dividends, which is the intended loss-making-company case.
pub fn project_return(input: &EstimateInput) -> Projection {
    let growth = 1.0 + input.profit_growth_rate;
    let years = input.holding_years;

    let future_eps = input.current_eps * growth.powi(years as i32);
    let future_price = future_eps * input.future_pe_assumption;

    // Dividends are paid on EPS compounded from year 0 through year n-1;
    // the terminal year's payout at liquidation is excluded.
    let total_dividend: f64 = (0..years)
        .map(|year| input.current_eps * growth.powi(year as i32) * input.dividend_payout_ratio)
        .sum();

    let total_return = (future_price - input.purchase_price) + total_dividend;

    // Margin only shrinks the capital base; the absolute return itself is
    // not leverage-scaled.
    let capital_invested = input.purchase_price / input.leverage_ratio;
    let annualized_return = ((capital_invested + total_return) / capital_invested)
        .powf(1.0 / years as f64)
        - 1.0;

    Projection {
        future_eps,
        future_price,
        total_dividend,
        total_return,
        capital_invested,
        annualized_return,
    }
}

/// Presentation rounding to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstimateInput;

    fn moutai_one_year() -> EstimateInput {
        EstimateInput {
            purchase_price: 1388.0,
            current_eps: 68.63,
            profit_growth_rate: 0.1538,
            dividend_payout_ratio: 0.40,
            leverage_ratio: 1.0,
            future_pe_assumption: 20.0,
            holding_years: 1,
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn future_price_matches_closed_form() {
        for years in [1u32, 3, 7, 10] {
            for growth in [0.0, 0.1538, 0.30] {
                let input = EstimateInput {
                    profit_growth_rate: growth,
                    holding_years: years,
                    ..moutai_one_year()
                };
                let projection = project_return(&input);
                let expected =
                    input.current_eps * (1.0 + growth).powi(years as i32) * input.future_pe_assumption;
                let relative = ((projection.future_price - expected) / expected).abs();
                assert!(relative < 1e-9, "relative error {} too large", relative);
            }
        }
    }

    #[test]
    fn unleveraged_one_year_scenario() {
        let projection = project_return(&moutai_one_year());
        assert_close(projection.future_eps, 79.185294, 1e-6);
        assert_close(projection.future_price, 1583.70588, 1e-5);
        assert_close(projection.total_dividend, 27.452, 1e-6);
        assert_close(projection.total_return, 223.15788, 1e-5);
        assert_close(projection.annualized_return * 100.0, 16.0777, 1e-3);
    }

    #[test]
    fn leverage_shrinks_capital_base_only() {
        let unleveraged = project_return(&moutai_one_year());
        let leveraged = project_return(&EstimateInput {
            leverage_ratio: 2.0,
            ..moutai_one_year()
        });

        // Absolute return is identical; only the annualized figure moves.
        assert_eq!(leveraged.total_return, unleveraged.total_return);
        assert_eq!(leveraged.capital_invested, 694.0);
        assert_close(leveraged.annualized_return * 100.0, 32.1553, 1e-3);
    }

    #[test]
    fn dividend_sum_has_one_term_per_year() {
        let input = EstimateInput {
            holding_years: 10,
            ..moutai_one_year()
        };
        let projection = project_return(&input);

        let mut expected = 0.0;
        for year in 0..10 {
            expected += input.current_eps
                * (1.0 + input.profit_growth_rate).powi(year)
                * input.dividend_payout_ratio;
        }
        assert_close(projection.total_dividend, expected, 1e-9);

        // One year means exactly the year-0 payout, terminal year excluded.
        let single = project_return(&moutai_one_year());
        assert_close(
            single.total_dividend,
            68.63 * 0.40,
            1e-9,
        );
    }

    #[test]
    fn total_dividend_monotone_in_payout() {
        let mut previous = f64::NEG_INFINITY;
        for payout in [0.0, 0.25, 0.50, 0.75, 1.0] {
            let projection = project_return(&EstimateInput {
                dividend_payout_ratio: payout,
                holding_years: 5,
                ..moutai_one_year()
            });
            assert!(projection.total_dividend >= previous);
            previous = projection.total_dividend;
        }
    }

    #[test]
    fn break_even_annualizes_to_zero() {
        // Future price equals purchase price and nothing is paid out, so
        // total return is exactly zero regardless of leverage.
        for leverage in [1.0, 2.0, 3.0] {
            let input = EstimateInput {
                purchase_price: 100.0,
                current_eps: 10.0,
                profit_growth_rate: 0.0,
                dividend_payout_ratio: 0.0,
                leverage_ratio: leverage,
                future_pe_assumption: 10.0,
                holding_years: 4,
            };
            let projection = project_return(&input);
            assert_eq!(projection.total_return, 0.0);
            assert_eq!(projection.annualized_return, 0.0);
        }
    }

    #[test]
    fn negative_eps_propagates() {
        let projection = project_return(&EstimateInput {
            current_eps: -5.0,
            ..moutai_one_year()
        });
        assert!(projection.future_price < 0.0);
        assert!(projection.total_dividend < 0.0);
        // Losing more than the capital base reads as below -100%/year.
        assert!(projection.annualized_return < -1.0);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        let input = moutai_one_year();
        assert_eq!(project_return(&input), project_return(&input));
    }

    #[test]
    fn round2_rounds_half_away() {
        assert_eq!(round2(16.0777), 16.08);
        assert_eq!(round2(27.452), 27.45);
        assert_eq!(round2(-1.005), -1.0);
        assert_eq!(round2(1583.70588), 1583.71);
    }
}
