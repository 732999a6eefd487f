// src/models.rs
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Market {
    AShare,
    Us,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::AShare => "a-share",
            Market::Us => "us",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-share" | "ashare" | "cn" => Ok(Market::AShare),
            "us" => Ok(Market::Us),
            other => Err(format!("unknown market '{}', expected 'a-share' or 'us'", other)),
        }
    }
}

/// Everything the return estimator needs for one computation. Rates are
/// fractions here (0.15 = 15%/year); the HTTP layer converts from the
/// percent-valued query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub purchase_price: f64,
    pub current_eps: f64,
    pub profit_growth_rate: f64,
    pub dividend_payout_ratio: f64,
    pub leverage_ratio: f64,
    pub future_pe_assumption: f64,
    pub holding_years: u32,
}

impl EstimateInput {
    /// Caller-side domain checks. The estimator itself has no defensive
    /// checks and will happily produce NaN/Inf on violations, so every
    /// entry point must run this first.
    pub fn validate(&self) -> Result<()> {
        if self.holding_years < 1 {
            bail!("holding_years must be at least 1");
        }
        if self.purchase_price <= 0.0 {
            bail!("purchase_price must be positive");
        }
        if self.leverage_ratio < 1.0 {
            bail!("leverage_ratio must be at least 1.0");
        }
        if self.future_pe_assumption <= 0.0 {
            bail!("future_pe must be positive");
        }
        if !(0.0..=1.0).contains(&self.dividend_payout_ratio) {
            bail!("dividend_payout_ratio must be between 0 and 100 percent");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fundamentals {
    pub eps: f64,
    pub pe: f64,
    pub price: f64,
    pub dividend_payout_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct CachedFundamentals {
    pub data: Fundamentals,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FundamentalsSource {
    Live,
    Cache,
    Fallback,
}

/// Fundamentals plus provenance. `source` doubles as the advisory notice
/// callers get when live data was unavailable.
#[derive(Debug, Clone, Serialize)]
pub struct FundamentalsReport {
    pub market: Market,
    pub symbol: String,
    pub fundamentals: Fundamentals,
    pub source: FundamentalsSource,
    pub fetched_at: DateTime<Utc>,
}
