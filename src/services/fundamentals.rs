// src/services/fundamentals.rs
use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use chrono::Datelike;
use chrono_tz::Asia::Shanghai;
use chrono_tz::US::Eastern;
use log::{info, warn};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::env;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::models::{Fundamentals, FundamentalsReport, FundamentalsSource, Market};
use crate::BoxError;

use super::cache::CacheStore;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TTL_MINUTES: i64 = 15;
const OFF_SESSION_TTL_HOURS: i64 = 12;

/// Kweichow Moutai figures the calculator UI shipped as defaults. Returned
/// whenever the live providers are unreachable or change their markup.
pub fn fallback_fundamentals() -> Fundamentals {
    Fundamentals {
        eps: 68.63,
        pe: 22.0,
        price: 1388.0,
        dividend_payout_ratio: 0.40,
    }
}

/// Fundamentals for a ticker, served from the TTL cache when fresh and
/// from the fixed fallback tuple when the providers fail. Never errors.
pub async fn get_fundamentals(
    cache: &Arc<CacheStore>,
    market: Market,
    symbol: &str,
) -> FundamentalsReport {
    let now = Utc::now();

    if let Some(entry) = cache.get(market, symbol).await {
        if entry.fetched_at > now - cache_ttl(market, now) {
            return FundamentalsReport {
                market,
                symbol: symbol.to_string(),
                fundamentals: entry.data,
                source: FundamentalsSource::Cache,
                fetched_at: entry.fetched_at,
            };
        }
        info!("Cached fundamentals for {}:{} expired", market, symbol);
    }

    match fetch_with_retry(market, symbol).await {
        Ok(data) => {
            cache.update(market, symbol, data.clone()).await;
            info!("Fetched live fundamentals for {}:{}", market, symbol);
            FundamentalsReport {
                market,
                symbol: symbol.to_string(),
                fundamentals: data,
                source: FundamentalsSource::Live,
                fetched_at: now,
            }
        }
        Err(e) => {
            warn!(
                "Falling back to static fundamentals for {}:{}: {}",
                market, symbol, e
            );
            FundamentalsReport {
                market,
                symbol: symbol.to_string(),
                fundamentals: fallback_fundamentals(),
                source: FundamentalsSource::Fallback,
                fetched_at: now,
            }
        }
    }
}

async fn fetch_with_retry(market: Market, symbol: &str) -> Result<Fundamentals, BoxError> {
    match fetch_fundamentals(market, symbol).await {
        Ok(data) => Ok(data),
        Err(first) => {
            warn!("Fundamentals fetch failed, retrying once: {}", first);
            fetch_fundamentals(market, symbol).await
        }
    }
}

pub async fn fetch_fundamentals(market: Market, symbol: &str) -> Result<Fundamentals, BoxError> {
    match market {
        Market::AShare => fetch_eastmoney_quote(symbol).await,
        Market::Us => fetch_yahoo_quote(symbol).await,
    }
}

fn cache_ttl(market: Market, now: DateTime<Utc>) -> Duration {
    if market_session_open(market, now) {
        Duration::minutes(ttl_minutes())
    } else {
        Duration::hours(OFF_SESSION_TTL_HOURS)
    }
}

fn ttl_minutes() -> i64 {
    env::var("FUNDAMENTALS_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TTL_MINUTES)
}

/// Whether the market's regular trading session is open at `now`. Quotes
/// only move during the session, so the cache is kept much longer outside
/// of it. Exchange holidays are not modeled; a holiday just means one
/// refetch of an unchanged quote.
pub fn market_session_open(market: Market, now: DateTime<Utc>) -> bool {
    match market {
        Market::AShare => {
            let local = now.with_timezone(&Shanghai);
            let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
            let close = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
            is_weekday(local.weekday()) && local.time() >= open && local.time() < close
        }
        Market::Us => {
            let local = now.with_timezone(&Eastern);
            let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
            let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();
            is_weekday(local.weekday()) && local.time() >= open && local.time() < close
        }
    }
}

fn is_weekday(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}

fn http_client() -> Result<Client, BoxError> {
    Ok(Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

// Shanghai listings use secid prefix 1, Shenzhen 0.
fn eastmoney_secid(symbol: &str) -> String {
    if symbol.starts_with('6') {
        format!("1.{}", symbol)
    } else {
        format!("0.{}", symbol)
    }
}

async fn fetch_eastmoney_quote(symbol: &str) -> Result<Fundamentals, BoxError> {
    let url = format!(
        "https://push2.eastmoney.com/api/qt/stock/get?secid={}&fields=f43,f55,f162",
        eastmoney_secid(symbol)
    );
    info!("Fetching A-share quote from URL: {}", url);

    let resp: serde_json::Value = http_client()?.get(&url).send().await?.json().await?;
    let data = resp
        .get("data")
        .filter(|d| !d.is_null())
        .ok_or("No data object in push2 response")?;

    // push2 serves price and PE as integers scaled by 100; EPS is plain.
    let price = data
        .get("f43")
        .and_then(|v| v.as_f64())
        .ok_or("Missing price field f43")?
        / 100.0;
    let eps = data
        .get("f55")
        .and_then(|v| v.as_f64())
        .ok_or("Missing EPS field f55")?;
    let pe = data
        .get("f162")
        .and_then(|v| v.as_f64())
        .ok_or("Missing PE field f162")?
        / 100.0;

    // The quote endpoint carries no payout ratio; keep the default so
    // downstream estimates stay usable.
    Ok(Fundamentals {
        eps,
        pe,
        price,
        dividend_payout_ratio: fallback_fundamentals().dividend_payout_ratio,
    })
}

async fn fetch_yahoo_quote(symbol: &str) -> Result<Fundamentals, BoxError> {
    let url = format!("https://finance.yahoo.com/quote/{}", symbol);
    info!("Fetching US quote from URL: {}", url);

    let body = http_client()?.get(&url).send().await?.text().await?;

    let price_re = Regex::new(&format!(
        r#"data-symbol="{}"[^>]*data-value="([0-9.]+)""#,
        regex::escape(symbol)
    ))?;
    let price = price_re
        .captures(&body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<f64>())
        .ok_or("Price not found in quote page")??;

    let document = Html::parse_document(&body);
    let eps = scrape_quote_stat(&document, "EPS_RATIO-value")
        .as_deref()
        .and_then(parse_stat)
        .ok_or("EPS not found in quote summary")?;
    let pe = scrape_quote_stat(&document, "PE_RATIO-value")
        .as_deref()
        .and_then(parse_stat)
        .ok_or("PE not found in quote summary")?;

    // "Forward Dividend & Yield" reads like "0.96 (0.59%)"; the payout
    // ratio is the per-share dividend over trailing EPS.
    let dividend = scrape_quote_stat(&document, "DIVIDEND_AND_YIELD-value")
        .and_then(|s| s.split_whitespace().next().map(str::to_string))
        .as_deref()
        .and_then(parse_stat);
    let dividend_payout_ratio = match dividend {
        Some(d) if eps > 0.0 => (d / eps).clamp(0.0, 1.0),
        _ => fallback_fundamentals().dividend_payout_ratio,
    };

    Ok(Fundamentals {
        eps,
        pe,
        price,
        dividend_payout_ratio,
    })
}

fn scrape_quote_stat(document: &Html, key: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"td[data-test="{}"]"#, key)).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

fn parse_stat(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}
