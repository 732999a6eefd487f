use log::{error, info};
use regex::Regex;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()?;

    info!("Debugging Eastmoney push2 response...");

    let url = "https://push2.eastmoney.com/api/qt/stock/get?secid=1.600519&fields=f43,f55,f162";
    let resp = client.get(url).send().await?.text().await?;
    info!("push2 raw response: {}", resp);

    info!("Debugging Yahoo Finance quote markup...");

    let resp = client
        .get("https://finance.yahoo.com/quote/AAPL")
        .send()
        .await?
        .text()
        .await?;

    // Look for the current regex pattern
    let re = Regex::new(r#"data-symbol="AAPL"[^>]*data-value="([0-9.]+)""#)?;
    if let Some(caps) = re.captures(&resp) {
        info!("Found price using current regex: {}", caps.get(1).unwrap().as_str());
    } else {
        error!("Current regex pattern not found");

        // Try some alternative patterns
        let patterns = vec![
            r#""regularMarketPrice":\{"raw":([0-9.]+),"fmt":"[^"]*"\}"#,
            r#""regularMarketPrice":\{"raw":([0-9.]+)"#,
            r#"data-field="regularMarketPrice"[^>]*>([0-9,]+\.[0-9]+)"#,
        ];

        for pattern in patterns {
            let re = Regex::new(pattern)?;
            if let Some(caps) = re.captures(&resp) {
                info!(
                    "Found price using pattern '{}': {}",
                    pattern,
                    caps.get(1).unwrap().as_str()
                );
                break;
            }
        }
    }

    // Check the summary table cells the scraper relies on
    for key in ["EPS_RATIO-value", "PE_RATIO-value", "DIVIDEND_AND_YIELD-value"] {
        let marker = format!(r#"data-test="{}""#, key);
        if resp.contains(&marker) {
            info!("Found summary cell {}", key);
        } else {
            error!("Summary cell {} missing; markup may have changed", key);
        }
    }

    Ok(())
}
