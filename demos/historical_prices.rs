use chrono::{Duration, Utc};
use coingecko_sdk::{logging, transform, CoinGeckoClient, Config, Granularity};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logging::init(&config);
    let client = CoinGeckoClient::new(config)?;

    // 1. A week of daily bitcoin prices
    println!("Bitcoin, last 7 days (daily):");
    let chart = client
        .market_chart("bitcoin", "usd", 7, Some(Granularity::Daily))
        .await?;

    let dated = transform::transform_points(&chart.prices)?;
    for point in &dated {
        println!("  {}: ${:.2}", point.datetime.format("%Y-%m-%d"), point.price);
    }

    // 2. The same series filtered to prices above its midpoint
    if let (Some(min), Some(max)) = (
        dated.iter().map(|p| p.price).reduce(f64::min),
        dated.iter().map(|p| p.price).reduce(f64::max),
    ) {
        let midpoint = (min + max) / 2.0;
        let above = transform::filter_points(&dated, None, None, Some(midpoint), None);
        println!(
            "{} of {} samples above the midpoint ${:.2}",
            above.len(),
            dated.len(),
            midpoint
        );
    }

    // 3. Price on a specific date
    let date = (Utc::now() - Duration::days(30)).date_naive();
    match client.price_on_date("bitcoin", date, "usd").await? {
        Some(price) => println!("Bitcoin on {date}: ${price:.2}"),
        None => println!("No bitcoin price recorded for {date}"),
    }

    Ok(())
}
