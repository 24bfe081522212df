use coingecko_sdk::{logging, CoinGeckoClient, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configure from the environment (.env is honored) and set up logging
    let config = Config::load()?;
    logging::init(&config);
    println!("Using {}", config.summary());

    let client = CoinGeckoClient::new(config)?;

    // 2. Fetch current prices with the default retry policy
    let ids = ["bitcoin", "ethereum", "solana"];
    let response = client.simple_price_with_retry(&ids, &["usd"]).await?;

    let mut quotes = response.quotes("usd");
    quotes.sort_by(|a, b| a.id.cmp(&b.id));

    println!("-------------------------------------------");
    for quote in &quotes {
        println!(
            "{:>10}: ${:>12.2}  (updated {}, age {:?})",
            quote.id,
            quote.price,
            quote.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
            quote.age()
        );
    }

    // 3. Staleness check against the configured cache expiry
    let expiry = client.config().cache_expiry;
    for quote in &quotes {
        if quote.is_stale(expiry) {
            eprintln!("Warning: {} quote is older than {}s", quote.id, expiry);
        }
    }

    Ok(())
}
