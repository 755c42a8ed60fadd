// src/bin/describe.rs
use listing_appraisal::config::AppConfig;
use listing_appraisal::services::appraisal::{describe, DescribeRequest};
use listing_appraisal::services::listing::build_client;
use log::{info, error};
use env_logger;
use dotenv::dotenv;
use std::env;

const USAGE: &str = "usage: describe <url> [estimated_price] [estimated_miles] [label]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let mut args = env::args().skip(1);
    let url = args.next().ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let mut request = DescribeRequest::with_config(url, &config);
    if let Some(price) = args.next() {
        request.estimated_price = price.parse()?;
    }
    if let Some(miles) = args.next() {
        request.estimated_miles = miles.parse()?;
    }
    if let Some(label) = args.next() {
        request.label = label;
    }

    info!("Describing {} as a {}", request.url, request.label);
    let client = build_client(&config.user_agent).map_err(|e| anyhow::anyhow!(e))?;

    match describe(&client, &config, &request).await {
        Ok((appraisal, report)) => {
            let comparison = &appraisal.comparison;
            println!("{}", comparison.listing_label());
            println!("Fair price: ${:.0}", comparison.fair_price);
            println!("{}", comparison.difference_label());
            println!("Price figure: {}", report.price_figure.display());
            if let Some(gallery) = report.gallery {
                println!("Gallery:      {}", gallery.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("Failed to describe {}: {}", request.url, e);
            Err(anyhow::anyhow!(e))
        }
    }
}
