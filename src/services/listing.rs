// src/services/listing.rs
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use regex::Regex;
use log::{info, warn};

use crate::models::ListingFields;
use crate::BoxError;

pub type Result<T> = std::result::Result<T, BoxError>;

/// Element id of the photo thumbnail strip on a listing page.
pub const THUMBS_ID: &str = "thumbs";

pub fn build_client(user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Download a listing page and pull out its raw odometer, price and photo links.
pub async fn fetch_listing(client: &Client, url: &str) -> Result<ListingFields> {
    info!("Fetching listing from URL: {}", url);

    let html = client.get(url).send().await?.text().await?;
    let fields = parse_listing(&html)?;

    info!(
        "Scraped listing: {} miles, ${}, {} photos",
        fields.miles, fields.price, fields.image_urls.len()
    );
    Ok(fields)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| format!("Invalid selector '{}': {:?}", css, e).into())
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub fn parse_listing(html: &str) -> Result<ListingFields> {
    let document = Html::parse_document(html);

    let odometer = find_odometer(&document)?.ok_or("Odometer not found")?;
    let miles = parse_miles(&odometer)?;

    let price_selector = selector("span.price")?;
    let price_text = document.select(&price_selector)
        .next()
        .map(element_text)
        .ok_or("Price not found")?;
    let price = parse_price(&price_text)?;

    let image_urls = find_image_urls(&document)?;

    Ok(ListingFields { miles, price, image_urls })
}

fn find_odometer(document: &Html) -> Result<Option<String>> {
    // Classic attribute group: <span>odometer: <b>85000</b></span>
    let attr_selector = selector("p.attrgroup span")?;
    for span in document.select(&attr_selector) {
        let text = element_text(span);
        if let Some(value) = text.strip_prefix("odometer:") {
            return Ok(Some(value.trim().to_string()));
        }
    }

    // Newer layout: <div class="attr auto_miles"><span class="valu">85,000</span></div>
    let miles_selector = selector("div.attr.auto_miles span.valu")?;
    Ok(document.select(&miles_selector).next().map(element_text))
}

fn find_image_urls(document: &Html) -> Result<Vec<String>> {
    let thumbs_selector = selector(&format!("#{} > [href]", THUMBS_ID))?;

    let urls: Vec<String> = document.select(&thumbs_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.to_string())
        .collect();

    if urls.is_empty() {
        warn!("No photo links found under #{}", THUMBS_ID);
    }
    Ok(urls)
}

/// Parse an odometer reading such as `85,000` into whole miles.
pub fn parse_miles(text: &str) -> Result<u64> {
    let re = Regex::new(r"[^\d]")?;
    let digits = re.replace_all(text, "");
    if digits.is_empty() {
        return Err(format!("Odometer '{}' is not numeric", text).into());
    }
    Ok(digits.parse::<u64>()?)
}

/// Parse an asking price such as `$12,500` into currency units.
pub fn parse_price(text: &str) -> Result<f64> {
    let re = Regex::new(r"[^\d.]")?;
    let cleaned = re.replace_all(text, "");
    if cleaned.is_empty() {
        return Err(format!("Price '{}' is not numeric", text).into());
    }
    Ok(cleaned.parse::<f64>()?)
}
