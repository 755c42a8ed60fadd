// src/services/appraisal.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::{DateTime, Utc};
use log::info;
use reqwest::Client;

use crate::config::{AppConfig, DEFAULT_LABEL};
use crate::models::{Appraisal, ListingFields, NormalizedListing, RenderedReport};
use crate::services::depreciation::{DepreciationModel, DEFAULT_REFERENCE_MILES, DEFAULT_REFERENCE_PRICE};
use crate::services::listing::fetch_listing;
use crate::services::normalizer::{normalize_with, NormalizerThresholds};
use crate::services::render::{fetch_images, image_gallery, plot_price_info};
use crate::BoxError;

pub type Result<T> = std::result::Result<T, BoxError>;

static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DescribeRequest {
    pub url: String,
    /// Price of the vehicle when new.
    pub estimated_price: f64,
    /// Mileage at which the vehicle is worth nothing.
    pub estimated_miles: u64,
    pub label: String,
}

impl DescribeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            estimated_price: DEFAULT_REFERENCE_PRICE,
            estimated_miles: DEFAULT_REFERENCE_MILES,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    /// Same as `new` but with the reference values configured for this deployment.
    pub fn with_config(url: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            url: url.into(),
            estimated_price: config.reference_price,
            estimated_miles: config.reference_miles,
            label: config.label.clone(),
        }
    }

    pub fn model(&self) -> DepreciationModel {
        DepreciationModel::new(self.estimated_price, self.estimated_miles)
    }
}

/// Fetch, normalize and compare a listing without rendering anything.
pub async fn appraise(
    client: &Client,
    thresholds: &NormalizerThresholds,
    request: &DescribeRequest,
) -> Result<Appraisal> {
    let fields = fetch_listing(client, &request.url).await?;
    Ok(appraise_fields(fields, thresholds, request))
}

/// Normalize already scraped fields and compare them against the request's model.
pub fn appraise_fields(
    fields: ListingFields,
    thresholds: &NormalizerThresholds,
    request: &DescribeRequest,
) -> Appraisal {
    let (miles, price) = normalize_with(thresholds, fields.miles, fields.price);

    let comparison = request.model().compare(miles, price);
    info!(
        "Listing at {} miles asks ${} against a fair ${:.0}: {}",
        miles, price, comparison.fair_price, comparison.difference_label()
    );

    Appraisal {
        url: request.url.clone(),
        label: request.label.clone(),
        listing: NormalizedListing { miles, price },
        image_urls: fields.image_urls,
        comparison,
        appraised_at: Utc::now(),
    }
}

/// Price figure and gallery paths for one report. The sequence number keeps
/// reports appraised within the same millisecond apart.
pub fn report_paths(output_dir: &Path, appraised_at: DateTime<Utc>) -> (PathBuf, PathBuf) {
    let seq = REPORT_SEQ.fetch_add(1, Ordering::Relaxed);
    let stem = format!(
        "{}-{}-{}",
        appraised_at.format("%Y%m%dT%H%M%S%3f"),
        std::process::id(),
        seq
    );
    (
        output_dir.join(format!("{}-price.png", stem)),
        output_dir.join(format!("{}-gallery.png", stem)),
    )
}

/// Render the price figure, then the photo gallery, for an appraisal.
pub async fn render_report(
    client: &Client,
    config: &AppConfig,
    request: &DescribeRequest,
    appraisal: &Appraisal,
) -> Result<RenderedReport> {
    fs::create_dir_all(&config.output_dir)?;
    let (price_path, gallery_path) = report_paths(&config.output_dir, appraisal.appraised_at);

    plot_price_info(&price_path, &appraisal.comparison, &request.model(), &request.label)?;

    let images = fetch_images(client, &appraisal.image_urls, config.max_imgs).await?;
    let gallery = image_gallery(&gallery_path, &images, config.max_imgs)?;

    Ok(RenderedReport { price_figure: price_path, gallery })
}

/// Appraise a listing, then render the price figure and the photo gallery into
/// the configured output directory.
pub async fn describe(
    client: &Client,
    config: &AppConfig,
    request: &DescribeRequest,
) -> Result<(Appraisal, RenderedReport)> {
    let appraisal = appraise(client, &config.thresholds, request).await?;
    let report = render_report(client, config, request, &appraisal).await?;
    Ok((appraisal, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    fn fields(miles: u64, price: f64) -> ListingFields {
        ListingFields {
            miles,
            price,
            image_urls: vec!["https://images.example.com/1.jpg".to_string()],
        }
    }

    #[test]
    fn test_appraise_fields_uses_request_model() {
        let mut request = DescribeRequest::new("https://example.org/cto/d/1.html");
        request.estimated_price = 40_000.0;
        request.estimated_miles = 200_000;
        request.label = "Toyota Tacoma".to_string();

        let appraisal = appraise_fields(fields(100_000, 15_000.0), &NormalizerThresholds::default(), &request);
        assert_eq!(appraisal.listing, NormalizedListing { miles: 100_000, price: 15_000.0 });
        assert_eq!(appraisal.comparison.fair_price, 20_000.0);
        assert_eq!(appraisal.comparison.verdict, Verdict::Saved { saved: 5_000 });
        assert_eq!(appraisal.label, "Toyota Tacoma");
        assert_eq!(appraisal.image_urls, vec!["https://images.example.com/1.jpg"]);
    }

    #[test]
    fn test_appraise_fields_uses_given_thresholds() {
        let request = DescribeRequest::new("https://example.org/cto/d/2.html");
        let thresholds = NormalizerThresholds {
            cents_price: 1_000_000.0,
            thousands_miles: 100,
            thousands_price: 10_000.0,
        };

        // Neither correction fires under these thresholds
        let appraisal = appraise_fields(fields(500, 150_000.0), &thresholds, &request);
        assert_eq!(appraisal.listing, NormalizedListing { miles: 500, price: 150_000.0 });

        let appraisal = appraise_fields(fields(500, 150_000.0), &NormalizerThresholds::default(), &request);
        assert_eq!(appraisal.listing, NormalizedListing { miles: 500_000, price: 1_500.0 });
    }

    #[test]
    fn test_report_paths_are_unique_within_one_instant() {
        let now = Utc::now();
        let dir = Path::new("renders");
        let (price_a, gallery_a) = report_paths(dir, now);
        let (price_b, gallery_b) = report_paths(dir, now);
        assert_ne!(price_a, price_b);
        assert_ne!(gallery_a, gallery_b);
        assert!(price_a.to_string_lossy().ends_with("-price.png"));
        assert!(gallery_a.to_string_lossy().ends_with("-gallery.png"));
    }
}
