// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Raw fields scraped from a listing page, before any correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingFields {
    pub miles: u64,
    pub price: f64,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub miles: u64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Overpriced { added: i64 },
    Saved { saved: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub actual_miles: u64,
    pub actual_price: f64,
    pub fair_price: f64,
    pub verdict: Verdict,
}

impl PriceComparison {
    /// Annotation text for the difference panel, e.g. `$1200 added`.
    pub fn difference_label(&self) -> String {
        match self.verdict {
            Verdict::Overpriced { added } => format!("${} added", added),
            Verdict::Saved { saved } => format!("${} saved", saved),
        }
    }

    /// Annotation text for the mileage/price panel.
    pub fn listing_label(&self) -> String {
        format!("{} miles @ ${}", self.actual_miles, self.actual_price)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Appraisal {
    pub url: String,
    pub label: String,
    pub listing: NormalizedListing,
    pub image_urls: Vec<String>,
    pub comparison: PriceComparison,
    pub appraised_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub price_figure: PathBuf,
    pub gallery: Option<PathBuf>,
}
