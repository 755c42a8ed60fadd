// src/handlers/appraisal.rs
use std::sync::Arc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;
use log::{info, error};

use crate::config::AppConfig;
use crate::services::appraisal::{appraise, render_report, DescribeRequest};
use super::error::ApiError;

pub struct AppState {
    pub client: Client,
    pub config: AppConfig,
}

#[derive(Debug, Deserialize)]
pub struct AppraisalQuery {
    pub url: String,
    pub price: Option<f64>,
    pub miles: Option<u64>,
    pub label: Option<String>,
}

impl AppraisalQuery {
    /// Unset query parameters fall back to the configured reference values.
    pub fn into_request(self, config: &AppConfig) -> DescribeRequest {
        let mut request = DescribeRequest::with_config(self.url, config);
        if let Some(price) = self.price {
            request.estimated_price = price;
        }
        if let Some(miles) = self.miles {
            request.estimated_miles = miles;
        }
        if let Some(label) = self.label {
            request.label = label;
        }
        request
    }
}

pub async fn get_appraisal(query: AppraisalQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to appraise {}", query.url);
    let request = query.into_request(&state.config);

    let appraisal = appraise(&state.client, &state.config.thresholds, &request)
        .await
        .map_err(|e| {
            error!("Failed to appraise {}: {}", request.url, e);
            warp::reject::custom(ApiError::external_error(e.to_string()))
        })?;

    Ok(warp::reply::json(&appraisal))
}

pub async fn get_description(query: AppraisalQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to describe {}", query.url);
    let request = query.into_request(&state.config);

    let appraisal = appraise(&state.client, &state.config.thresholds, &request)
        .await
        .map_err(|e| {
            error!("Failed to appraise {}: {}", request.url, e);
            warp::reject::custom(ApiError::external_error(e.to_string()))
        })?;

    let report = render_report(&state.client, &state.config, &request, &appraisal)
        .await
        .map_err(|e| {
            error!("Failed to render {}: {}", request.url, e);
            warp::reject::custom(ApiError::render_error(e.to_string()))
        })?;

    Ok(warp::reply::json(&json!({
        "appraisal": appraisal,
        "report": report,
    })))
}
