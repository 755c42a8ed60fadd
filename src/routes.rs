// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::appraisal::{get_appraisal, get_description, AppState, AppraisalQuery};
use log::info;

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found";
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = &api_error.message;
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query: expected url and optional price, miles, label";
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error";
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let appraisal_route = warp::path!("api" / "v1" / "appraisal")
        .and(warp::get())
        .and(warp::query::<AppraisalQuery>())
        .and(state_filter.clone())
        .and_then(get_appraisal);

    let describe_route = warp::path!("api" / "v1" / "describe")
        .and(warp::get())
        .and(warp::query::<AppraisalQuery>())
        .and(state_filter.clone())
        .and_then(get_description);

    info!("All routes configured successfully.");

    appraisal_route
        .or(describe_route)
        .recover(handle_rejection)
}
