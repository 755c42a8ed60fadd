// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }

    pub fn external_error(message: impl Into<String>) -> Self {
        ApiError::new(format!("Listing fetch failed: {}", message.into()))
    }

    pub fn render_error(message: impl Into<String>) -> Self {
        ApiError::new(format!("Rendering failed: {}", message.into()))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_eq!(ApiError::external_error("timed out").message, "Listing fetch failed: timed out");
        assert_eq!(ApiError::render_error("no font").message, "Rendering failed: no font");
    }
}
