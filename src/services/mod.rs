// src/services/mod.rs
pub mod appraisal;
pub mod depreciation;
pub mod listing;
pub mod normalizer;
pub mod render;
