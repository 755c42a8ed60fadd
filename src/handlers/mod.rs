// src/handlers/mod.rs
pub mod appraisal;
pub mod error;
