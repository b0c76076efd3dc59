//! Business logic services.

pub mod analysis;
pub mod auth;
pub mod cli;
pub mod dashboard;
pub mod scoring;
