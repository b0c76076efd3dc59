//! KV-store records and DTOs for all domain entities.

pub mod analysis;
pub mod cli;
pub mod user;
