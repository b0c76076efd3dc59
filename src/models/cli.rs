//! Stored CLI terminal history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One executed command and its canned output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliCommand {
    pub id: Uuid,
    pub user_id: Uuid,
    pub command: String,
    pub output: String,
    pub timestamp: DateTime<Utc>,
}

impl CliCommand {
    pub fn key(id: Uuid) -> String {
        format!("cli_commands:{id}")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    pub command: String,
}
