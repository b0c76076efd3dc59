//! File analysis records, embedded vulnerability findings, and the
//! remediation action state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk label derived from the threat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLevel {
    /// Label for a threat score: >70 high, >40 medium, otherwise low.
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::High
        } else if score > 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Finding severity, also derived from the overall threat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::Critical
        } else if score > 40 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// Remediation state of an analysis record.
///
/// Transitions only `pending → {mitigated, quarantined, blocked}`; the
/// request enum [`AnalysisAction`] cannot express `pending`, so there is
/// no reversal path. Repeated applies overwrite (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Mitigated,
    Quarantined,
    Blocked,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Mitigated => "mitigated",
            Self::Quarantined => "quarantined",
            Self::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

impl FromStr for ActionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "mitigated" => Ok(Self::Mitigated),
            "quarantined" => Ok(Self::Quarantined),
            "blocked" => Ok(Self::Blocked),
            _ => Err(()),
        }
    }
}

/// Remediation action requested by the owner. Deliberately excludes
/// `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisAction {
    Mitigated,
    Quarantined,
    Blocked,
}

impl From<AnalysisAction> for ActionStatus {
    fn from(action: AnalysisAction) -> Self {
        match action {
            AnalysisAction::Mitigated => Self::Mitigated,
            AnalysisAction::Quarantined => Self::Quarantined,
            AnalysisAction::Blocked => Self::Blocked,
        }
    }
}

/// One canned OWASP Top 10 finding embedded in an analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub owasp_id: String,
    pub owasp_name: String,
    pub severity: Severity,
    pub description: String,
    pub detected_at: DateTime<Utc>,
}

/// Analysis record created on upload. Mutated once by an action call,
/// never structurally revised otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    pub file_hash: String,
    pub file_type: String,
    pub threat_score: u8,
    pub status: RiskLevel,
    pub upload_date: DateTime<Utc>,
    pub analysis_completed: bool,
    pub action_status: ActionStatus,
    pub action_date: Option<DateTime<Utc>>,
    pub action_notes: Option<String>,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl FileAnalysis {
    /// KV key for the analysis record.
    pub fn key(id: Uuid) -> String {
        format!("file_analyses:{id}")
    }
}

/// Audit record persisted each time an action is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisActionRecord {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub user_id: Uuid,
    pub action_type: ActionStatus,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisActionRecord {
    pub fn key(id: Uuid) -> String {
        format!("analysis_actions:{id}")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_size: u64,
    pub file_hash: String,
    pub file_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyActionRequest {
    pub action: AnalysisAction,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(99), RiskLevel::High);
    }

    #[test]
    fn risk_level_serializes_as_label() {
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"High Risk\"");
    }

    #[test]
    fn severity_tracks_score() {
        assert_eq!(Severity::from_score(99), Severity::Critical);
        assert_eq!(Severity::from_score(55), Severity::High);
        assert_eq!(Severity::from_score(10), Severity::Medium);
    }

    #[test]
    fn action_status_roundtrip() {
        for status in [
            ActionStatus::Pending,
            ActionStatus::Mitigated,
            ActionStatus::Quarantined,
            ActionStatus::Blocked,
        ] {
            let parsed: ActionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("deleted".parse::<ActionStatus>().is_err());
    }

    #[test]
    fn action_status_lowercase_json() {
        let json = serde_json::to_string(&ActionStatus::Quarantined).unwrap();
        assert_eq!(json, "\"quarantined\"");
    }

    #[test]
    fn analysis_action_cannot_be_pending() {
        let parsed: Result<AnalysisAction, _> = serde_json::from_str("\"pending\"");
        assert!(parsed.is_err());

        let blocked: AnalysisAction = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(ActionStatus::from(blocked), ActionStatus::Blocked);
    }
}
