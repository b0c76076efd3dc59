//! Dashboard statistics aggregation over the caller's analysis records.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::ActionStatus;
use crate::services::analysis;
use crate::services::scoring::THREAT_SCORE_THRESHOLD;
use crate::store::KvStore;

/// Aggregated statistics for the main overview page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_scanned: u32,
    pub threats_detected: u32,
    pub quarantined: u32,
    pub blocked: u32,
    /// 100 minus 5 per detected threat, floored at 0.
    pub system_health: u32,
}

/// Compute stats with a linear pass over the caller's records.
pub async fn get_stats(kv: &KvStore, user_id: Uuid) -> Result<DashboardStats, AppError> {
    let analyses = analysis::history(kv, user_id).await?;

    let mut total_scanned = 0u32;
    let mut threats_detected = 0u32;
    let mut quarantined = 0u32;
    let mut blocked = 0u32;

    for analysis in &analyses {
        total_scanned += 1;
        if analysis.threat_score > THREAT_SCORE_THRESHOLD {
            threats_detected += 1;
        }
        match analysis.action_status {
            ActionStatus::Quarantined => quarantined += 1,
            ActionStatus::Blocked => blocked += 1,
            ActionStatus::Pending | ActionStatus::Mitigated => {}
        }
    }

    Ok(DashboardStats {
        total_scanned,
        threats_detected,
        quarantined,
        blocked,
        system_health: 100u32.saturating_sub(threats_detected * 5),
    })
}
