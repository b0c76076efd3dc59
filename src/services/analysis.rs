//! Analysis record lifecycle: create, read, list, delete, and the
//! one-shot remediation action.

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{
    ActionStatus, AnalysisActionRecord, ApplyActionRequest, FileAnalysis, RiskLevel, UploadRequest,
};
use crate::models::user::User;
use crate::services::scoring::{self, THREAT_SCORE_THRESHOLD};
use crate::store::KvStore;

/// Create an analysis record for an uploaded file: synthesize the threat
/// score and findings, persist the record, prepend it to the owner's
/// index list, and bump the owner's counters.
pub async fn create(
    kv: &KvStore,
    user_id: Uuid,
    input: &UploadRequest,
) -> Result<FileAnalysis, AppError> {
    if input.file_name.trim().is_empty() {
        return Err(AppError::Validation("file_name is required".to_string()));
    }

    let id = Uuid::now_v7();
    let now = Utc::now();

    // ThreadRng is not Send; keep it out of scope across awaits.
    let (threat_score, vulnerabilities) = {
        let mut rng = rand::rng();
        let score = scoring::random_threat_score(&mut rng);
        let vulns = scoring::synthesize_vulnerabilities(&mut rng, id, score, now);
        (score, vulns)
    };

    let analysis = FileAnalysis {
        id,
        user_id,
        file_name: input.file_name.clone(),
        file_size: input.file_size,
        file_hash: input.file_hash.clone(),
        file_type: input.file_type.clone(),
        threat_score,
        status: RiskLevel::from_score(threat_score),
        upload_date: now,
        analysis_completed: false,
        action_status: ActionStatus::Pending,
        action_date: None,
        action_notes: None,
        vulnerabilities,
    };

    kv.set(&FileAnalysis::key(id), &analysis).await?;

    // Prepend to the owner's index list, newest first.
    let mut ids: Vec<Uuid> = kv
        .get(&User::analyses_key(user_id))
        .await?
        .unwrap_or_default();
    ids.insert(0, id);
    kv.set(&User::analyses_key(user_id), &ids).await?;

    // Bump the owner's counters.
    if let Some(mut user) = kv.get::<User>(&User::key(user_id)).await? {
        user.total_analyses += 1;
        if threat_score > THREAT_SCORE_THRESHOLD {
            user.total_threats_detected += 1;
        }
        kv.set(&User::key(user_id), &user).await?;
    }

    tracing::info!(
        analysis_id = %id,
        user_id = %user_id,
        threat_score,
        "Analysis created"
    );
    Ok(analysis)
}

/// Fetch an analysis record, enforcing ownership: missing record → 404,
/// wrong owner → 403.
pub async fn find_by_id(
    kv: &KvStore,
    user_id: Uuid,
    analysis_id: Uuid,
) -> Result<FileAnalysis, AppError> {
    let analysis: FileAnalysis = kv
        .get(&FileAnalysis::key(analysis_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;

    if analysis.user_id != user_id {
        return Err(AppError::Forbidden(
            "Unauthorized access to analysis".to_string(),
        ));
    }

    Ok(analysis)
}

/// Resolve the owner's index list into records, newest first. Dangling
/// ids (deleted records) are skipped.
pub async fn history(kv: &KvStore, user_id: Uuid) -> Result<Vec<FileAnalysis>, AppError> {
    let ids: Vec<Uuid> = kv
        .get(&User::analyses_key(user_id))
        .await?
        .unwrap_or_default();

    let mut analyses = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(analysis) = kv.get::<FileAnalysis>(&FileAnalysis::key(id)).await? {
            analyses.push(analysis);
        }
    }
    Ok(analyses)
}

/// Delete an owned analysis record and remove it from the owner's index.
pub async fn delete(kv: &KvStore, user_id: Uuid, analysis_id: Uuid) -> Result<(), AppError> {
    find_by_id(kv, user_id, analysis_id).await?;

    kv.del(&FileAnalysis::key(analysis_id)).await?;

    let ids: Vec<Uuid> = kv
        .get(&User::analyses_key(user_id))
        .await?
        .unwrap_or_default();
    let remaining: Vec<Uuid> = ids.into_iter().filter(|id| *id != analysis_id).collect();
    kv.set(&User::analyses_key(user_id), &remaining).await?;

    tracing::info!(analysis_id = %analysis_id, "Analysis deleted");
    Ok(())
}

/// Apply a remediation action to an owned analysis record.
///
/// Overwrites status, date, and notes unconditionally; a repeated call
/// replaces the previous one (last write wins). Each call persists an
/// audit record.
pub async fn apply_action(
    kv: &KvStore,
    user_id: Uuid,
    analysis_id: Uuid,
    input: &ApplyActionRequest,
) -> Result<FileAnalysis, AppError> {
    let mut analysis = find_by_id(kv, user_id, analysis_id).await?;

    let now = Utc::now();
    analysis.action_status = input.action.into();
    analysis.action_date = Some(now);
    analysis.action_notes = input.notes.clone();
    kv.set(&FileAnalysis::key(analysis_id), &analysis).await?;

    let record = AnalysisActionRecord {
        id: Uuid::now_v7(),
        analysis_id,
        user_id,
        action_type: analysis.action_status,
        notes: input.notes.clone(),
        timestamp: now,
    };
    kv.set(&AnalysisActionRecord::key(record.id), &record).await?;

    tracing::info!(
        analysis_id = %analysis_id,
        action = %analysis.action_status,
        "Action applied"
    );
    Ok(analysis)
}

/// Owner's records whose action status equals `status`, a linear scan of
/// the index list.
pub async fn by_status(
    kv: &KvStore,
    user_id: Uuid,
    status: ActionStatus,
) -> Result<Vec<FileAnalysis>, AppError> {
    let analyses = history(kv, user_id).await?;
    Ok(analyses
        .into_iter()
        .filter(|a| a.action_status == status)
        .collect())
}
