// src/detect.rs
//! Pending-item scanner: scores stored items and records the outcome.

use anyhow::Result;
use chrono::Utc;
use metrics::counter;
use serde::Serialize;

use crate::analyze::{AnalysisInput, RiskScorer, Verdict};
use crate::store::{ContentItem, ContentStore, ScanStatus, ScanUpdate, Severity};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub scanned: usize,
    pub suspected: usize,
}

/// Severity bands over the score. Items not suspected are always `low`.
pub fn severity_for(score: f32, verdict: Verdict) -> Severity {
    match verdict {
        Verdict::LikelyReal => Severity::Low,
        Verdict::DeepfakeSuspected if score >= 0.85 => Severity::Critical,
        Verdict::DeepfakeSuspected if score >= 0.75 => Severity::High,
        Verdict::DeepfakeSuspected => Severity::Medium,
    }
}

/// Score up to `batch_size` pending items, newest first.
///
/// Each item goes `pending → scanning → completed`. If the completed write
/// fails, the item is marked `failed` (best effort) and the error is returned.
pub async fn scan_pending(
    store: &dyn ContentStore,
    scorer: &RiskScorer,
    batch_size: usize,
) -> Result<ScanReport> {
    let items = store.pending_items(batch_size).await?;
    let mut report = ScanReport::default();

    for item in items {
        store
            .update_scan(&item.id, ScanUpdate::status(ScanStatus::Scanning))
            .await?;

        let update = score_item(&item, scorer);
        let suspected = update.is_misinformation == Some(true);

        if let Err(e) = store.update_scan(&item.id, update).await {
            tracing::error!(error = ?e, id = %item.id, "failed to store scan result");
            counter!("detect_failed_total").increment(1);
            if let Err(e2) = store
                .update_scan(&item.id, ScanUpdate::status(ScanStatus::Failed))
                .await
            {
                tracing::warn!(error = ?e2, id = %item.id, "could not mark item failed");
            }
            return Err(e);
        }

        report.scanned += 1;
        if suspected {
            report.suspected += 1;
        }
    }

    counter!("detect_scanned_total").increment(report.scanned as u64);
    tracing::info!(scanned = report.scanned, suspected = report.suspected, "scan finished");
    Ok(report)
}

fn score_item(item: &ContentItem, scorer: &RiskScorer) -> ScanUpdate {
    let result = scorer.analyze(&AnalysisInput {
        title: Some(item.title.clone()),
        description: item.description.clone(),
        content: item.content_text.clone(),
    });
    let suspected = result.verdict == Verdict::DeepfakeSuspected;
    ScanUpdate {
        scan_status: Some(ScanStatus::Completed),
        scanned_at: Some(Utc::now()),
        is_misinformation: Some(suspected),
        misinformation_confidence: Some(result.score),
        misinformation_type: Some(if suspected { "deepfake" } else { "authentic" }.to_string()),
        severity_level: Some(severity_for(result.score, result.verdict)),
    }
}
