// src/analyze/mod.rs
//! Heuristic content-risk scorer.
//!
//! Cheap and explainable: a base score nudged by lexical indicator matches, a
//! length adjustment, a bonus when several signals stack up, and a little random
//! jitter standing in for model uncertainty. Every constant lives in
//! [`ScorerConfig`].
//!
//! The scorer is total: any input, including all-empty text, yields a result.

pub mod jitter;
pub mod patterns;

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub use crate::config::ScorerConfig;
pub use jitter::{FixedJitter, Jitter, NoJitter, UniformJitter};
use patterns::{IndicatorKind, INDICATORS};

pub const REASON_EMPTY: &str = "No content provided";
pub const REASON_SUSPECTED: &str = "Multiple deepfake/hype indicators detected";
pub const REASON_CREDIBLE: &str = "Credibility signals outweigh suspected indicators";
pub const REASON_MIXED: &str = "Mixed indicators found; monitor closely";

/// Text fields of one piece of content. Any subset may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl AnalysisInput {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self {
            title: Some(text.into()),
            ..Default::default()
        }
    }

    fn joined(&self) -> String {
        format!(
            "{} {} {}",
            self.title.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
            self.content.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    DeepfakeSuspected,
    LikelyReal,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::DeepfakeSuspected => "deepfake_suspected",
            Verdict::LikelyReal => "likely_real",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Rounded to two decimals.
    pub score: f32,
    pub reasons: Vec<String>,
    pub highlighted_terms: Vec<String>,
}

/// Scores text with a fixed calibration and a jitter source.
#[derive(Clone)]
pub struct RiskScorer {
    config: ScorerConfig,
    jitter: Arc<dyn Jitter>,
}

impl std::fmt::Debug for RiskScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

impl RiskScorer {
    /// Scorer with uniform random jitter.
    pub fn new(config: ScorerConfig) -> Self {
        Self::with_jitter(config, UniformJitter)
    }

    pub fn with_jitter(config: ScorerConfig, jitter: impl Jitter + 'static) -> Self {
        Self {
            config: config.sanitized(),
            jitter: Arc::new(jitter),
        }
    }

    /// Reproducible scorer: same calibration, zero jitter.
    pub fn deterministic(config: ScorerConfig) -> Self {
        Self::with_jitter(config, NoJitter)
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        let cfg = &self.config;
        let text = input.joined();

        if text.is_empty() {
            return AnalysisResult {
                verdict: Verdict::LikelyReal,
                score: round2(cfg.empty_score),
                reasons: vec![REASON_EMPTY.to_string()],
                highlighted_terms: Vec::new(),
            };
        }

        let mut score = cfg.base_score;
        let mut highlighted: Vec<String> = Vec::new();

        for ind in INDICATORS.iter().filter(|i| i.is_match(&text)) {
            score += match ind.kind {
                IndicatorKind::Deepfake => cfg.deepfake_increment,
                IndicatorKind::Hype => cfg.hype_increment,
                IndicatorKind::Credibility => -cfg.credibility_decrement,
            };
            highlighted.push(ind.source.to_string());
        }

        let len = text.chars().count();
        if len > cfg.long_text_chars {
            score -= cfg.long_text_penalty;
        } else if len < cfg.short_text_chars {
            score += cfg.short_text_bonus;
        }

        let distinct = highlighted.iter().collect::<HashSet<_>>().len();
        if distinct >= cfg.suspicious_terms_threshold {
            score += cfg.compound_bonus;
        }

        score += self.jitter.offset(cfg.jitter);
        let score = score.clamp(cfg.min_score, cfg.max_score);

        let verdict = if score >= cfg.verdict_threshold {
            Verdict::DeepfakeSuspected
        } else {
            Verdict::LikelyReal
        };

        let reason = match verdict {
            Verdict::DeepfakeSuspected => REASON_SUSPECTED,
            Verdict::LikelyReal if score <= cfg.credible_ceiling => REASON_CREDIBLE,
            Verdict::LikelyReal => REASON_MIXED,
        };

        counter!("analysis_verdicts_total", "verdict" => verdict.as_str()).increment(1);

        AnalysisResult {
            verdict,
            score: round2(score),
            reasons: vec![reason.to_string()],
            highlighted_terms: highlighted,
        }
    }
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RiskScorer {
        RiskScorer::deterministic(ScorerConfig::default())
    }

    #[test]
    fn whitespace_only_is_empty() {
        let input = AnalysisInput {
            title: Some("   ".into()),
            description: Some("\n\t".into()),
            content: None,
        };
        let r = scorer().analyze(&input);
        assert_eq!(r.verdict, Verdict::LikelyReal);
        assert!((r.score - 0.30).abs() < 1e-6);
        assert_eq!(r.reasons, vec![REASON_EMPTY]);
        assert!(r.highlighted_terms.is_empty());
    }

    #[test]
    fn neutral_short_text_gets_short_bonus_only() {
        // 0.35 base + 0.08 short bonus
        let r = scorer().analyze(&AnalysisInput::content("Turnout figures for the morning"));
        assert!((r.score - 0.43).abs() < 1e-6, "score = {}", r.score);
        assert_eq!(r.reasons, vec![REASON_CREDIBLE]);
        assert!(r.highlighted_terms.is_empty());
    }

    #[test]
    fn long_text_gets_penalty() {
        let body = "Polling stations opened on schedule across the district. ".repeat(30);
        let r = scorer().analyze(&AnalysisInput::content(body));
        // 0.35 base - 0.05 long penalty
        assert!((r.score - 0.30).abs() < 1e-6, "score = {}", r.score);
    }

    #[test]
    fn mixed_band_reason() {
        // 0.35 + 0.10 (viral) + 0.08 short = 0.53
        let r = scorer().analyze(&AnalysisInput::title("Viral post about polling booths"));
        assert_eq!(r.verdict, Verdict::LikelyReal);
        assert_eq!(r.reasons, vec![REASON_MIXED]);
        assert_eq!(r.highlighted_terms, vec!["viral".to_string()]);
    }

    #[test]
    fn result_serializes_with_camel_case_terms() {
        let r = scorer().analyze(&AnalysisInput::title("Deepfake"));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["verdict"], "deepfake_suspected");
        assert!(v.get("highlightedTerms").is_some());
    }

    #[test]
    fn non_finite_bounds_do_not_break_scoring() {
        let cfg = ScorerConfig::from_lookup(|k| match k {
            "ANALYSIS_MIN_SCORE" => Some("NaN".into()),
            "ANALYSIS_JITTER" => Some("0".into()),
            _ => None,
        });
        let r = RiskScorer::new(cfg).analyze(&AnalysisInput::title("viral"));
        assert!((r.score - 0.53).abs() < 1e-6, "score = {}", r.score);

        let literal = ScorerConfig {
            max_score: f32::NAN,
            ..ScorerConfig::default()
        };
        let r = RiskScorer::deterministic(literal).analyze(&AnalysisInput::title("viral"));
        assert_eq!(r.verdict, Verdict::LikelyReal);
        assert!(r.score.is_finite());
    }
}
