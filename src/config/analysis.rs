// src/config/analysis.rs
use serde::{Deserialize, Serialize};

use super::parse_or;

/// Tunables for the heuristic risk scorer. Defaults are the calibrated values the
/// dashboard shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub base_score: f32,
    /// Score returned for input with no text at all.
    pub empty_score: f32,
    pub min_score: f32,
    pub max_score: f32,
    pub verdict_threshold: f32,
    /// At or below this, credibility signals are reported as dominant.
    pub credible_ceiling: f32,
    pub deepfake_increment: f32,
    pub hype_increment: f32,
    pub credibility_decrement: f32,
    pub suspicious_terms_threshold: usize,
    pub compound_bonus: f32,
    pub long_text_chars: usize,
    pub long_text_penalty: f32,
    pub short_text_chars: usize,
    pub short_text_bonus: f32,
    /// Half-width of the symmetric random jitter.
    pub jitter: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            base_score: 0.35,
            empty_score: 0.30,
            min_score: 0.05,
            max_score: 0.95,
            verdict_threshold: 0.6,
            credible_ceiling: 0.45,
            deepfake_increment: 0.25,
            hype_increment: 0.10,
            credibility_decrement: 0.15,
            suspicious_terms_threshold: 3,
            compound_bonus: 0.08,
            long_text_chars: 1200,
            long_text_penalty: 0.05,
            short_text_chars: 220,
            short_text_bonus: 0.08,
            jitter: 0.075,
        }
    }
}

impl ScorerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(super::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let cfg = Self {
            base_score: parse_or(&lookup, "ANALYSIS_BASE_SCORE", d.base_score),
            empty_score: parse_or(&lookup, "ANALYSIS_EMPTY_SCORE", d.empty_score),
            min_score: parse_or(&lookup, "ANALYSIS_MIN_SCORE", d.min_score),
            max_score: parse_or(&lookup, "ANALYSIS_MAX_SCORE", d.max_score),
            verdict_threshold: parse_or(&lookup, "ANALYSIS_VERDICT_THRESHOLD", d.verdict_threshold),
            credible_ceiling: parse_or(&lookup, "ANALYSIS_CREDIBLE_CEILING", d.credible_ceiling),
            deepfake_increment: parse_or(&lookup, "ANALYSIS_DEEPFAKE_SCORE", d.deepfake_increment),
            hype_increment: parse_or(&lookup, "ANALYSIS_HYPE_SCORE", d.hype_increment),
            credibility_decrement: parse_or(
                &lookup,
                "ANALYSIS_CREDIBILITY_SCORE",
                d.credibility_decrement,
            ),
            suspicious_terms_threshold: parse_or(
                &lookup,
                "ANALYSIS_SUSPICIOUS_TERMS_THRESHOLD",
                d.suspicious_terms_threshold,
            ),
            compound_bonus: parse_or(&lookup, "ANALYSIS_COMPOUND_BONUS", d.compound_bonus),
            long_text_chars: parse_or(&lookup, "ANALYSIS_LONG_TEXT_CHARS", d.long_text_chars),
            long_text_penalty: parse_or(&lookup, "ANALYSIS_LONG_TEXT_PENALTY", d.long_text_penalty),
            short_text_chars: parse_or(&lookup, "ANALYSIS_SHORT_TEXT_CHARS", d.short_text_chars),
            short_text_bonus: parse_or(&lookup, "ANALYSIS_SHORT_TEXT_BONUS", d.short_text_bonus),
            jitter: parse_or(&lookup, "ANALYSIS_JITTER", d.jitter),
        };
        cfg.sanitized()
    }

    /// Non-finite values fall back to their defaults, the clamp range is kept
    /// ordered and the jitter non-negative. The scorer applies this to every
    /// config it is given.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        for (field, value, default) in [
            ("base_score", &mut self.base_score, d.base_score),
            ("empty_score", &mut self.empty_score, d.empty_score),
            ("min_score", &mut self.min_score, d.min_score),
            ("max_score", &mut self.max_score, d.max_score),
            ("verdict_threshold", &mut self.verdict_threshold, d.verdict_threshold),
            ("credible_ceiling", &mut self.credible_ceiling, d.credible_ceiling),
            ("deepfake_increment", &mut self.deepfake_increment, d.deepfake_increment),
            ("hype_increment", &mut self.hype_increment, d.hype_increment),
            (
                "credibility_decrement",
                &mut self.credibility_decrement,
                d.credibility_decrement,
            ),
            ("compound_bonus", &mut self.compound_bonus, d.compound_bonus),
            ("long_text_penalty", &mut self.long_text_penalty, d.long_text_penalty),
            ("short_text_bonus", &mut self.short_text_bonus, d.short_text_bonus),
            ("jitter", &mut self.jitter, d.jitter),
        ] {
            if !value.is_finite() {
                tracing::warn!(
                    field,
                    value = %value,
                    default,
                    "non-finite scorer value, using default"
                );
                *value = default;
            }
        }
        if self.min_score > self.max_score {
            std::mem::swap(&mut self.min_score, &mut self.max_score);
        }
        if self.jitter < 0.0 {
            self.jitter = 0.0;
        }
        self
    }

    /// Same calibration without jitter; scores become reproducible.
    pub fn deterministic(mut self) -> Self {
        self.jitter = 0.0;
        self
    }
}
