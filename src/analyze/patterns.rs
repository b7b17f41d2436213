//! Indicator pattern sets used by the risk scorer.
//!
//! Each indicator keeps its pattern source next to the compiled regex so the
//! scorer can hand matched sources back to the UI for highlighting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which way an indicator pushes the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Deepfake,
    Hype,
    Credibility,
}

#[derive(Debug)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub source: &'static str,
    re: Regex,
}

impl Indicator {
    fn new(kind: IndicatorKind, source: &'static str) -> Self {
        let re = Regex::new(&format!("(?i){source}")).expect("indicator regex");
        Self { kind, source, re }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

const DEEPFAKE: &[&str] = &[
    r"deepfake",
    r"ai[-\s]?generated",
    r"morphed",
    r"lip[-\s]?sync",
    r"fake video",
    r"synthetic",
    r"voice clone",
    r"spoofed",
];

const HYPE: &[&str] = &[
    r"viral",
    r"rumou?r",
    r"unverified",
    r"claims?",
    r"leaked",
    r"shocking",
    r"forwarded",
];

const CREDIBILITY: &[&str] = &[
    r"election commission",
    r"official",
    r"fact ?check",
    r"verified",
    r"press release",
    r"spokesperson",
];

/// All indicators in scan order: deepfake, hype, credibility.
pub static INDICATORS: Lazy<Vec<Indicator>> = Lazy::new(|| {
    let build = |kind, set: &[&'static str]| {
        set.iter()
            .map(move |s| Indicator::new(kind, *s))
            .collect::<Vec<_>>()
    };
    let mut all = build(IndicatorKind::Deepfake, DEEPFAKE);
    all.extend(build(IndicatorKind::Hype, HYPE));
    all.extend(build(IndicatorKind::Credibility, CREDIBILITY));
    all
});
