// Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Verdict emitted by each analyzer and by the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Fake,
    Genuine,
    Uncertain,
    Error,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "fake",
            Verdict::Genuine => "genuine",
            Verdict::Uncertain => "uncertain",
            Verdict::Error => "error",
        }
    }
}

/// One analyzer's output: a verdict, a bounded confidence and the reasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub analyzer: String,
    pub prediction: Verdict,
    /// Always within [0, 100].
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub features_analyzed: Vec<String>,
}

impl AnalyzerResult {
    pub fn error(analyzer: &str, message: String) -> Self {
        Self {
            analyzer: analyzer.to_string(),
            prediction: Verdict::Error,
            confidence: 0.0,
            reasoning: vec![message],
            features_analyzed: Vec::new(),
        }
    }
}

/// Per-class vote counts across the analyzers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub fake: usize,
    pub genuine: usize,
    pub uncertain: usize,
}

/// Per-class mean confidence across the analyzers that voted for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassAverages {
    pub fake: f64,
    pub genuine: f64,
    pub uncertain: f64,
}

/// Analyzers voting for a class with conviction above the policy bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrongIndicators {
    pub fake: usize,
    pub genuine: usize,
}

/// Fused verdict across all analyzers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub final_prediction: Verdict,
    /// Within [0, 100]; 0 only for the all-analyzers-failed error case.
    pub final_confidence: f64,
    pub reasoning_summary: Vec<String>,
    pub votes: VoteTally,
    pub average_confidence: ClassAverages,
    pub strong_indicators: StrongIndicators,
}

/// Actionable guidance derived from the verdict and detected issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub suggestions: Vec<String>,
}

/// One OCR attempt: image variant x engine config and what it recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionCandidate {
    pub variant: String,
    pub config: String,
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub score: usize,
}

impl ExtractionCandidate {
    /// Score is a pure function of the recovered text.
    pub fn new(variant: &str, config: &str, text: String) -> Self {
        let char_count = text.trim().chars().count();
        let word_count = text.split_whitespace().count();
        Self {
            variant: variant.to_string(),
            config: config.to_string(),
            score: char_count + 3 * word_count,
            text,
            char_count,
            word_count,
        }
    }
}

/// Outcome of the grid search: the winning candidate, or a sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedText {
    Recovered(ExtractionCandidate),
    /// Grid exhausted with zero usable characters.
    NoText,
    /// The OCR binary could not be located; distinct from `NoText`.
    OcrUnavailable,
}

impl ExtractedText {
    pub fn text(&self) -> &str {
        match self {
            ExtractedText::Recovered(c) => &c.text,
            _ => "",
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, ExtractedText::Recovered(_))
    }
}

/// Extraction plus the quality diagnostics the caller surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub extracted: ExtractedText,
    /// OCR trust score in [5, 95] derived from text quality bands.
    pub confidence: f64,
    pub quality_indicators: Vec<String>,
    pub quality_recommendation: Option<String>,
    pub needs_external_ocr: bool,
    pub processing_time_ms: u64,
    pub label_analysis: crate::features::label_hint::LabelHint,
}
