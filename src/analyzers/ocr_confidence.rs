// OCR-confidence analyzer: scores how much the recovered text itself can
// be trusted, not what it says. Its failure path votes uncertain rather
// than guessing a polarity, so a broken trust signal never tilts the
// ensemble.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::analyzers::{band_verdict, clamp_range, AnalysisContext, Analyzer, AnalyzerInput};
use crate::error::PipelineError;
use crate::types::{AnalyzerResult, Verdict};

pub struct OcrConfidenceAnalyzer;

const NAME: &str = "ocr_confidence";

const JOB_TERMS: &[&str] =
    &["job", "work", "position", "salary", "company", "kerja", "gaji", "lowongan", "perusahaan"];

impl Analyzer for OcrConfidenceAnalyzer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext,
        input: &AnalyzerInput,
    ) -> Result<AnalyzerResult, PipelineError> {
        match catch_unwind(AssertUnwindSafe(|| score_extraction(ctx, input))) {
            Ok(result) => Ok(result),
            Err(_) => Ok(fallback_result(ctx, input.text)),
        }
    }
}

fn score_extraction(ctx: &AnalysisContext, input: &AnalyzerInput) -> AnalyzerResult {
    let policy = &ctx.policy.ocr_confidence;
    let features = input.features;
    let text_len = input.text.trim().chars().count();
    let mut score = 0.0;
    let mut reasoning = Vec::new();

    if text_len > 100 {
        score += policy.long_text_bonus;
        reasoning.push("Good text extraction quality".to_string());
    } else if text_len > 50 {
        score += policy.medium_text_bonus;
        reasoning.push("Moderate text extraction".to_string());
    } else {
        score += policy.short_text_penalty;
        reasoning.push("Poor text extraction quality".to_string());
    }

    if features.word_count > 20 {
        score += policy.rich_words_bonus;
        reasoning.push("Sufficient readable content".to_string());
    } else {
        score += policy.few_words_penalty;
        reasoning.push("Limited readable content".to_string());
    }

    if features.professional_word_count >= 3 {
        score += policy.professional_bonus;
        reasoning.push("Professional terms clearly extracted".to_string());
    } else {
        score += policy.unprofessional_penalty;
        reasoning.push("Limited professional vocabulary extracted".to_string());
    }

    if features.essential_elements.contact_info {
        score += policy.contact_bonus;
        reasoning.push("Contact information successfully extracted".to_string());
    } else {
        score += policy.no_contact_penalty;
        reasoning.push("Missing contact information".to_string());
    }

    let score = clamp_range(score + policy.base, policy.raw_range);
    let (prediction, confidence) = band_verdict(
        score,
        policy.genuine_band,
        policy.fake_band,
        policy.genuine_range,
        policy.fake_range,
        policy.uncertain_range,
    );
    match prediction {
        Verdict::Genuine => {
            reasoning.push("High OCR confidence suggests genuine document".to_string())
        }
        Verdict::Fake => reasoning
            .push("Low OCR confidence may indicate fake or poor quality document".to_string()),
        _ => reasoning.push("Moderate OCR confidence - uncertain classification".to_string()),
    }

    AnalyzerResult {
        analyzer: NAME.to_string(),
        prediction,
        confidence,
        reasoning,
        features_analyzed: ["extraction_quality", "readability", "completeness"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

// Trust cannot be assessed at all: answer uncertain, never a polarity.
fn fallback_result(ctx: &AnalysisContext, text: &str) -> AnalyzerResult {
    let policy = &ctx.policy.ocr_confidence;
    let mut score = 60.0;
    let mut reasoning = vec!["Using fallback OCR analysis".to_string()];

    let text_len = text.trim().chars().count();
    if text_len > 50 {
        score += 15.0;
        reasoning.push("Readable text extracted".to_string());
    } else if text_len > 20 {
        score += 5.0;
        reasoning.push("Some text extracted".to_string());
    } else {
        score -= 5.0;
        reasoning.push("Limited text extracted".to_string());
    }

    let text_lower = text.to_lowercase();
    if JOB_TERMS.iter().any(|t| text_lower.contains(t)) {
        score += 10.0;
        reasoning.push("Job-related terms detected".to_string());
    }
    reasoning.push("Fallback analysis - uncertain classification due to limited data".to_string());

    AnalyzerResult {
        analyzer: NAME.to_string(),
        prediction: Verdict::Uncertain,
        confidence: clamp_range(score, policy.fallback_range),
        reasoning,
        features_analyzed: ["text_length", "basic_keywords"].iter().map(|s| s.to_string()).collect(),
    }
}
