// Quality analyzer: scores document organization rather than content.
// Stands in for an image-based classifier by reading the structural
// assessments already derived from the text.

use crate::analyzers::{band_verdict, clamp_range, AnalysisContext, Analyzer, AnalyzerInput};
use crate::error::PipelineError;
use crate::features::LanguageQuality;
use crate::types::AnalyzerResult;

pub struct QualityAnalyzer;

const NAME: &str = "quality";

impl Analyzer for QualityAnalyzer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext,
        input: &AnalyzerInput,
    ) -> Result<AnalyzerResult, PipelineError> {
        let policy = &ctx.policy.quality;
        let features = input.features;
        let mut score = 0.0;
        let mut reasoning = Vec::new();

        if features.completeness_score >= policy.completeness_threshold {
            score += policy.completeness_bonus;
            reasoning.push("Well-organized content structure".to_string());
        } else {
            score += policy.completeness_penalty;
            reasoning.push("Poor content organization".to_string());
        }

        match features.language_quality {
            LanguageQuality::Excellent => {
                score += policy.language_excellent_bonus;
                reasoning.push("Excellent language quality".to_string());
            }
            LanguageQuality::Good => {
                score += policy.language_good_bonus;
                reasoning.push("Good language quality".to_string());
            }
            LanguageQuality::Fair => {
                score += policy.language_fair_bonus;
                reasoning.push("Fair language quality".to_string());
            }
            LanguageQuality::Poor => {
                score += policy.language_poor_penalty;
                reasoning.push("Poor language quality".to_string());
            }
        }

        let pattern_count = features.suspicious_patterns.len();
        if pattern_count == 0 {
            score += policy.clean_pattern_bonus;
            reasoning.push("No suspicious patterns detected".to_string());
        } else {
            score += policy.suspicious_pattern_step * pattern_count as f64;
            reasoning.push(format!("{pattern_count} suspicious patterns detected"));
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

        Ok(AnalyzerResult {
            analyzer: NAME.to_string(),
            prediction,
            confidence,
            reasoning,
            features_analyzed: ["structure", "language_quality", "visual_patterns"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }
}
