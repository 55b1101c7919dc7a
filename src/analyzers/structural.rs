// Structural analyzer: the backing binary classifier over the fixed-order
// feature tuple, with an ordered strategy chain when the model degrades.

use crate::analyzers::{band_verdict, clamp_range, AnalysisContext, Analyzer, AnalyzerInput};
use crate::error::PipelineError;
use crate::features::FeatureVector;
use crate::types::{AnalyzerResult, Verdict};

pub struct StructuralAnalyzer;

const NAME: &str = "structural";

impl Analyzer for StructuralAnalyzer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext,
        input: &AnalyzerInput,
    ) -> Result<AnalyzerResult, PipelineError> {
        let features = input.features;
        let mut reasoning = structural_reasons(features);

        let confidence = ctx.model.and_then(|model| {
            let inputs = features.model_inputs();
            // Prediction strategies in preference order; first success wins.
            let probability = || model.predict_genuine(&inputs).map(|p| p * 100.0);
            let hard_label = || {
                model
                    .predict_label(&inputs)
                    .map(|genuine| if genuine { 85.0 } else { 15.0 })
            };
            let strategies: [&dyn Fn() -> Result<f64, PipelineError>; 2] =
                [&probability, &hard_label];
            strategies.iter().find_map(|strategy| strategy().ok())
        });

        let policy = &ctx.policy.structural;
        match confidence {
            Some(score) => {
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
                    features_analyzed: analyzed_tags(),
                })
            }
            None => {
                reasoning.insert(0, "Using fallback analysis - model not available".to_string());
                Ok(fallback_result(ctx, features, reasoning))
            }
        }
    }
}

// Rule-only scorer used when no model strategy succeeds.
fn fallback_result(
    ctx: &AnalysisContext,
    features: &FeatureVector,
    mut reasoning: Vec<String>,
) -> AnalyzerResult {
    let policy = &ctx.policy.structural;
    let mut score = policy.fallback_base;

    if features.length > 100 {
        score += 15.0;
        reasoning.push("Adequate text length".to_string());
    } else {
        score -= 10.0;
        reasoning.push("Short text length".to_string());
    }
    if features.fake_keywords > 2 {
        score -= features.fake_keywords as f64 * 5.0;
        reasoning.push(format!("Fake keywords detected: {}", features.fake_keywords));
    }
    if features.genuine_keywords > 2 {
        score += features.genuine_keywords as f64 * 3.0;
        reasoning.push(format!("Professional keywords: {}", features.genuine_keywords));
    }

    let score = clamp_range(score, policy.fallback_range);
    let prediction = if score >= policy.fallback_genuine_band {
        Verdict::Genuine
    } else if score >= policy.fallback_uncertain_band {
        Verdict::Uncertain
    } else {
        Verdict::Fake
    };

    AnalyzerResult {
        analyzer: NAME.to_string(),
        prediction,
        confidence: score,
        reasoning,
        features_analyzed: vec!["text_length".to_string(), "keywords".to_string()],
    }
}

fn structural_reasons(features: &FeatureVector) -> Vec<String> {
    let mut reasons = Vec::new();
    if features.fake_keywords > 2 {
        reasons.push(format!("High fake keyword count: {}", features.fake_keywords));
    }
    if features.has_urgency {
        reasons.push("Urgency tactics detected".to_string());
    }
    if features.has_money_promise {
        reasons.push("Money promises detected".to_string());
    }
    if features.has_whatsapp {
        reasons.push("Messaging-app contact method (suspicious)".to_string());
    }
    if features.has_mlm_terms {
        reasons.push("MLM/network marketing terms detected".to_string());
    }
    if features.genuine_keywords > 2 {
        reasons.push(format!("Professional keywords found: {}", features.genuine_keywords));
    }
    if features.has_company {
        reasons.push("Company information present".to_string());
    }
    if features.has_email {
        reasons.push("Professional email contact".to_string());
    }
    if features.word_count > 50 {
        reasons.push("Adequate job description length".to_string());
    }
    reasons
}

fn analyzed_tags() -> Vec<String> {
    ["keywords", "structure", "contact_methods", "text_quality"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use crate::features::extract_features;
    use crate::features::lexicon::Lexicons;
    use crate::models::{LinearModel, StructuralModel};

    fn ctx<'a>(
        policy: &'a Policy,
        lexicons: &'a Lexicons,
        model: Option<&'a dyn StructuralModel>,
    ) -> AnalysisContext<'a> {
        AnalysisContext { policy, lexicons, model }
    }

    fn constant_model(logit: f64) -> LinearModel {
        LinearModel {
            name: "constant".to_string(),
            weights: vec![0.0; 20],
            bias: logit,
            means: Vec::new(),
            scales: Vec::new(),
        }
    }

    #[test]
    fn confident_model_probability_maps_to_genuine() {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        // sigmoid(3) = 0.95 -> 95 -> genuine band, clamped to 85.
        let model = constant_model(3.0);
        let features = extract_features(&lexicons, "Lowongan kerja admin di PT Jaya, kirim lamaran.");
        let input = AnalyzerInput { text: "", features: &features, filename: None };
        let result = StructuralAnalyzer
            .analyze(&ctx(&policy, &lexicons, Some(&model)), &input)
            .unwrap();
        assert_eq!(result.prediction, Verdict::Genuine);
        assert_eq!(result.confidence, 85.0);
    }

    #[test]
    fn low_model_probability_maps_to_fake() {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        // sigmoid(-3) = 0.047 -> 4.7 -> fake band, clamped up to 15.
        let model = constant_model(-3.0);
        let features = extract_features(&lexicons, "Lowongan kerja admin di PT Jaya, kirim lamaran.");
        let input = AnalyzerInput { text: "", features: &features, filename: None };
        let result = StructuralAnalyzer
            .analyze(&ctx(&policy, &lexicons, Some(&model)), &input)
            .unwrap();
        assert_eq!(result.prediction, Verdict::Fake);
        assert_eq!(result.confidence, 15.0);
    }

    #[test]
    fn missing_model_uses_rule_fallback() {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        let text = "Lowongan kerja untuk posisi staff administrasi di PT Sentosa Makmur. \
                    Kualifikasi: pendidikan sarjana, pengalaman minimal dua tahun, memiliki \
                    sertifikat keahlian. Tunjangan kesehatan dan gaji kompetitif. Kirim \
                    lamaran lengkap untuk jadwal wawancara.";
        let features = extract_features(&lexicons, text);
        let input = AnalyzerInput { text, features: &features, filename: None };
        let result = StructuralAnalyzer.analyze(&ctx(&policy, &lexicons, None), &input).unwrap();
        assert!(result.reasoning.iter().any(|r| r.contains("fallback")));
        assert_eq!(result.prediction, Verdict::Genuine);
    }

    #[test]
    fn fallback_flags_scammy_text_as_fake() {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        let text = "buruan gratis jutaan langsung cepat mudah tanpa modal segera join";
        let features = extract_features(&lexicons, text);
        let input = AnalyzerInput { text, features: &features, filename: None };
        let result = StructuralAnalyzer.analyze(&ctx(&policy, &lexicons, None), &input).unwrap();
        assert_eq!(result.prediction, Verdict::Fake);
        assert!((0.0..=100.0).contains(&result.confidence));
    }
}
