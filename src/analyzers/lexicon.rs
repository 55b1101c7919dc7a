// Lexicon analyzer: the explainable stand-in for the text-vectorizer
// classifier. Order matters here: the filename label hint and the salary
// tier move the score before any keyword evidence is weighed.

use crate::analyzers::{band_verdict, clamp_range, AnalysisContext, Analyzer, AnalyzerInput};
use crate::error::PipelineError;
use crate::features::label_hint::analyze_file_label;
use crate::features::lexicon::Lexicons;
use crate::features::salary::SalaryRiskTier;
use crate::types::AnalyzerResult;

pub struct LexiconAnalyzer;

const NAME: &str = "lexicon";

/// Sentences needed before the text counts as structured.
const STRUCTURED_SENTENCES: usize = 3;

impl Analyzer for LexiconAnalyzer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext,
        input: &AnalyzerInput,
    ) -> Result<AnalyzerResult, PipelineError> {
        let policy = &ctx.policy.lexicon;
        let features = input.features;
        let text_lower = input.text.to_lowercase();
        let mut score = policy.base;
        let mut reasoning = Vec::new();

        // Label hint first: curated data may carry the ground truth in the
        // path, and it should outweigh heuristic uncertainty.
        let label = analyze_file_label(&ctx.policy.label_hint, input.filename);
        if label.confidence_boost != 0.0 {
            score += label.confidence_boost;
            reasoning.push(label.reasoning.clone());
            reasoning.push(format!("Label confidence adjustment: {:+.0}", label.confidence_boost));
        }

        // Salary red flags next; unrealistic compensation is the strongest
        // single fraud signal this analyzer sees.
        let salary = &features.salary;
        if salary.found {
            let penalty = match salary.tier {
                SalaryRiskTier::Critical => policy.salary_penalty_critical,
                SalaryRiskTier::High => policy.salary_penalty_high,
                SalaryRiskTier::Medium => policy.salary_penalty_medium,
                SalaryRiskTier::None => 0.0,
            };
            score += penalty;
            match salary.tier {
                SalaryRiskTier::Critical => reasoning.push(format!(
                    "Unrealistically high salary ({} million) - major red flag",
                    salary.amount
                )),
                SalaryRiskTier::High => reasoning
                    .push("Suspicious salary pattern detected - common in fake jobs".to_string()),
                SalaryRiskTier::Medium => {
                    reasoning.push("Salary range offered - be extra careful".to_string())
                }
                SalaryRiskTier::None => {}
            }
        }

        let genuine_count = Lexicons::count_hits(&ctx.lexicons.genuine_terms, &text_lower);
        let fake_count = Lexicons::count_hits(&ctx.lexicons.fake_terms, &text_lower);

        if genuine_count > fake_count && genuine_count >= 2 {
            let step = (genuine_count as f64 * policy.strong_genuine_step)
                .min(policy.strong_genuine_step_cap);
            score += policy.strong_genuine_bonus + step;
            reasoning.push(format!(
                "Strong genuine keywords ({genuine_count}) vs fake keywords ({fake_count})"
            ));
        } else if fake_count > genuine_count && fake_count >= 2 {
            let step =
                (fake_count as f64 * policy.strong_fake_step).max(policy.strong_fake_step_cap);
            score += policy.strong_fake_penalty + step;
            reasoning.push(format!(
                "High fake keyword count ({fake_count}) vs genuine keywords ({genuine_count})"
            ));
        } else if genuine_count == fake_count && genuine_count > 0 {
            score += policy.equal_keywords_bonus;
            reasoning.push(format!(
                "Equal keyword indicators (genuine: {genuine_count}, fake: {fake_count})"
            ));
        } else if genuine_count > 0 {
            score += policy.genuine_only_bonus;
            reasoning.push(format!(
                "Genuine keywords present ({genuine_count}) with minimal fake indicators ({fake_count})"
            ));
        } else if fake_count > 0 {
            score += policy.fake_only_penalty;
            reasoning.push(format!(
                "Fake keywords detected ({fake_count}) with no genuine indicators"
            ));
        } else {
            score += policy.no_keywords_bonus;
            reasoning.push("No clear keyword indicators found".to_string());
        }

        if features.sentence_count >= STRUCTURED_SENTENCES {
            score += policy.structure_bonus;
            reasoning.push("Well-structured text with multiple sentences".to_string());
        } else {
            score += policy.structure_penalty;
            reasoning.push("Poor text structure".to_string());
        }

        let has_contact = ctx
            .lexicons
            .contact_indicators
            .iter()
            .any(|indicator| text_lower.contains(indicator.as_str()));
        if has_contact {
            score += policy.contact_bonus;
            reasoning.push("Contact information provided".to_string());
        } else {
            score += policy.contact_penalty;
            reasoning.push("No clear contact information".to_string());
        }

        // Pin extreme totals to the band edges before the verdict mapping;
        // mid-range totals stay inside the uncertain corridor.
        let score = if score >= policy.pre_clamp_high {
            score.min(policy.pre_clamp_cap)
        } else if score <= policy.pre_clamp_low {
            score.max(policy.pre_clamp_floor)
        } else {
            clamp_range(score, (policy.pre_clamp_low + 1.0, policy.pre_clamp_high - 1.0))
        };

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
            features_analyzed: ["keywords", "structure", "contact_info"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use crate::features::extract_features;
    use crate::types::Verdict;

    fn run(text: &str, filename: Option<&str>) -> AnalyzerResult {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        let ctx = AnalysisContext { policy: &policy, lexicons: &lexicons, model: None };
        let features = extract_features(&lexicons, text);
        let input = AnalyzerInput { text, features: &features, filename };
        LexiconAnalyzer.analyze(&ctx, &input).unwrap()
    }

    #[test]
    fn professional_posting_reads_genuine() {
        let text = "PT Sentosa membuka lowongan posisi staff administrasi. Kualifikasi: \
                    pendidikan sarjana dengan pengalaman minimal dua tahun. Tunjangan \
                    kesehatan dan gaji kompetitif tersedia. Kirim lamaran ke email \
                    hrd@sentosa.co.id untuk jadwal wawancara.";
        let result = run(text, None);
        assert_eq!(result.prediction, Verdict::Genuine);
        assert!(result.confidence >= 85.0);
    }

    #[test]
    fn scam_posting_reads_fake() {
        let text = "GAJI BESAR JUTAAN!! kerja dari rumah tanpa pengalaman, dijamin untung, \
                    buruan join, modal kecil, klik iklan dapat uang";
        let result = run(text, None);
        assert_eq!(result.prediction, Verdict::Fake);
        assert!(result.confidence <= 15.0);
    }

    #[test]
    fn fake_filename_label_drags_score_down() {
        let text = "Informasi jadwal kegiatan kantor minggu depan tersedia di papan \
                    pengumuman lantai dua.";
        let neutral = run(text, None);
        let labeled = run(text, Some("dataset/fake/sample003.jpg"));
        assert!(labeled.confidence < neutral.confidence);
        assert!(labeled.reasoning.iter().any(|r| r.contains("fake indicators")));
    }

    #[test]
    fn salary_tier_applies_before_keywords() {
        let clean = run("Lowongan posisi kasir, kirim lamaran dan cv ke kantor kami segera.", None);
        let salaried = run(
            "Lowongan posisi kasir, gaji fantastis menanti, kirim lamaran dan cv ke kantor \
             kami segera.",
            None,
        );
        assert!(salaried.confidence <= clean.confidence);
        assert!(salaried.reasoning.iter().any(|r| r.contains("salary")));
    }

    #[test]
    fn confidence_always_bounded() {
        for text in ["", "x", "gaji 99 juta rp 99 juta dijamin!!", "lowongan kerja biasa"] {
            let result = run(text, Some("dataset/fake/fraud_scam_hoax.png"));
            assert!((0.0..=100.0).contains(&result.confidence), "{result:?}");
        }
    }
}
