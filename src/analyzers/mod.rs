// The four independent scorers.
//
// Every analyzer reads the same feature input and produces a verdict,
// a bounded confidence and its reasons. They run under a guard: a panic or
// error inside one analyzer becomes an `error` result that the ensemble
// excludes from voting, never an aborted request.

pub mod lexicon;
pub mod ocr_confidence;
pub mod quality;
pub mod structural;

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::config::Policy;
use crate::error::PipelineError;
use crate::features::lexicon::Lexicons;
use crate::features::FeatureVector;
use crate::models::StructuralModel;
use crate::types::{AnalyzerResult, Verdict};

/// Everything an analyzer may read. Shared immutably; nothing here is
/// mutated during a request.
pub struct AnalysisContext<'a> {
    pub policy: &'a Policy,
    pub lexicons: &'a Lexicons,
    pub model: Option<&'a dyn StructuralModel>,
}

pub struct AnalyzerInput<'a> {
    pub text: &'a str,
    pub features: &'a FeatureVector,
    pub filename: Option<&'a str>,
}

pub trait Analyzer {
    fn name(&self) -> &'static str;
    fn analyze(
        &self,
        ctx: &AnalysisContext,
        input: &AnalyzerInput,
    ) -> Result<AnalyzerResult, PipelineError>;
}

/// Run all four analyzers, converting any failure into an `error` result.
pub fn run_all(ctx: &AnalysisContext, input: &AnalyzerInput) -> Vec<AnalyzerResult> {
    let analyzers: [&dyn Analyzer; 4] = [
        &structural::StructuralAnalyzer,
        &lexicon::LexiconAnalyzer,
        &quality::QualityAnalyzer,
        &ocr_confidence::OcrConfidenceAnalyzer,
    ];

    analyzers
        .iter()
        .map(|analyzer| {
            let name = analyzer.name();
            match catch_unwind(AssertUnwindSafe(|| analyzer.analyze(ctx, input))) {
                Ok(Ok(result)) => {
                    debug!(
                        analyzer = name,
                        prediction = result.prediction.as_str(),
                        confidence = result.confidence,
                        "analyzer finished"
                    );
                    result
                }
                Ok(Err(err)) => {
                    warn!(analyzer = name, %err, "analyzer failed");
                    AnalyzerResult::error(name, format!("Analysis failed: {err}"))
                }
                Err(_) => {
                    warn!(analyzer = name, "analyzer panicked");
                    AnalyzerResult::error(name, "Analysis failed: internal panic".to_string())
                }
            }
        })
        .collect()
}

/// Clamp a confidence into an inclusive policy range.
pub(crate) fn clamp_range(value: f64, range: (f64, f64)) -> f64 {
    value.clamp(range.0, range.1)
}

/// Map a raw score onto the three-band verdict shape every analyzer uses:
/// high band genuine, low band fake, middle uncertain, with the confidence
/// re-clamped into the band's canonical range.
pub(crate) fn band_verdict(
    score: f64,
    genuine_band: f64,
    fake_band: f64,
    genuine_range: (f64, f64),
    fake_range: (f64, f64),
    uncertain_range: (f64, f64),
) -> (Verdict, f64) {
    if score >= genuine_band {
        (Verdict::Genuine, clamp_range(score, genuine_range))
    } else if score <= fake_band {
        (Verdict::Fake, clamp_range(score, fake_range))
    } else {
        (Verdict::Uncertain, clamp_range(score, uncertain_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;

    #[test]
    fn all_four_analyzers_report() {
        let policy = Policy::default();
        let lexicons = Lexicons::default();
        let ctx = AnalysisContext { policy: &policy, lexicons: &lexicons, model: None };
        let text = "Lowongan kerja PT Makmur, posisi admin. Kualifikasi: pengalaman 1 tahun. \
                    Kirim lamaran ke email hrd@makmur.co.id untuk wawancara.";
        let features = extract_features(&lexicons, text);
        let input = AnalyzerInput { text, features: &features, filename: None };
        let results = run_all(&ctx, &input);
        assert_eq!(results.len(), 4);
        for result in &results {
            assert!((0.0..=100.0).contains(&result.confidence), "{result:?}");
            assert!(!result.analyzer.is_empty());
        }
    }

    #[test]
    fn band_verdict_covers_all_bands() {
        let (v, c) = band_verdict(90.0, 70.0, 30.0, (70.0, 85.0), (15.0, 30.0), (31.0, 69.0));
        assert_eq!(v, Verdict::Genuine);
        assert_eq!(c, 85.0);
        let (v, c) = band_verdict(10.0, 70.0, 30.0, (70.0, 85.0), (15.0, 30.0), (31.0, 69.0));
        assert_eq!(v, Verdict::Fake);
        assert_eq!(c, 15.0);
        let (v, c) = band_verdict(50.0, 70.0, 30.0, (70.0, 85.0), (15.0, 30.0), (31.0, 69.0));
        assert_eq!(v, Verdict::Uncertain);
        assert_eq!(c, 50.0);
    }
}
