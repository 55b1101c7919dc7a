// The document-to-verdict pipeline.
//
// `PipelineContext` is built once at startup and holds everything shared:
// the policy table, the keyword lists, the OCR probe result and the backing
// model handles. It is immutable after construction; concurrent requests
// may read it freely and each request's intermediate state is its own.

use std::time::Instant;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzers::{run_all, AnalysisContext, AnalyzerInput};
use crate::config::PipelineConfig;
use crate::ensemble::aggregate;
use crate::error::PipelineError;
use crate::features::label_hint::analyze_file_label;
use crate::features::lexicon::{analyze_keywords, KeywordAnalysis, Lexicons};
use crate::features::{extract_features, FeatureVector};
use crate::models::ModelSet;
use crate::ocr::engine::{extract_with_report, OcrEngine};
use crate::recommend::generate_recommendations;
use crate::types::{AnalyzerResult, EnsembleResult, ExtractionReport, Recommendation, Verdict};

/// Full classification payload returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub final_prediction: Verdict,
    pub final_confidence: f64,
    pub ensemble: EnsembleResult,
    pub analyzers: Vec<AnalyzerResult>,
    pub text_analysis: FeatureVector,
    pub recommendations: Vec<Recommendation>,
    pub extracted_text: String,
    pub filename: Option<String>,
    /// Present when the classification started from an image.
    pub extraction: Option<ExtractionReport>,
    pub timestamp: String,
}

/// Availability summary for the caller's health/status surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub models_loaded: usize,
    pub ocr_available: bool,
    pub ocr_version: Option<String>,
    pub status: String,
    pub model_load_log: Vec<String>,
    pub policy_version: u32,
}

pub struct PipelineContext {
    config: PipelineConfig,
    lexicons: Lexicons,
    ocr: OcrEngine,
    models: ModelSet,
}

impl PipelineContext {
    /// Probe the OCR engine, load models and lexicons. Failures here
    /// degrade capabilities instead of failing startup.
    pub fn new(config: PipelineConfig) -> Self {
        let lexicons = match &config.lexicon_path {
            Some(path) => match Lexicons::from_json_file(path) {
                Ok(lexicons) => lexicons,
                Err(err) => {
                    warn!(%err, "lexicon file rejected, using built-in lists");
                    Lexicons::default()
                }
            },
            None => Lexicons::default(),
        };
        let ocr = OcrEngine::probe(&config);
        let models = ModelSet::load(&config.model_dir);
        info!(
            ocr_available = ocr.is_available(),
            models_loaded = models.loaded_count(),
            "pipeline context ready"
        );
        Self { config, lexicons, ocr, models }
    }

    pub fn lexicons(&self) -> &Lexicons {
        &self.lexicons
    }

    /// Decode the uploaded bytes, run the OCR grid and report quality
    /// diagnostics. Sentinel outcomes (engine missing, no text) are data,
    /// not errors; only undecodable bytes fail.
    pub fn extract(
        &self,
        image_bytes: &[u8],
        filename: Option<&str>,
    ) -> Result<ExtractionReport, PipelineError> {
        let image = decode_image(image_bytes)?;
        let label = analyze_file_label(&self.config.policy.label_hint, filename);
        Ok(extract_with_report(&self.ocr, &image, label))
    }

    /// Feature derivation over caller-supplied text.
    pub fn analyze_text(&self, text: &str) -> FeatureVector {
        extract_features(&self.lexicons, text)
    }

    /// Keyword analysis summary alone, for the lightweight text endpoint.
    pub fn analyze_keywords(&self, text: &str) -> KeywordAnalysis {
        analyze_keywords(&self.lexicons, text)
    }

    /// Run the four analyzers and the ensemble over text.
    pub fn classify(&self, text: &str, filename: Option<&str>) -> ClassificationReport {
        self.classify_inner(text, filename, None)
    }

    /// Full document-to-verdict pipeline: image bytes in, verdict out.
    /// OCR degradation yields an empty-text classification, not a failure.
    pub fn classify_image(
        &self,
        image_bytes: &[u8],
        filename: Option<&str>,
    ) -> Result<ClassificationReport, PipelineError> {
        let image = decode_image(image_bytes)?;
        let label = analyze_file_label(&self.config.policy.label_hint, filename);
        let extraction = extract_with_report(&self.ocr, &image, label);
        let text = extraction.extracted.text().to_string();
        info!(chars = text.chars().count(), "classifying extracted text");
        Ok(self.classify_inner(&text, filename, Some(extraction)))
    }

    fn classify_inner(
        &self,
        text: &str,
        filename: Option<&str>,
        extraction: Option<ExtractionReport>,
    ) -> ClassificationReport {
        let start = Instant::now();
        let features = extract_features(&self.lexicons, text);
        let ctx = AnalysisContext {
            policy: &self.config.policy,
            lexicons: &self.lexicons,
            model: self.models.structural.as_deref(),
        };
        let input = AnalyzerInput { text, features: &features, filename };
        let analyzers = run_all(&ctx, &input);
        let ensemble = aggregate(&self.config.policy.ensemble, &analyzers, filename);
        let recommendations = generate_recommendations(&ensemble, &features);
        info!(
            prediction = ensemble.final_prediction.as_str(),
            confidence = ensemble.final_confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "classification complete"
        );

        ClassificationReport {
            final_prediction: ensemble.final_prediction,
            final_confidence: ensemble.final_confidence,
            analyzers,
            text_analysis: features,
            recommendations,
            extracted_text: text.to_string(),
            filename: filename.map(|s| s.to_string()),
            extraction,
            ensemble,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Recommendation assembly for callers holding an existing verdict.
    pub fn recommend(
        &self,
        ensemble: &EnsembleResult,
        features: &FeatureVector,
    ) -> Vec<Recommendation> {
        generate_recommendations(ensemble, features)
    }

    pub fn status(&self) -> PipelineStatus {
        let models_loaded = self.models.loaded_count();
        let ocr_available = self.ocr.is_available();
        let status = match (models_loaded > 0, ocr_available) {
            (true, true) => "Production Ready".to_string(),
            (true, false) | (false, true) => "Limited Mode".to_string(),
            (false, false) => "Compatibility Mode".to_string(),
        };
        PipelineStatus {
            models_loaded,
            ocr_available,
            ocr_version: self.ocr.version().map(|v| v.to_string()),
            status,
            model_load_log: self.models.load_log.clone(),
            policy_version: self.config.policy.version,
        }
    }
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    image::load_from_memory(bytes).map_err(|e| PipelineError::InvalidImageData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn offline_context() -> PipelineContext {
        let config = PipelineConfig {
            tesseract_paths: vec![PathBuf::from("/nonexistent/tesseract")],
            model_dir: PathBuf::from("/nonexistent/models"),
            ..PipelineConfig::default()
        };
        PipelineContext::new(config)
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let ctx = offline_context();
        let err = ctx.extract(b"definitely not an image", None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidImageData(_)));
    }

    #[test]
    fn classify_image_degrades_without_ocr() {
        let ctx = offline_context();
        let mut png = Vec::new();
        let img = image::DynamicImage::new_rgb8(32, 32);
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png).unwrap();

        let report = ctx.classify_image(&png, None).unwrap();
        assert!(report.extracted_text.is_empty());
        assert_ne!(report.final_prediction, Verdict::Error);
        let extraction = report.extraction.expect("extraction report present");
        assert!(!extraction.extracted.is_recovered());
    }

    #[test]
    fn status_reflects_degraded_environment() {
        let ctx = offline_context();
        let status = ctx.status();
        assert!(!status.ocr_available);
        assert_eq!(status.models_loaded, 0);
        assert_eq!(status.status, "Compatibility Mode");
    }
}
