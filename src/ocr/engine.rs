// Text extraction via the external tesseract binary.
//
// One extraction call fans out over a grid: every usable image variant is
// run through every engine configuration, each candidate's cleaned text is
// scored, and the best candidate wins. The grid is exhaustive rather than
// first-success because segmentation modes behave very differently on
// screenshots; the policy caps total attempts since every cell is a
// blocking subprocess call.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::config::{OcrPolicy, PipelineConfig};
use crate::features::label_hint::LabelHint;
use crate::ocr::normalize::normalize;
use crate::ocr::preprocess::{preprocess_for_ocr, to_ocr_grayscale};
use crate::types::{ExtractedText, ExtractionCandidate, ExtractionReport};

/// One engine configuration: page segmentation mode x engine mode.
struct OcrConfig {
    name: &'static str,
    args: &'static [&'static str],
}

const OCR_CONFIGS: &[OcrConfig] = &[
    OcrConfig { name: "basic", args: &["--oem", "1", "--psm", "6"] },
    OcrConfig { name: "column", args: &["--oem", "1", "--psm", "4"] },
    OcrConfig { name: "full_page", args: &["--oem", "1", "--psm", "3"] },
    OcrConfig { name: "single_word", args: &["--oem", "1", "--psm", "8"] },
    OcrConfig { name: "single_line", args: &["--oem", "1", "--psm", "7"] },
    OcrConfig { name: "default", args: &["--oem", "3", "--psm", "6"] },
    OcrConfig { name: "legacy", args: &["--oem", "0", "--psm", "6"] },
    OcrConfig { name: "no_psm", args: &["--oem", "1"] },
];

/// Probe result plus everything needed to run the grid.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    binary: Option<PathBuf>,
    version: Option<String>,
    languages: String,
    policy: OcrPolicy,
}

impl OcrEngine {
    /// Probe the configured binary locations in order; the first one that
    /// answers `--version` is kept. A miss is recorded, not an error: the
    /// pipeline degrades to empty-text analysis.
    pub fn probe(config: &PipelineConfig) -> Self {
        for path in &config.tesseract_paths {
            // Skip nonexistent absolute paths without spawning; bare names
            // still go through PATH resolution.
            if path.is_absolute() && !path.exists() {
                continue;
            }
            match probe_version(path) {
                Some(version) => {
                    info!(path = %path.display(), %version, "tesseract located");
                    return Self {
                        binary: Some(path.clone()),
                        version: Some(version),
                        languages: config.languages.clone(),
                        policy: config.policy.ocr.clone(),
                    };
                }
                None => debug!(path = %path.display(), "tesseract probe failed"),
            }
        }
        warn!("tesseract not found at any configured path");
        Self {
            binary: None,
            version: None,
            languages: config.languages.clone(),
            policy: config.policy.ocr.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Run the full variant x config grid and keep the best candidate.
    pub fn extract(&self, image: &DynamicImage) -> ExtractedText {
        let Some(binary) = &self.binary else {
            return ExtractedText::OcrUnavailable;
        };

        let workdir = match tempfile::TempDir::new() {
            Ok(dir) => dir,
            Err(err) => {
                warn!(%err, "could not create OCR scratch directory");
                return ExtractedText::NoText;
            }
        };

        let mut best: Option<ExtractionCandidate> = None;
        let mut attempts = 0usize;

        'grid: for (variant_name, variant) in self.build_variants(image) {
            let input_path = workdir.path().join(format!("{variant_name}.png"));
            if let Err(err) = variant.save(&input_path) {
                warn!(variant = variant_name, %err, "could not write variant, skipping");
                continue;
            }

            for config in OCR_CONFIGS {
                if attempts >= self.policy.max_grid_attempts {
                    debug!(attempts, "OCR grid cap reached");
                    break 'grid;
                }
                attempts += 1;

                let raw = match self.run_tesseract(binary, &input_path, config) {
                    Some(text) => text,
                    None => continue,
                };
                let cleaned = normalize(&raw);
                let candidate = ExtractionCandidate::new(variant_name, config.name, cleaned);
                debug!(
                    variant = variant_name,
                    config = config.name,
                    chars = candidate.char_count,
                    words = candidate.word_count,
                    score = candidate.score,
                    "OCR candidate"
                );

                // Strictly greater keeps the first candidate on ties, so
                // repeated runs over stable OCR output select the same cell.
                let improves = candidate.char_count > 0
                    && best.as_ref().map_or(true, |b| candidate.score > b.score);
                if improves {
                    best = Some(candidate);
                }
                if let Some(b) = &best {
                    if b.score >= self.policy.good_enough_score {
                        debug!(score = b.score, "good-enough candidate, stopping grid early");
                        break 'grid;
                    }
                }
            }
        }

        match best {
            Some(candidate) => {
                info!(
                    variant = %candidate.variant,
                    config = %candidate.config,
                    score = candidate.score,
                    "OCR grid complete"
                );
                ExtractedText::Recovered(candidate)
            }
            None => ExtractedText::NoText,
        }
    }

    /// Build the image-variant set. A variant whose construction fails is
    /// dropped; the original always survives.
    fn build_variants(&self, image: &DynamicImage) -> Vec<(&'static str, DynamicImage)> {
        let mut variants: Vec<(&'static str, DynamicImage)> =
            vec![("original", image.clone())];

        if let Ok(rgb) = catch_unwind(AssertUnwindSafe(|| image.to_rgb8())) {
            variants.push(("rgb", DynamicImage::ImageRgb8(rgb)));
        }
        if let Ok(gray) =
            catch_unwind(AssertUnwindSafe(|| to_ocr_grayscale(image, &self.policy)))
        {
            variants.push(("grayscale", DynamicImage::ImageLuma8(gray)));
        }
        if let Ok(contrast) =
            catch_unwind(AssertUnwindSafe(|| preprocess_for_ocr(image, &self.policy)))
        {
            variants.push(("contrast", DynamicImage::ImageLuma8(contrast)));
        }

        variants
    }

    fn run_tesseract(&self, binary: &Path, input: &Path, config: &OcrConfig) -> Option<String> {
        let output = Command::new(binary)
            .arg(input)
            .arg("stdout")
            .args(["-l", &self.languages])
            .args(config.args)
            .output();
        match output {
            Ok(out) if out.status.success() => {
                Some(String::from_utf8_lossy(&out.stdout).into_owned())
            }
            Ok(out) => {
                debug!(
                    config = config.name,
                    status = %out.status,
                    "tesseract run failed"
                );
                None
            }
            Err(err) => {
                debug!(config = config.name, %err, "tesseract spawn failed");
                None
            }
        }
    }
}

fn probe_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    // Version banner lands on stderr for older releases, stdout for newer.
    let banner = if output.stdout.is_empty() { &output.stderr } else { &output.stdout };
    let first_line = String::from_utf8_lossy(banner).lines().next()?.trim().to_string();
    if first_line.is_empty() {
        None
    } else {
        Some(first_line)
    }
}

// Job-related terms boosting extraction trust when present.
const JOB_TERMS: &[&str] = &[
    "job", "position", "salary", "company", "apply", "work", "career", "employment",
    "hiring", "lowongan", "gaji", "kerja", "perusahaan", "lamaran",
];

/// Derive the quality diagnostics the caller surfaces with an extraction.
pub fn quality_report(
    extracted: ExtractedText,
    elapsed_ms: u64,
    label_analysis: LabelHint,
) -> ExtractionReport {
    let text = extracted.text().trim().to_string();
    let char_count = text.chars().count();
    let word_count = text.split_whitespace().count();

    let mut confidence: f64 = 0.0;
    let mut indicators = Vec::new();

    if char_count > 200 {
        confidence += 40.0;
        indicators.push("Adequate text length".to_string());
    } else if char_count > 100 {
        confidence += 30.0;
        indicators.push("Moderate text length".to_string());
    } else if char_count > 50 {
        confidence += 20.0;
        indicators.push("Short text length".to_string());
    } else {
        confidence += 10.0;
        indicators.push("Very short text - may need better OCR".to_string());
    }

    if word_count > 30 {
        confidence += 30.0;
        indicators.push("Rich vocabulary".to_string());
    } else if word_count > 15 {
        confidence += 20.0;
        indicators.push("Adequate vocabulary".to_string());
    } else if word_count > 5 {
        confidence += 10.0;
        indicators.push("Limited vocabulary".to_string());
    } else {
        indicators.push("Very few words - consider external OCR".to_string());
    }

    let text_lower = text.to_lowercase();
    let job_hits = JOB_TERMS.iter().filter(|t| text_lower.contains(*t)).count();
    if job_hits >= 3 {
        confidence += 20.0;
        indicators.push("Job-related content detected".to_string());
    } else if job_hits >= 1 {
        confidence += 10.0;
        indicators.push("Some job-related terms found".to_string());
    }

    let garbled = text
        .chars()
        .filter(|c| {
            !(c.is_alphanumeric()
                || c.is_whitespace()
                || "-_.,!?()@#$%&*+=/\\".contains(*c))
        })
        .count();
    if char_count > 0 && garbled as f64 > char_count as f64 * 0.1 {
        confidence -= 20.0;
        indicators.push("High garbled character ratio - external OCR recommended".to_string());
    } else if garbled > 0 {
        confidence -= 5.0;
        indicators.push("Some garbled characters detected".to_string());
    }

    confidence = confidence.clamp(10.0, 95.0);

    if char_count < 10 {
        confidence = 5.0;
        indicators.push("OCR extraction insufficient - manual review required".to_string());
    }

    let quality_recommendation = if confidence < 30.0 {
        Some("OCR quality very low - manual editing strongly recommended".to_string())
    } else if confidence < 70.0 {
        Some("Consider using external OCR services for better accuracy".to_string())
    } else if char_count < 50 {
        Some("Text too short - try external OCR for better results".to_string())
    } else if word_count < 10 {
        Some("Limited vocabulary detected - external OCR may help".to_string())
    } else {
        None
    };

    let needs_external_ocr = confidence < 70.0 || char_count < 50 || word_count < 10;

    ExtractionReport {
        extracted,
        confidence,
        quality_indicators: indicators,
        quality_recommendation,
        needs_external_ocr,
        processing_time_ms: elapsed_ms,
        label_analysis,
    }
}

/// Convenience wrapper timing a full extraction.
pub fn extract_with_report(
    engine: &OcrEngine,
    image: &DynamicImage,
    label_analysis: LabelHint,
) -> ExtractionReport {
    let start = Instant::now();
    let extracted = engine.extract(image);
    quality_report(extracted, start.elapsed().as_millis() as u64, label_analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable_engine() -> OcrEngine {
        let config = PipelineConfig {
            tesseract_paths: vec![PathBuf::from("/nonexistent/tesseract-binary")],
            ..PipelineConfig::default()
        };
        OcrEngine::probe(&config)
    }

    #[test]
    fn missing_binary_is_reported_not_fatal() {
        let engine = unavailable_engine();
        assert!(!engine.is_available());
        let img = DynamicImage::new_rgb8(64, 64);
        match engine.extract(&img) {
            ExtractedText::OcrUnavailable => {}
            other => panic!("expected OcrUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn candidate_score_is_chars_plus_three_words() {
        let candidate = ExtractionCandidate::new("original", "basic", "gaji lima juta".to_string());
        assert_eq!(candidate.char_count, 14);
        assert_eq!(candidate.word_count, 3);
        assert_eq!(candidate.score, 14 + 3 * 3);
    }

    #[test]
    fn quality_report_flags_empty_extraction() {
        let report = quality_report(ExtractedText::NoText, 12, LabelHint::none());
        assert_eq!(report.confidence, 5.0);
        assert!(report.needs_external_ocr);
        assert!(!report.extracted.is_recovered());
    }

    #[test]
    fn quality_report_rewards_rich_job_text() {
        let text = "Lowongan kerja PT Sentosa untuk posisi staff administrasi dengan gaji \
                    kompetitif. Kirim lamaran lengkap beserta CV anda melalui email resmi \
                    perusahaan kami sebelum akhir bulan. Kualifikasi minimal lulusan sarjana \
                    dengan pengalaman kerja dua tahun di bidang administrasi perkantoran.";
        let candidate = ExtractionCandidate::new("contrast", "basic", text.to_string());
        let report =
            quality_report(ExtractedText::Recovered(candidate), 80, LabelHint::none());
        assert!(report.confidence >= 70.0, "confidence {}", report.confidence);
        assert!(!report.needs_external_ocr);
        assert!(report.quality_recommendation.is_none());
    }

    #[test]
    fn configs_cover_at_least_six_modes() {
        assert!(OCR_CONFIGS.len() >= 6);
    }
}
