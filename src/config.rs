// Policy table and runtime configuration.
//
// Every band boundary, contribution weight and cascade threshold used by the
// analyzers and the ensemble lives here under a name, so tests assert against
// named constants instead of inline literals. `Policy::default()` holds the
// canonical values; a deployment can override them from a TOML file.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub version: u32,
    pub ocr: OcrPolicy,
    pub structural: StructuralPolicy,
    pub lexicon: LexiconPolicy,
    pub quality: QualityPolicy,
    pub ocr_confidence: OcrConfidencePolicy,
    pub label_hint: LabelHintPolicy,
    pub ensemble: EnsemblePolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION,
            ocr: OcrPolicy::default(),
            structural: StructuralPolicy::default(),
            lexicon: LexiconPolicy::default(),
            quality: QualityPolicy::default(),
            ocr_confidence: OcrConfidencePolicy::default(),
            label_hint: LabelHintPolicy::default(),
            ensemble: EnsemblePolicy::default(),
        }
    }
}

impl Policy {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading policy file {}", path.display()))?;
        let policy: Policy =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(policy)
    }
}

/// Bounds on the variant x config OCR grid search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPolicy {
    /// Images narrower than this are upscaled (cubic) before thresholding.
    pub min_width: u32,
    /// Hard cap on OCR invocations per request; the grid is cost-unbounded
    /// otherwise since every cell is a blocking subprocess call.
    pub max_grid_attempts: usize,
    /// Stop the grid early once a candidate reaches this score.
    pub good_enough_score: usize,
}

impl Default for OcrPolicy {
    fn default() -> Self {
        Self {
            min_width: 1200,
            max_grid_attempts: 32,
            good_enough_score: 1500,
        }
    }
}

/// Bands for the structural (model-backed) analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralPolicy {
    /// Model probability x100 at or above this is a genuine verdict.
    pub genuine_band: f64,
    /// At or below this, fake. Between the two, uncertain.
    pub fake_band: f64,
    pub genuine_range: (f64, f64),
    pub fake_range: (f64, f64),
    pub uncertain_range: (f64, f64),
    // Rule-only fallback when the model is unavailable.
    pub fallback_base: f64,
    pub fallback_genuine_band: f64,
    pub fallback_uncertain_band: f64,
    pub fallback_range: (f64, f64),
}

impl Default for StructuralPolicy {
    fn default() -> Self {
        Self {
            genuine_band: 70.0,
            fake_band: 30.0,
            genuine_range: (70.0, 85.0),
            fake_range: (15.0, 30.0),
            uncertain_range: (31.0, 69.0),
            fallback_base: 60.0,
            fallback_genuine_band: 75.0,
            fallback_uncertain_band: 45.0,
            fallback_range: (25.0, 90.0),
        }
    }
}

/// Scoring weights and bands for the lexicon analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconPolicy {
    /// Starting score before any signal is applied.
    pub base: f64,
    pub salary_penalty_critical: f64,
    pub salary_penalty_high: f64,
    pub salary_penalty_medium: f64,
    pub strong_genuine_bonus: f64,
    pub strong_genuine_step: f64,
    pub strong_genuine_step_cap: f64,
    pub strong_fake_penalty: f64,
    pub strong_fake_step: f64,
    pub strong_fake_step_cap: f64,
    pub equal_keywords_bonus: f64,
    pub genuine_only_bonus: f64,
    pub fake_only_penalty: f64,
    pub no_keywords_bonus: f64,
    pub structure_bonus: f64,
    pub structure_penalty: f64,
    pub contact_bonus: f64,
    pub contact_penalty: f64,
    /// Scores at or above the pre-clamp high band are pinned near the top,
    /// at or below the low band near the bottom, before the verdict bands.
    pub pre_clamp_high: f64,
    pub pre_clamp_low: f64,
    pub pre_clamp_cap: f64,
    pub pre_clamp_floor: f64,
    pub genuine_band: f64,
    pub fake_band: f64,
    pub genuine_range: (f64, f64),
    pub fake_range: (f64, f64),
    pub uncertain_range: (f64, f64),
}

impl Default for LexiconPolicy {
    fn default() -> Self {
        Self {
            base: 90.0,
            salary_penalty_critical: -35.0,
            salary_penalty_high: -25.0,
            salary_penalty_medium: -15.0,
            strong_genuine_bonus: 35.0,
            strong_genuine_step: 5.0,
            strong_genuine_step_cap: 20.0,
            strong_fake_penalty: -25.0,
            strong_fake_step: -3.0,
            strong_fake_step_cap: -15.0,
            equal_keywords_bonus: 15.0,
            genuine_only_bonus: 25.0,
            fake_only_penalty: -15.0,
            no_keywords_bonus: 5.0,
            structure_bonus: 20.0,
            structure_penalty: -10.0,
            contact_bonus: 25.0,
            contact_penalty: -15.0,
            pre_clamp_high: 80.0,
            pre_clamp_low: 20.0,
            pre_clamp_cap: 85.0,
            pre_clamp_floor: 15.0,
            genuine_band: 85.0,
            fake_band: 15.0,
            genuine_range: (85.0, 90.0),
            fake_range: (10.0, 15.0),
            uncertain_range: (16.0, 84.0),
        }
    }
}

/// Bands for the quality-heuristic ("visual" proxy) analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    pub base: f64,
    pub completeness_threshold: f64,
    pub completeness_bonus: f64,
    pub completeness_penalty: f64,
    pub language_excellent_bonus: f64,
    pub language_good_bonus: f64,
    pub language_fair_bonus: f64,
    pub language_poor_penalty: f64,
    pub clean_pattern_bonus: f64,
    pub suspicious_pattern_step: f64,
    pub raw_range: (f64, f64),
    pub genuine_band: f64,
    pub fake_band: f64,
    pub genuine_range: (f64, f64),
    pub fake_range: (f64, f64),
    pub uncertain_range: (f64, f64),
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            base: 50.0,
            completeness_threshold: 75.0,
            completeness_bonus: 35.0,
            completeness_penalty: -15.0,
            language_excellent_bonus: 30.0,
            language_good_bonus: 20.0,
            language_fair_bonus: 5.0,
            language_poor_penalty: -20.0,
            clean_pattern_bonus: 25.0,
            suspicious_pattern_step: -8.0,
            raw_range: (20.0, 80.0),
            genuine_band: 70.0,
            fake_band: 30.0,
            genuine_range: (70.0, 85.0),
            fake_range: (15.0, 30.0),
            uncertain_range: (31.0, 69.0),
        }
    }
}

/// Bands for the OCR-confidence analyzer. The genuine band sits above the
/// raw-score cap, so with canonical values this analyzer only ever votes
/// fake or uncertain; a deployment can widen the range to change that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfidencePolicy {
    pub base: f64,
    pub long_text_bonus: f64,
    pub medium_text_bonus: f64,
    pub short_text_penalty: f64,
    pub rich_words_bonus: f64,
    pub few_words_penalty: f64,
    pub professional_bonus: f64,
    pub unprofessional_penalty: f64,
    pub contact_bonus: f64,
    pub no_contact_penalty: f64,
    pub raw_range: (f64, f64),
    pub genuine_band: f64,
    pub fake_band: f64,
    pub genuine_range: (f64, f64),
    pub fake_range: (f64, f64),
    pub uncertain_range: (f64, f64),
    pub fallback_range: (f64, f64),
}

impl Default for OcrConfidencePolicy {
    fn default() -> Self {
        Self {
            base: 30.0,
            long_text_bonus: 30.0,
            medium_text_bonus: 15.0,
            short_text_penalty: -20.0,
            rich_words_bonus: 25.0,
            few_words_penalty: -10.0,
            professional_bonus: 20.0,
            unprofessional_penalty: -15.0,
            contact_bonus: 15.0,
            no_contact_penalty: -10.0,
            raw_range: (10.0, 70.0),
            genuine_band: 80.0,
            fake_band: 20.0,
            genuine_range: (80.0, 85.0),
            fake_range: (10.0, 20.0),
            uncertain_range: (21.0, 79.0),
            fallback_range: (45.0, 74.0),
        }
    }
}

/// Bounds on the filename label-hint adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelHintPolicy {
    pub fake_base: f64,
    pub fake_step: f64,
    pub fake_floor: f64,
    pub genuine_base: f64,
    pub genuine_step: f64,
    pub genuine_cap: f64,
}

impl Default for LabelHintPolicy {
    fn default() -> Self {
        Self {
            fake_base: -35.0,
            fake_step: -8.0,
            fake_floor: -60.0,
            genuine_base: 20.0,
            genuine_step: 5.0,
            genuine_cap: 35.0,
        }
    }
}

/// Thresholds for the aggregator cascade and the final re-banding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsemblePolicy {
    /// Max genuine-voter confidence needed to force genuine on an
    /// uncertain majority.
    pub high_confidence: f64,
    /// Max fake-voter confidence needed to force fake on an uncertain
    /// majority.
    pub medium_confidence: f64,
    /// Weighted-average split used as the last forced-decision resort.
    pub weighted_split: f64,
    pub fake_vote_range: (f64, f64),
    pub genuine_vote_range: (f64, f64),
    pub forced_genuine_floor: f64,
    /// Floor when a single strongly-confident genuine voter forces the call.
    pub forced_genuine_strong_floor: f64,
    pub forced_fake_range: (f64, f64),
    /// Fake confidence range for the mixed/tied default rule.
    pub mixed_fake_range: (f64, f64),
    pub filename_fake_range: (f64, f64),
    pub filename_fake_default: f64,
    /// Strong-indicator tallies reported in the reasoning summary.
    pub strong_fake_conf: f64,
    pub strong_genuine_conf: f64,
    // Final re-banding.
    pub genuine_band: f64,
    pub fake_band: f64,
    pub genuine_range: (f64, f64),
    pub fake_range: (f64, f64),
    pub uncertain_range: (f64, f64),
}

impl Default for EnsemblePolicy {
    fn default() -> Self {
        Self {
            high_confidence: 65.0,
            medium_confidence: 50.0,
            weighted_split: 55.0,
            fake_vote_range: (25.0, 49.0),
            genuine_vote_range: (51.0, 85.0),
            forced_genuine_floor: 70.0,
            forced_genuine_strong_floor: 75.0,
            forced_fake_range: (25.0, 44.0),
            mixed_fake_range: (30.0, 44.0),
            filename_fake_range: (25.0, 45.0),
            filename_fake_default: 35.0,
            strong_fake_conf: 30.0,
            strong_genuine_conf: 70.0,
            genuine_band: 60.0,
            fake_band: 40.0,
            genuine_range: (60.0, 85.0),
            fake_range: (15.0, 40.0),
            uncertain_range: (41.0, 59.0),
        }
    }
}

/// Runtime configuration assembled once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub policy: Policy,
    /// Candidate locations for the tesseract binary, probed in order.
    pub tesseract_paths: Vec<PathBuf>,
    /// Language pack string passed to tesseract (`-l`).
    pub languages: String,
    /// Directory searched for serialized backing models.
    pub model_dir: PathBuf,
    /// Optional JSON file replacing the built-in keyword lists.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            tesseract_paths: default_tesseract_paths(),
            languages: "ind+eng".to_string(),
            model_dir: PathBuf::from("models"),
            lexicon_path: None,
        }
    }
}

// Probe order mirrors the deployments this tool ships to: an explicit
// override, the usual unix locations, the Windows installer paths, then PATH.
fn default_tesseract_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(custom) = env::var("LOKERSCAN_TESSERACT") {
        paths.push(PathBuf::from(custom));
    }
    paths.push(PathBuf::from("/usr/bin/tesseract"));
    paths.push(PathBuf::from("/usr/local/bin/tesseract"));
    paths.push(PathBuf::from("/opt/homebrew/bin/tesseract"));
    paths.push(PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"));
    paths.push(PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"));
    paths.push(PathBuf::from("tesseract"));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_bands_are_consistent() {
        let p = Policy::default();
        assert!(p.ensemble.fake_band < p.ensemble.genuine_band);
        assert!(p.structural.fake_band < p.structural.genuine_band);
        assert!(p.ensemble.genuine_range.0 <= p.ensemble.genuine_range.1);
        assert!(p.ensemble.fake_range.0 <= p.ensemble.fake_range.1);
        assert_eq!(p.version, POLICY_VERSION);
    }

    #[test]
    fn policy_roundtrips_through_toml() {
        let p = Policy::default();
        let raw = toml::to_string(&p).unwrap();
        let back: Policy = toml::from_str(&raw).unwrap();
        assert_eq!(back.ensemble.weighted_split, p.ensemble.weighted_split);
        assert_eq!(back.lexicon.base, p.lexicon.base);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let raw = "[ensemble]\nweighted_split = 60.0\n";
        let p: Policy = toml::from_str(raw).unwrap();
        assert_eq!(p.ensemble.weighted_split, 60.0);
        assert_eq!(p.lexicon.base, Policy::default().lexicon.base);
    }
}
