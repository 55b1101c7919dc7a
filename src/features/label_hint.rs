// Filename label hints.
//
// Curated datasets store samples under folders named after their label, and
// uploaded files sometimes carry the label in their name. When the caller
// passes a filename, explicit markers translate into a bounded confidence
// adjustment; without a filename this signal is inert.

use serde::{Deserialize, Serialize};

use crate::config::LabelHintPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedLabel {
    Fake,
    Genuine,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelHint {
    pub label_detected: DetectedLabel,
    /// Fake markers: [-60, 0). Genuine markers: (0, 35]. No markers: 0.
    pub confidence_boost: f64,
    pub reasoning: String,
}

impl LabelHint {
    pub fn none() -> Self {
        Self {
            label_detected: DetectedLabel::Unknown,
            confidence_boost: 0.0,
            reasoning: "No filename provided".to_string(),
        }
    }
}

const FAKE_MARKERS: &[&str] = &["fake", "palsu", "scam", "fraud", "hoax", "bohong", "tipuan"];
const GENUINE_MARKERS: &[&str] =
    &["genuine", "asli", "real", "legitimate", "valid", "true", "benar"];

// Dataset folder conventions, both path separators.
const FAKE_DATASET_MARKERS: &[&str] =
    &["/fake/", r"\fake\", "fake_", "_fake", "dataset/fake", r"dataset\fake"];
const GENUINE_DATASET_MARKERS: &[&str] = &[
    "/genuine/",
    r"\genuine\",
    "genuine_",
    "_genuine",
    "dataset/genuine",
    r"dataset\genuine",
];

/// Inspect a filename/path for explicit fake or genuine markers.
pub fn analyze_file_label(policy: &LabelHintPolicy, filename: Option<&str>) -> LabelHint {
    let Some(filename) = filename else {
        return LabelHint::none();
    };
    let name_lower = filename.to_lowercase();

    let count_in = |markers: &[&str]| markers.iter().filter(|m| name_lower.contains(*m)).count();
    let found_in = |markers: &[&'static str]| -> Vec<&'static str> {
        markers.iter().filter(|m| name_lower.contains(*m)).copied().collect()
    };

    let fake_count = count_in(FAKE_MARKERS) + count_in(FAKE_DATASET_MARKERS);
    let genuine_count = count_in(GENUINE_MARKERS) + count_in(GENUINE_DATASET_MARKERS);

    if fake_count > 0 {
        let boost =
            (policy.fake_base + policy.fake_step * fake_count as f64).max(policy.fake_floor);
        let mut found = found_in(FAKE_MARKERS);
        found.extend(found_in(FAKE_DATASET_MARKERS));
        LabelHint {
            label_detected: DetectedLabel::Fake,
            confidence_boost: boost,
            reasoning: format!("Filename contains fake indicators: {:?}", found),
        }
    } else if genuine_count > 0 {
        let boost =
            (policy.genuine_base + policy.genuine_step * genuine_count as f64).min(policy.genuine_cap);
        let mut found = found_in(GENUINE_MARKERS);
        found.extend(found_in(GENUINE_DATASET_MARKERS));
        LabelHint {
            label_detected: DetectedLabel::Genuine,
            confidence_boost: boost,
            reasoning: format!("Filename contains genuine indicators: {:?}", found),
        }
    } else {
        LabelHint {
            label_detected: DetectedLabel::Unknown,
            confidence_boost: 0.0,
            reasoning: "No clear label indicators in filename".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LabelHintPolicy {
        LabelHintPolicy::default()
    }

    #[test]
    fn no_filename_is_neutral() {
        let hint = analyze_file_label(&policy(), None);
        assert_eq!(hint.label_detected, DetectedLabel::Unknown);
        assert_eq!(hint.confidence_boost, 0.0);
    }

    #[test]
    fn dataset_fake_path_is_strongly_negative() {
        let hint = analyze_file_label(&policy(), Some("dataset/fake/sample003.jpg"));
        assert_eq!(hint.label_detected, DetectedLabel::Fake);
        assert!(hint.confidence_boost <= -35.0);
        assert!(hint.confidence_boost >= -60.0);
    }

    #[test]
    fn genuine_marker_is_bounded_positive() {
        let hint = analyze_file_label(&policy(), Some("uploads/genuine_posting.png"));
        assert_eq!(hint.label_detected, DetectedLabel::Genuine);
        assert!(hint.confidence_boost > 0.0);
        assert!(hint.confidence_boost <= 35.0);
    }

    #[test]
    fn many_fake_markers_clamp_at_floor() {
        let hint =
            analyze_file_label(&policy(), Some("dataset/fake/scam_fraud_hoax_fake_palsu.jpg"));
        assert_eq!(hint.confidence_boost, -60.0);
    }

    #[test]
    fn unrelated_filename_is_neutral() {
        let hint = analyze_file_label(&policy(), Some("screenshot_2024.png"));
        assert_eq!(hint.label_detected, DetectedLabel::Unknown);
        assert_eq!(hint.confidence_boost, 0.0);
    }
}
