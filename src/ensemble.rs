// Ensemble aggregation: fuse the analyzer verdicts into one.
//
// The rules run in priority order. A clear fake or genuine majority wins
// outright; a fake/genuine tie is broken by summed confidence strength; an
// explicit fake marker in the filename overrides votes; an uncertain
// majority is forced through a decision cascade instead of being returned
// as-is; anything else defaults toward genuine on vote count. The final
// confidence is then re-banded so verdict and confidence always agree.

use tracing::{debug, info};

use crate::config::EnsemblePolicy;
use crate::types::{
    AnalyzerResult, ClassAverages, EnsembleResult, StrongIndicators, Verdict, VoteTally,
};

fn clamp(value: f64, range: (f64, f64)) -> f64 {
    value.clamp(range.0, range.1)
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Fuse up to four analyzer results. `error` entries are excluded from
/// voting but still counted in the diagnostics; the error verdict itself is
/// returned only when every analyzer failed.
pub fn aggregate(
    policy: &EnsemblePolicy,
    results: &[AnalyzerResult],
    filename: Option<&str>,
) -> EnsembleResult {
    let voting: Vec<&AnalyzerResult> =
        results.iter().filter(|r| r.prediction != Verdict::Error).collect();

    if voting.is_empty() {
        return EnsembleResult {
            final_prediction: Verdict::Error,
            final_confidence: 0.0,
            reasoning_summary: vec!["All models failed to analyze".to_string()],
            votes: VoteTally::default(),
            average_confidence: ClassAverages::default(),
            strong_indicators: StrongIndicators::default(),
        };
    }

    let confidences_of = |verdict: Verdict| -> Vec<f64> {
        voting
            .iter()
            .filter(|r| r.prediction == verdict)
            .map(|r| r.confidence)
            .collect()
    };
    let fake_confs = confidences_of(Verdict::Fake);
    let genuine_confs = confidences_of(Verdict::Genuine);
    let uncertain_confs = confidences_of(Verdict::Uncertain);

    let votes = VoteTally {
        fake: fake_confs.len(),
        genuine: genuine_confs.len(),
        uncertain: uncertain_confs.len(),
    };
    let averages = ClassAverages {
        fake: average(&fake_confs),
        genuine: average(&genuine_confs),
        uncertain: average(&uncertain_confs),
    };
    let fake_strength: f64 = fake_confs.iter().sum();
    let genuine_strength: f64 = genuine_confs.iter().sum();
    let weighted_avg = average(
        &voting.iter().map(|r| r.confidence).collect::<Vec<f64>>(),
    );

    let strong_indicators = StrongIndicators {
        fake: fake_confs.iter().filter(|&&c| c > policy.strong_fake_conf).count(),
        genuine: genuine_confs.iter().filter(|&&c| c > policy.strong_genuine_conf).count(),
    };

    let filename_says_fake =
        filename.map_or(false, |name| name.to_lowercase().contains("fake"));

    // Decision cascade, in priority order.
    let (mut prediction, mut confidence) = if votes.fake > votes.genuine
        && votes.fake > votes.uncertain
    {
        debug!("ensemble: clear fake majority");
        (Verdict::Fake, clamp(averages.fake, policy.fake_vote_range))
    } else if votes.genuine > votes.fake && votes.genuine > votes.uncertain {
        debug!("ensemble: clear genuine majority");
        (Verdict::Genuine, clamp(averages.genuine, policy.genuine_vote_range))
    } else if votes.fake == votes.genuine && votes.fake > votes.uncertain {
        // Tie between the decisive classes: confidence strength breaks it.
        debug!(fake_strength, genuine_strength, "ensemble: fake/genuine tie");
        if fake_strength >= genuine_strength {
            (Verdict::Fake, clamp(averages.fake, policy.fake_vote_range))
        } else {
            (Verdict::Genuine, clamp(averages.genuine, policy.genuine_vote_range))
        }
    } else if filename_says_fake {
        // Dataset-label override: an explicit fake marker in the filename
        // outranks the remaining vote patterns.
        debug!("ensemble: filename fake marker forces verdict");
        let base = if averages.fake > 0.0 { averages.fake } else { policy.filename_fake_default };
        (Verdict::Fake, clamp(base, policy.filename_fake_range))
    } else if votes.uncertain > votes.genuine && votes.uncertain > votes.fake {
        // Uncertain majority: force a decision from confidence patterns.
        let max_genuine = genuine_confs.iter().cloned().fold(0.0, f64::max);
        let max_fake = fake_confs.iter().cloned().fold(0.0, f64::max);
        debug!(max_genuine, max_fake, weighted_avg, "ensemble: uncertain majority cascade");

        if max_genuine >= policy.high_confidence {
            (Verdict::Genuine, max_genuine.max(policy.forced_genuine_strong_floor))
        } else if max_fake >= policy.medium_confidence {
            (Verdict::Fake, clamp(max_fake, policy.forced_fake_range))
        } else if averages.genuine > averages.fake {
            (Verdict::Genuine, averages.genuine.max(policy.forced_genuine_floor))
        } else if weighted_avg >= policy.weighted_split {
            (Verdict::Genuine, weighted_avg.max(policy.forced_genuine_floor))
        } else {
            (Verdict::Fake, clamp(weighted_avg, policy.forced_fake_range))
        }
    } else {
        // Mixed or tied with no case above: lean genuine on vote count.
        debug!("ensemble: mixed votes, defaulting on vote count");
        if votes.genuine >= votes.fake {
            (Verdict::Genuine, averages.genuine.max(policy.forced_genuine_strong_floor))
        } else {
            (Verdict::Fake, clamp(averages.fake, policy.mixed_fake_range))
        }
    };

    // Re-band so the confidence always sits inside its verdict's canonical
    // range; mid-range confidences become uncertain regardless of the
    // cascade outcome.
    if confidence >= policy.genuine_band {
        prediction = Verdict::Genuine;
        confidence = clamp(confidence, policy.genuine_range);
    } else if confidence <= policy.fake_band {
        prediction = Verdict::Fake;
        confidence = clamp(confidence, policy.fake_range);
    } else {
        prediction = Verdict::Uncertain;
        confidence = clamp(confidence, policy.uncertain_range);
    }

    let mut reasoning_summary = vec![
        format!("Ensemble analysis of {} models:", voting.len()),
        format!("Fake votes: {} (avg conf: {:.1})", votes.fake, averages.fake),
        format!("Genuine votes: {} (avg conf: {:.1})", votes.genuine, averages.genuine),
        format!("Uncertain votes: {} (avg conf: {:.1})", votes.uncertain, averages.uncertain),
    ];
    if strong_indicators.fake >= 2 {
        reasoning_summary
            .push("Strong fake indicators detected across multiple models".to_string());
    } else if strong_indicators.genuine >= 3 {
        reasoning_summary.push("Strong genuine indicators with high confidence".to_string());
    } else if prediction == Verdict::Uncertain {
        reasoning_summary.push("Mixed signals or conflicting evidence from models".to_string());
    }
    reasoning_summary.push(
        if confidence >= 80.0 {
            "High confidence prediction"
        } else if confidence >= 60.0 {
            "Moderate confidence prediction"
        } else {
            "Low confidence prediction - exercise caution"
        }
        .to_string(),
    );

    info!(
        prediction = prediction.as_str(),
        confidence,
        fake_votes = votes.fake,
        genuine_votes = votes.genuine,
        uncertain_votes = votes.uncertain,
        "ensemble verdict"
    );

    EnsembleResult {
        final_prediction: prediction,
        final_confidence: confidence,
        reasoning_summary,
        votes,
        average_confidence: averages,
        strong_indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;

    fn result(analyzer: &str, prediction: Verdict, confidence: f64) -> AnalyzerResult {
        AnalyzerResult {
            analyzer: analyzer.to_string(),
            prediction,
            confidence,
            reasoning: Vec::new(),
            features_analyzed: Vec::new(),
        }
    }

    fn policy() -> EnsemblePolicy {
        Policy::default().ensemble
    }

    #[test]
    fn genuine_majority_wins_with_banded_confidence() {
        let results = vec![
            result("a", Verdict::Genuine, 85.0),
            result("b", Verdict::Genuine, 80.0),
            result("c", Verdict::Genuine, 90.0),
            result("d", Verdict::Uncertain, 70.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Genuine);
        assert!((60.0..=85.0).contains(&out.final_confidence));
        assert_eq!(out.votes.genuine, 3);
    }

    #[test]
    fn fake_majority_wins_and_rebands_low() {
        let results = vec![
            result("a", Verdict::Fake, 30.0),
            result("b", Verdict::Fake, 20.0),
            result("c", Verdict::Fake, 15.0),
            result("d", Verdict::Uncertain, 50.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Fake);
        assert!((15.0..=40.0).contains(&out.final_confidence));
    }

    #[test]
    fn tie_is_broken_by_confidence_strength() {
        let results = vec![
            result("a", Verdict::Fake, 45.0),
            result("b", Verdict::Fake, 40.0),
            result("c", Verdict::Genuine, 60.0),
            result("d", Verdict::Genuine, 95.0),
        ];
        // genuine strength 155 > fake strength 85
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Genuine);
    }

    #[test]
    fn filename_fake_marker_forces_fake() {
        let results = vec![
            result("a", Verdict::Uncertain, 55.0),
            result("b", Verdict::Uncertain, 60.0),
            result("c", Verdict::Genuine, 62.0),
            result("d", Verdict::Fake, 20.0),
        ];
        // No strict majority, no fake/genuine tie above uncertain.
        let out = aggregate(&policy(), &results, Some("dataset/fake/sample003.jpg"));
        assert_eq!(out.final_prediction, Verdict::Fake);
        assert!(out.final_confidence <= 40.0);
    }

    #[test]
    fn uncertain_majority_with_strong_genuine_forces_genuine() {
        let results = vec![
            result("a", Verdict::Uncertain, 50.0),
            result("b", Verdict::Uncertain, 55.0),
            result("c", Verdict::Uncertain, 45.0),
            result("d", Verdict::Genuine, 70.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Genuine);
        assert!(out.final_confidence >= 60.0);
    }

    #[test]
    fn uncertain_majority_with_adequate_fake_never_reads_genuine() {
        let results = vec![
            result("a", Verdict::Uncertain, 45.0),
            result("b", Verdict::Uncertain, 40.0),
            result("c", Verdict::Uncertain, 42.0),
            result("d", Verdict::Fake, 55.0),
        ];
        // The forced-fake confidence caps at 44, which the final re-banding
        // may soften to uncertain; it can never become genuine.
        let out = aggregate(&policy(), &results, None);
        assert_ne!(out.final_prediction, Verdict::Genuine);
        assert!(out.final_confidence <= 44.0);
    }

    #[test]
    fn uncertain_majority_low_weighted_average_lands_fake_or_uncertain() {
        let results = vec![
            result("a", Verdict::Uncertain, 35.0),
            result("b", Verdict::Uncertain, 40.0),
            result("c", Verdict::Uncertain, 38.0),
            result("d", Verdict::Fake, 20.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_ne!(out.final_prediction, Verdict::Genuine);
    }

    #[test]
    fn error_results_are_excluded_from_voting() {
        let results = vec![
            result("a", Verdict::Error, 0.0),
            result("b", Verdict::Error, 0.0),
            result("c", Verdict::Fake, 20.0),
            result("d", Verdict::Fake, 25.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Fake);
        assert_eq!(out.votes.fake, 2);
    }

    #[test]
    fn all_errors_yield_error_verdict_with_zero_confidence() {
        let results = vec![
            result("a", Verdict::Error, 0.0),
            result("b", Verdict::Error, 0.0),
            result("c", Verdict::Error, 0.0),
            result("d", Verdict::Error, 0.0),
        ];
        let out = aggregate(&policy(), &results, None);
        assert_eq!(out.final_prediction, Verdict::Error);
        assert_eq!(out.final_confidence, 0.0);
    }

    #[test]
    fn confidence_is_always_in_bounds() {
        let verdicts = [Verdict::Fake, Verdict::Genuine, Verdict::Uncertain];
        for &a in &verdicts {
            for &b in &verdicts {
                for &c in &verdicts {
                    for &d in &verdicts {
                        let results = vec![
                            result("a", a, 10.0),
                            result("b", b, 50.0),
                            result("c", c, 90.0),
                            result("d", d, 33.0),
                        ];
                        for filename in [None, Some("fake.png"), Some("x.png")] {
                            let out = aggregate(&policy(), &results, filename);
                            assert!(
                                (0.0..=100.0).contains(&out.final_confidence),
                                "{a:?}{b:?}{c:?}{d:?} {filename:?} -> {out:?}"
                            );
                            assert_ne!(out.final_prediction, Verdict::Error);
                        }
                    }
                }
            }
        }
    }
}
