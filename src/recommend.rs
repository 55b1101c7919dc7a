// Recommendation assembly: a pure mapping from the verdict and the
// detected issues to actionable guidance. No state, no side effects.

use crate::features::FeatureVector;
use crate::types::{EnsembleResult, Recommendation, Verdict};

pub fn generate_recommendations(
    ensemble: &EnsembleResult,
    features: &FeatureVector,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let confidence = ensemble.final_confidence;

    // Always lead with extraction quality: everything downstream improves
    // with better text recovery.
    recommendations.push(Recommendation {
        category: "OCR Quality".to_string(),
        title: "Improve Text Extraction".to_string(),
        description: "For better analysis accuracy, consider using dedicated OCR services"
            .to_string(),
        suggestions: vec![
            "Try a cloud OCR service for better text extraction".to_string(),
            "Upload higher resolution images (minimum 300 DPI)".to_string(),
            "Ensure good lighting and contrast in the image".to_string(),
            "Crop the image to the text area of the posting".to_string(),
        ],
    });

    match ensemble.final_prediction {
        Verdict::Fake => recommendations.push(Recommendation {
            category: "Security Alert".to_string(),
            title: "Potential Fake Job Posting Detected".to_string(),
            description: format!(
                "Our analysis indicates this is likely a fake posting (confidence: {confidence:.0}%)"
            ),
            suggestions: vec![
                "Do not provide personal information or payment".to_string(),
                "Verify company legitimacy through official channels".to_string(),
                "Check company website and contact information".to_string(),
                "Look for reviews from other job seekers".to_string(),
                "Be cautious of requests for upfront payments".to_string(),
            ],
        }),
        Verdict::Genuine => recommendations.push(Recommendation {
            category: "Verification".to_string(),
            title: "Likely Genuine Job Posting".to_string(),
            description: format!(
                "Our analysis suggests this is a legitimate posting (confidence: {confidence:.0}%)"
            ),
            suggestions: vec![
                "Still verify company details independently".to_string(),
                "Research the company online".to_string(),
                "Check if the job requirements match your skills".to_string(),
                "Prepare for a standard interview process".to_string(),
                "Follow proper application procedures".to_string(),
            ],
        }),
        Verdict::Uncertain | Verdict::Error => recommendations.push(Recommendation {
            category: "Caution".to_string(),
            title: "Uncertain Classification".to_string(),
            description: format!(
                "Analysis results are inconclusive (confidence: {confidence:.0}%)"
            ),
            suggestions: vec![
                "Exercise extra caution when proceeding".to_string(),
                "Manually verify all company information".to_string(),
                "Look for additional red flags".to_string(),
                "Consider getting a second opinion".to_string(),
                "Upload a clearer image for better analysis".to_string(),
            ],
        }),
    }

    if !features.suspicious_patterns.is_empty() {
        let sample: Vec<&str> = features
            .suspicious_patterns
            .iter()
            .take(3)
            .map(|s| s.as_str())
            .collect();
        recommendations.push(Recommendation {
            category: "Red Flags Detected".to_string(),
            title: "Suspicious Patterns Found".to_string(),
            description: "Several concerning patterns were identified in the text".to_string(),
            suggestions: vec![
                format!("Review these issues: {}", sample.join(", ")),
                "Be extra cautious about legitimacy".to_string(),
                "Verify claims independently".to_string(),
                "Avoid any upfront payments or fees".to_string(),
            ],
        });
    }

    recommendations
}
