// Suspicious-salary detection.
//
// An ordered set of regexes over the lowercased text catches the
// compensation phrasing that fraudulent postings lean on: implausible
// absolute amounts, wide ranges, "up to" promises, exaggeration adjectives
// and easy-money claims. Amounts are in millions of rupiah ("juta").

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Severity of a detected salary red flag. Ordered: None < Medium < High
/// < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryRiskTier {
    None,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRisk {
    pub found: bool,
    pub tier: SalaryRiskTier,
    /// Descriptions of every pattern that matched, in pattern order.
    pub patterns: Vec<String>,
    /// Largest numeric amount parsed from any match, 0 if none numeric.
    pub amount: f64,
    pub count: usize,
}

impl Default for SalaryRisk {
    fn default() -> Self {
        Self {
            found: false,
            tier: SalaryRiskTier::None,
            patterns: Vec::new(),
            amount: 0.0,
            count: 0,
        }
    }
}

struct SalaryPattern {
    regex: Regex,
    description: &'static str,
    tier: SalaryRiskTier,
}

/// Amounts at or above this (in millions) are never below the high tier.
const HIGH_AMOUNT_FLOOR: f64 = 50.0;

static SALARY_PATTERNS: Lazy<Vec<SalaryPattern>> = Lazy::new(|| {
    let build = |pattern: &str, description: &'static str, tier: SalaryRiskTier| SalaryPattern {
        // Patterns are static; a failure here is a programming error.
        regex: Regex::new(pattern).unwrap(),
        description,
        tier,
    };
    vec![
        build(
            r"(?:gaji|penghasilan|salary)\s*(?:per\s*bulan|bulanan|sebulan)?\s*(?:rp\.?|rupiah)?\s*([1-9]\d+)\s*(?:juta|jt|million)",
            "Suspiciously high salary offer",
            SalaryRiskTier::High,
        ),
        build(
            r"(?:gaji|penghasilan|salary)\s*(?:rp\.?|rupiah)?\s*(\d+(?:\.\d+)?)\s*(?:juta|jt)?\s*-\s*(?:rp\.?|rupiah)?\s*(\d+(?:\.\d+)?)\s*(?:juta|jt|million)",
            "Salary range offered (common in fake jobs)",
            SalaryRiskTier::Medium,
        ),
        build(
            r"(?:gaji|penghasilan|salary)\s*(?:hingga|sampai|up\s*to)\s*(?:rp\.?|rupiah)?\s*(\d+(?:\.\d+)?)\s*(?:juta|jt|million)",
            "Vague high salary promise",
            SalaryRiskTier::High,
        ),
        build(
            r"gaji\s*(?:besar|tinggi|fantastis|menggiurkan|jutaan|lumayan|menarik|wow|dahsyat|luar\s*biasa|menggoda)",
            "Exaggerated salary claims",
            SalaryRiskTier::High,
        ),
        build(
            r"(?:penghasilan|income|pendapatan)\s*(?:besar|tinggi|fantastis|menggiurkan|jutaan|lumayan|menarik|wow|dahsyat)",
            "Exaggerated income promises",
            SalaryRiskTier::High,
        ),
        build(
            r"(?:mudah|gampang|cepat)\s*(?:dapat|dapet|meraih)\s*(?:gaji|penghasilan|uang)\s*(?:besar|tinggi|jutaan)",
            "Easy money promises",
            SalaryRiskTier::High,
        ),
        build(
            r"(?:rp\.?|rupiah)\s*([5-9]\d|[1-9]\d{2})\s*(?:juta|jt|million)",
            "Unrealistically high salary amount",
            SalaryRiskTier::Critical,
        ),
    ]
});

/// Scan the text for salary red flags and report the worst tier found.
pub fn detect_salary_risk(text: &str) -> SalaryRisk {
    let text_lower = text.to_lowercase();
    let mut risk = SalaryRisk::default();

    for pattern in SALARY_PATTERNS.iter() {
        let mut matched = false;
        for caps in pattern.regex.captures_iter(&text_lower) {
            matched = true;
            for group in caps.iter().skip(1).flatten() {
                if let Ok(amount) = group.as_str().parse::<f64>() {
                    if amount > risk.amount {
                        risk.amount = amount;
                    }
                }
            }
        }
        if matched {
            risk.found = true;
            risk.patterns.push(pattern.description.to_string());
            if pattern.tier > risk.tier {
                risk.tier = pattern.tier;
            }
        }
    }
    risk.count = risk.patterns.len();

    // Tier is monotonic in the parsed amount: 50 million and up is never
    // reported below the high tier, whichever pattern produced the number.
    if risk.amount >= HIGH_AMOUNT_FLOOR && risk.tier < SalaryRiskTier::High {
        risk.tier = SalaryRiskTier::High;
    }

    risk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_has_no_risk() {
        let risk = detect_salary_risk("Gaji kompetitif sesuai pengalaman dan kualifikasi.");
        assert!(!risk.found);
        assert_eq!(risk.tier, SalaryRiskTier::None);
        assert_eq!(risk.amount, 0.0);
    }

    #[test]
    fn exaggerated_salary_is_high() {
        let risk = detect_salary_risk("GAJI BESAR menanti anda!");
        assert!(risk.found);
        assert_eq!(risk.tier, SalaryRiskTier::High);
    }

    #[test]
    fn absolute_high_amount_is_detected() {
        let risk = detect_salary_risk("gaji 15 juta per bulan tanpa syarat");
        assert!(risk.found);
        assert!(risk.tier >= SalaryRiskTier::High);
        assert_eq!(risk.amount, 15.0);
    }

    #[test]
    fn fifty_million_is_never_below_high() {
        let risk = detect_salary_risk("dapatkan rp 75 juta setiap bulan");
        assert!(risk.found);
        assert!(risk.tier >= SalaryRiskTier::High);
        assert_eq!(risk.amount, 75.0);
    }

    #[test]
    fn range_pattern_is_medium_and_keeps_max_amount() {
        let risk = detect_salary_risk("gaji 3 - 7 juta rupiah");
        assert!(risk.found);
        assert!(risk.tier >= SalaryRiskTier::Medium);
        assert_eq!(risk.amount, 7.0);
    }

    #[test]
    fn tier_ordering_is_total() {
        assert!(SalaryRiskTier::None < SalaryRiskTier::Medium);
        assert!(SalaryRiskTier::Medium < SalaryRiskTier::High);
        assert!(SalaryRiskTier::High < SalaryRiskTier::Critical);
    }
}
