// Feature derivation from recovered text.
//
// Everything downstream of OCR consumes the `FeatureVector` built here:
// structural counts, keyword hits, indicator flags, text-quality ratios,
// salary risk and the completeness/language-quality assessment. Built fresh
// per request, never mutated after construction.

pub mod label_hint;
pub mod lexicon;
pub mod salary;

use serde::{Deserialize, Serialize};

use crate::features::lexicon::{analyze_keywords, KeywordAnalysis, Lexicons};
use crate::features::salary::{detect_salary_risk, SalaryRisk};

/// Texts shorter than this yield the neutral sentinel vector.
pub const MIN_ANALYZABLE_CHARS: usize = 10;

/// Words required before the text counts as a full job description.
const ADEQUATE_WORD_COUNT: usize = 50;

// Small fixed keyword sets behind the boolean indicator flags.
const ADDRESS_WORDS: &[&str] = &["jl", "jalan", "street", "alamat"];
const COMPANY_WORDS: &[&str] = &["pt", "cv", "ltd", "inc", "corp"];
const WHATSAPP_WORDS: &[&str] = &["whatsapp", "wa", "chat"];
const MONEY_PROMISE_WORDS: &[&str] = &["jutaan", "milyar", "kaya", "sukses"];
const URGENCY_WORDS: &[&str] = &["buruan", "segera", "terbatas", "deadline"];
const MLM_WORDS: &[&str] = &["join", "member", "bonus", "komisi"];
const NO_EXPERIENCE_WORDS: &[&str] = &["tanpa pengalaman", "no experience", "fresh graduate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EssentialElements {
    pub company_name: bool,
    pub job_title: bool,
    pub requirements: bool,
    pub contact_info: bool,
}

impl EssentialElements {
    pub fn present(&self) -> usize {
        [self.company_name, self.job_title, self.requirements, self.contact_info]
            .iter()
            .filter(|b| **b)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    // Structural counts.
    pub length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f64,
    // Marker list hits.
    pub genuine_keywords: usize,
    pub fake_keywords: usize,
    pub keyword_ratio: f64,
    // Indicator flags.
    pub has_email: bool,
    pub has_phone: bool,
    pub has_address: bool,
    pub has_company: bool,
    pub has_whatsapp: bool,
    pub has_money_promise: bool,
    pub has_urgency: bool,
    pub has_mlm_terms: bool,
    pub has_no_experience: bool,
    // Text-quality ratios.
    pub uppercase_ratio: f64,
    pub exclamation_count: usize,
    pub question_count: usize,
    pub number_count: usize,
    // Derived assessments.
    pub suspicious_patterns: Vec<String>,
    pub quality_indicators: Vec<String>,
    pub language_quality: LanguageQuality,
    pub completeness_score: f64,
    pub essential_elements: EssentialElements,
    pub professional_word_count: usize,
    pub salary: SalaryRisk,
    pub keyword_analysis: KeywordAnalysis,
}

impl FeatureVector {
    /// Neutral sentinel for empty or near-empty text. Documented behavior,
    /// not an error: downstream analyzers still run against it.
    pub fn neutral() -> Self {
        Self {
            length: 0,
            word_count: 0,
            sentence_count: 0,
            avg_word_length: 0.0,
            genuine_keywords: 0,
            fake_keywords: 0,
            keyword_ratio: 1.0,
            has_email: false,
            has_phone: false,
            has_address: false,
            has_company: false,
            has_whatsapp: false,
            has_money_promise: false,
            has_urgency: false,
            has_mlm_terms: false,
            has_no_experience: false,
            uppercase_ratio: 0.0,
            exclamation_count: 0,
            question_count: 0,
            number_count: 0,
            suspicious_patterns: Vec::new(),
            quality_indicators: Vec::new(),
            language_quality: LanguageQuality::Poor,
            completeness_score: 0.0,
            essential_elements: EssentialElements::default(),
            professional_word_count: 0,
            salary: SalaryRisk::default(),
            keyword_analysis: KeywordAnalysis::default(),
        }
    }

    /// Fixed-order numeric tuple fed to the structural classifier. The
    /// order is part of the model contract and must not change.
    pub fn model_inputs(&self) -> [f64; 20] {
        [
            self.length as f64,
            self.word_count as f64,
            self.sentence_count as f64,
            self.avg_word_length,
            self.genuine_keywords as f64,
            self.fake_keywords as f64,
            self.keyword_ratio,
            self.has_email as u8 as f64,
            self.has_phone as u8 as f64,
            self.has_address as u8 as f64,
            self.has_company as u8 as f64,
            self.has_whatsapp as u8 as f64,
            self.has_money_promise as u8 as f64,
            self.has_urgency as u8 as f64,
            self.has_mlm_terms as u8 as f64,
            self.has_no_experience as u8 as f64,
            self.uppercase_ratio,
            self.exclamation_count as f64,
            self.question_count as f64,
            self.number_count as f64,
        ]
    }
}

fn contains_any(text_lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text_lower.contains(w))
}

/// Derive the full feature record for one text.
pub fn extract_features(lexicons: &Lexicons, text: &str) -> FeatureVector {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_ANALYZABLE_CHARS {
        return FeatureVector::neutral();
    }

    let text_lower = trimmed.to_lowercase();
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let char_count = trimmed.chars().count();

    let genuine_keywords = Lexicons::count_hits(&lexicons.genuine_markers, &text_lower);
    let fake_keywords = Lexicons::count_hits(&lexicons.fake_markers, &text_lower);

    let sentence_count = trimmed.split('.').filter(|s| !s.trim().is_empty()).count();
    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
    };

    let has_urgency = contains_any(&text_lower, URGENCY_WORDS);
    let has_money_promise = contains_any(&text_lower, MONEY_PROMISE_WORDS);

    let essential_elements = EssentialElements {
        company_name: Lexicons::count_hits(&lexicons.company_terms, &text_lower) > 0,
        job_title: Lexicons::count_hits(&lexicons.job_terms, &text_lower) > 0,
        requirements: Lexicons::count_hits(&lexicons.requirement_terms, &text_lower) > 0,
        contact_info: Lexicons::count_hits(&lexicons.contact_terms, &text_lower) > 0,
    };
    let completeness_score = essential_elements.present() as f64 / 4.0 * 100.0;

    let salary = detect_salary_risk(trimmed);

    let mut suspicious_patterns = Vec::new();
    if fake_keywords > 3 {
        suspicious_patterns.push(format!("High fake keyword count: {fake_keywords}"));
    }
    if has_urgency {
        suspicious_patterns.push("Urgency tactics detected".to_string());
    }
    if has_money_promise {
        suspicious_patterns.push("Money promises detected".to_string());
    }
    if salary.found {
        suspicious_patterns.extend(salary.patterns.iter().cloned());
    }
    if !essential_elements.contact_info {
        suspicious_patterns.push("Missing contact information".to_string());
    }

    let professional_word_count = Lexicons::count_hits(&lexicons.professional, &text_lower);

    let mut quality_indicators = Vec::new();
    quality_indicators.push(
        if professional_word_count >= 5 {
            "Professional vocabulary used"
        } else if professional_word_count >= 3 {
            "Some professional terms present"
        } else {
            "Limited professional vocabulary"
        }
        .to_string(),
    );
    quality_indicators.push(
        if words.len() > ADEQUATE_WORD_COUNT {
            "Adequate text length"
        } else {
            "Text too short for proper job posting"
        }
        .to_string(),
    );
    if essential_elements.contact_info {
        quality_indicators.push("Contact information provided".to_string());
    }

    let language_quality = if professional_word_count >= 5 && suspicious_patterns.is_empty() {
        LanguageQuality::Excellent
    } else if professional_word_count >= 3 && suspicious_patterns.len() <= 1 {
        LanguageQuality::Good
    } else if professional_word_count >= 2 && suspicious_patterns.len() <= 2 {
        LanguageQuality::Fair
    } else {
        LanguageQuality::Poor
    };

    let keyword_analysis = analyze_keywords(lexicons, trimmed);

    FeatureVector {
        length: char_count,
        word_count: words.len(),
        sentence_count,
        avg_word_length,
        genuine_keywords,
        fake_keywords,
        keyword_ratio: genuine_keywords as f64 / (fake_keywords.max(1)) as f64,
        has_email: trimmed.contains('@'),
        has_phone: trimmed.chars().any(|c| c.is_ascii_digit()),
        has_address: contains_any(&text_lower, ADDRESS_WORDS),
        has_company: contains_any(&text_lower, COMPANY_WORDS),
        has_whatsapp: contains_any(&text_lower, WHATSAPP_WORDS),
        has_money_promise,
        has_urgency,
        has_mlm_terms: contains_any(&text_lower, MLM_WORDS),
        has_no_experience: contains_any(&text_lower, NO_EXPERIENCE_WORDS),
        uppercase_ratio: trimmed.chars().filter(|c| c.is_uppercase()).count() as f64
            / char_count.max(1) as f64,
        exclamation_count: trimmed.matches('!').count(),
        question_count: trimmed.matches('?').count(),
        number_count: trimmed.chars().filter(|c| c.is_ascii_digit()).count(),
        suspicious_patterns,
        quality_indicators,
        language_quality,
        completeness_score,
        essential_elements,
        professional_word_count,
        salary,
        keyword_analysis,
    }
}
