// OCR output cleanup.
//
// `normalize` is a pure, idempotent function: running it twice yields the
// same text. The word-level repairs live in a data-only ruleset of
// pattern -> replacement pairs so deployments can version and extend them
// without touching code; replacements must be fixed points of their own
// pattern or idempotence is lost.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// A versioned table of textual repairs applied before the generic passes.
pub struct FixRuleset {
    rules: Vec<(Regex, String)>,
}

#[derive(Debug, Deserialize)]
struct FixRule {
    pattern: String,
    replacement: String,
}

// Leetspeak repairs for the Indonesian job-posting vocabulary OCR most
// often mangles. Uppercase literals only, so clean mixed-case text is
// untouched.
const DEFAULT_FIXES: &[(&str, &str)] = &[
    ("L0W0NGAN", "LOWONGAN"),
    ("KERJ4", "KERJA"),
    ("G4JI", "GAJI"),
    ("PERUS4H44N", "PERUSAHAAN"),
    ("P0SISI", "POSISI"),
    ("J4B4T4N", "JABATAN"),
    ("K4RIR", "KARIR"),
    ("PENG4L4M4N", "PENGALAMAN"),
    ("KU4L1F1K4S1", "KUALIFIKASI"),
    ("SY4R4T", "SYARAT"),
    ("TUNJ4NG4N", "TUNJANGAN"),
    ("W4W4NC4R4", "WAWANCARA"),
    ("L4M4R4N", "LAMARAN"),
    ("PEND1D1K4N", "PENDIDIKAN"),
    ("S4RJ4N4", "SARJANA"),
    ("D1PL0M4", "DIPLOMA"),
    ("SERT1F1K4T", "SERTIFIKAT"),
    ("K0MPETEN51", "KOMPETENSI"),
    ("KEAHL14N", "KEAHLIAN"),
    ("KEMAMPU4N", "KEMAMPUAN"),
];

impl FixRuleset {
    pub fn builtin() -> Self {
        let rules = DEFAULT_FIXES
            .iter()
            .map(|(pat, rep)| {
                // Literal table entries; escape so they stay literal.
                (Regex::new(&regex::escape(pat)).unwrap(), rep.to_string())
            })
            .collect();
        Self { rules }
    }

    /// Load a replacement table from JSON: `[{"pattern": "...",
    /// "replacement": "..."}]`. Patterns are full regexes here.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fix ruleset {}", path.display()))?;
        let entries: Vec<FixRule> =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            let regex = Regex::new(&entry.pattern)
                .with_context(|| format!("invalid fix pattern {:?}", entry.pattern))?;
            rules.push((regex, entry.replacement));
        }
        Ok(Self { rules })
    }

    fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (regex, replacement) in &self.rules {
            out = regex.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}

static BUILTIN_RULESET: Lazy<FixRuleset> = Lazy::new(FixRuleset::builtin);

// A standalone capital split from the rest of its word: "L owongan".
static SPLIT_CAPITAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^A-Za-z])([A-Z])\s+([a-z])").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])\s+([.,!?;:])").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Characters a recognizer can legitimately produce: printable ASCII plus
/// the Latin-extended ranges Indonesian text with diacritics falls into.
fn is_allowed(c: char) -> bool {
    c == '\n'
        || (' '..='~').contains(&c)
        || ('\u{00A0}'..='\u{024F}').contains(&c)
        || ('\u{1E00}'..='\u{1EFF}').contains(&c)
}

// Digit shapes OCR confuses with letters, repaired only when the digit sits
// between two letters so real numbers survive.
fn confusion_fix(c: char) -> Option<char> {
    match c {
        '0' => Some('O'),
        '1' => Some('I'),
        '5' => Some('S'),
        '8' => Some('B'),
        '|' => Some('I'),
        '!' => Some('I'),
        _ => None,
    }
}

fn fix_digit_confusions(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let fixed = match confusion_fix(c) {
            Some(replacement)
                if i > 0
                    && i + 1 < chars.len()
                    && chars[i - 1].is_alphabetic()
                    && chars[i + 1].is_alphabetic() =>
            {
                replacement
            }
            _ => c,
        };
        out.push(fixed);
    }
    out
}

/// Normalize with the built-in repair table.
pub fn normalize(text: &str) -> String {
    normalize_with(&BUILTIN_RULESET, text)
}

/// Normalize with a caller-supplied repair table.
pub fn normalize_with(ruleset: &FixRuleset, text: &str) -> String {
    let text = ruleset.apply(text);

    // Strip non-printables, keeping line structure for the line filter.
    let text: String = text.chars().map(|c| if is_allowed(c) { c } else { ' ' }).collect();

    let text = fix_digit_confusions(&text);

    // Drop lines that are noise: fewer than two alphanumeric characters.
    let kept: Vec<&str> = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| line.chars().filter(|c| c.is_alphanumeric()).count() >= 2)
        .collect();
    let text = kept.join("\n");

    // Single-line form before the spacing repairs, so repeated runs see the
    // same shape.
    let text = MULTI_SPACE.replace_all(&text, " ").into_owned();
    let text = SPLIT_CAPITAL.replace_all(&text, "${1}${2}${3}").into_owned();
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "${1}${2}").into_owned();

    text.trim().to_string()
}
