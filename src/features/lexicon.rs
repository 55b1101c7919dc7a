// Keyword lists and the Indonesian keyword analysis built on them.
//
// The lists are data, not code: the built-in sets below are curated defaults
// and a deployment can replace the whole table from a JSON file. Matching is
// case-insensitive substring membership, deliberately not tokenized, so
// multi-word phrases ("tanpa pengalaman") match without a tokenizer.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// The five curated word lists plus the small supporting sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicons {
    /// Indicators of a legitimate posting (company facts, process words).
    pub legitimate: Vec<String>,
    /// Indicators of a fraudulent or manipulative posting.
    pub suspicious: Vec<String>,
    /// Words that need context; counted but never decisive.
    pub neutral: Vec<String>,
    /// Small genuine marker set used by the feature extractor.
    pub genuine_markers: Vec<String>,
    /// Small fake marker set used by the feature extractor.
    pub fake_markers: Vec<String>,
    /// Large dual-language genuine terms scored by the lexicon analyzer.
    pub genuine_terms: Vec<String>,
    /// Large dual-language fake terms scored by the lexicon analyzer.
    pub fake_terms: Vec<String>,
    /// Professional vocabulary feeding the language-quality tier.
    pub professional: Vec<String>,
    // Essential-element category sets for the completeness score.
    pub company_terms: Vec<String>,
    pub job_terms: Vec<String>,
    pub requirement_terms: Vec<String>,
    pub contact_terms: Vec<String>,
    /// Contact indicators checked by the lexicon analyzer.
    pub contact_indicators: Vec<String>,
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            legitimate: to_strings(&[
                "perusahaan", "company", "pt", "cv", "tbk", "persero", "kantor", "alamat",
                "lokasi", "cabang", "divisi", "departemen", "posisi", "jabatan", "lowongan",
                "vacancy", "karir", "career", "staff", "karyawan", "pegawai", "manager",
                "supervisor", "koordinator", "asisten", "admin", "sekretaris", "operator",
                "teknisi", "analis", "programmer", "developer", "marketing", "kualifikasi",
                "persyaratan", "requirement", "pendidikan", "pengalaman", "keahlian",
                "kompetensi", "sertifikat", "ijazah", "diploma", "sarjana", "lulusan",
                "jurusan", "fresh graduate", "berpengalaman", "minimal", "gaji", "salary",
                "tunjangan", "benefit", "asuransi", "bpjs", "cuti", "thr", "lembur",
                "seragam", "lamaran", "interview", "wawancara", "seleksi", "rekrutmen",
                "tahap", "jadwal", "deadline", "konfirmasi", "hrd", "telepon", "website",
                "linkedin",
            ]),
            suspicious: to_strings(&[
                "mudah", "cepat", "instant", "langsung", "jutaan", "milyar", "kaya",
                "sukses", "freedom", "tanpa pengalaman", "tanpa modal", "unlimited",
                "tak terbatas", "fantastis", "luar biasa", "dahsyat", "ajaib", "dijamin",
                "pasti", "terbukti", "mlm", "multi level", "downline", "upline", "sponsor",
                "referral", "passive income", "binary", "piramida", "dropship", "forex",
                "cryptocurrency", "crypto", "bitcoin", "mining", "saham",
                "biaya pendaftaran", "bayar", "transfer", "deposit", "jaminan", "administrasi",
                "registrasi", "materai", "pulsa", "saldo", "top up", "voucher",
                "starter pack", "keanggotaan", "iuran", "uang muka", "bro", "sis", "guys",
                "mantap", "keren", "gila", "mantul", "segera", "buruan", "terbatas",
                "promo", "gratis", "doorprize", "undian", "beruntung", "kesempatan emas",
                "rahasia", "urgent", "darurat", "wajib", "sekarang juga", "jangan sampai",
                "terlewat", "japri", "autopilot", "jalan pintas", "shortcut", "trik",
            ]),
            neutral: to_strings(&[
                "kerja", "work", "job", "opportunity", "kesempatan", "peluang",
                "penghasilan", "income", "uang", "money", "rupiah", "waktu", "hari",
                "minggu", "bulan", "tahun", "jam", "tempat", "daerah", "kota", "jakarta",
                "surabaya", "bandung", "medan", "semarang", "yogyakarta", "bali",
                "tangerang", "bekasi", "industri", "sektor", "bidang", "wilayah", "senin",
                "selasa", "rabu", "kamis", "jumat", "sabtu", "pagi", "siang", "sore",
                "malam", "shift", "fleksibel", "bisnis", "pasar", "pelanggan", "layanan",
                "produk", "kualitas", "standar", "profesional", "bahasa", "inggris",
                "komputer", "internet", "aplikasi", "sistem", "data", "informasi",
            ]),
            genuine_markers: to_strings(&[
                "pengalaman", "kualifikasi", "syarat", "tanggung jawab", "tunjangan",
                "gaji", "wawancara", "lamaran", "kandidat", "posisi", "lowongan",
                "perusahaan", "karir", "profesional", "skill", "kemampuan", "pendidikan",
                "lulusan", "diploma", "sarjana", "sertifikat", "training", "pelatihan",
                "development", "benefit", "asuransi",
            ]),
            fake_markers: to_strings(&[
                "mudah", "cepat", "instant", "langsung", "tanpa modal", "gratis",
                "buruan", "terbatas", "deadline", "segera", "jangan sampai", "terlewat",
                "kesempatan emas", "limited time", "sekarang juga", "kerja rumah",
                "work from home", "part time", "freelance", "sampingan", "tambahan",
                "passive income", "downline", "upline", "bonus", "komisi", "reward",
                "cashback", "jutaan", "milyar", "unlimited", "tak terbatas",
                "penghasilan besar", "kaya", "investasi", "trading", "forex", "crypto",
                "bitcoin", "whatsapp", "wa", "telegram", "japri", "tanpa wawancara",
                "langsung kerja", "tanpa pengalaman",
            ]),
            genuine_terms: to_strings(&[
                // English
                "experience", "qualification", "requirement", "responsibility",
                "benefit", "salary", "interview", "application", "candidate",
                "position", "company", "corporation", "professional", "career",
                "employment", "vacancy", "education", "degree", "diploma",
                "certificate", "training", "development", "promotion", "competitive",
                "insurance", "health", "medical", "retirement", "allowance",
                "transportation", "accommodation", "office", "workplace",
                "supervisor", "manager", "director", "executive", "employee",
                "fulltime", "contract", "permanent", "internship", "graduate",
                "coordinator", "specialist", "analyst", "consultant", "engineer",
                "developer", "designer", "technician", "administrator", "secretary",
                "receptionist", "accounting", "compliance", "logistics",
                "management", "reporting", "communication", "leadership", "teamwork",
                "reliability", "integrity",
                // Indonesian
                "pengalaman", "kualifikasi", "syarat", "tanggung jawab", "tunjangan",
                "gaji", "wawancara", "lamaran", "kandidat", "posisi", "lowongan",
                "pekerjaan", "perusahaan", "pt", "cv", "kontak", "telepon",
                "profesional", "karir", "jabatan", "keahlian", "kemampuan",
                "keterampilan", "pendidikan", "gelar", "ijazah", "sertifikat",
                "pelatihan", "pengembangan", "promosi", "kompetitif", "asuransi",
                "kesehatan", "pensiun", "transportasi", "akomodasi", "seragam",
                "kantor", "lingkungan", "rekan", "atasan", "manajer", "direktur",
                "karyawan", "pegawai", "kontrak", "tetap", "magang", "lulusan",
                "koordinator", "spesialis", "analis", "konsultan", "insinyur",
                "teknisi", "sekretaris", "resepsionis", "akuntansi", "keuangan",
                "operasional", "produksi", "pelaporan", "komunikasi", "kepemimpinan",
                "integritas", "kejujuran", "disiplin",
            ]),
            fake_terms: to_strings(&[
                // English
                "easy money", "quick cash", "fast cash", "work from home",
                "no experience", "no interview", "immediate start", "urgent hiring",
                "guaranteed income", "zero risk", "no capital", "get rich",
                "passive income", "residual income", "unlimited earning",
                "millionaire", "financial freedom", "retire early", "quit your job",
                "side hustle", "business opportunity", "join now", "sign up",
                "limited spots", "exclusive", "secret method", "insider",
                "proven system", "foolproof", "autopilot", "effortless",
                "copy paste", "data entry", "typing job", "click ads",
                "mystery shopper", "product tester", "crypto", "bitcoin", "forex",
                "binary options", "casino", "lottery", "sweepstakes", "prize",
                "winner", "congratulations", "selected", "act now", "dont miss",
                "last chance", "final call",
                // Indonesian
                "uang mudah", "mudah", "cepat", "instan", "gratis", "tanpa pengalaman",
                "tanpa wawancara", "tanpa modal", "kerja dari rumah", "kerja rumahan",
                "mulai hari ini", "butuh segera", "buruan", "dijamin untung",
                "tanpa resiko", "modal kecil", "kaya mendadak", "penghasilan pasif",
                "jutaan", "milyaran", "gaji besar", "penghasilan besar",
                "kebebasan finansial", "pensiun dini", "jam fleksibel", "sampingan",
                "peluang emas", "kesempatan langka", "terbatas", "eksklusif",
                "rahasia", "metode terbukti", "cara ampuh", "trik jitu", "otomatis",
                "autopilot", "gampang banget", "siapa saja bisa", "ketik",
                "klik iklan", "isi amplop", "judi", "lotere", "undian", "hadiah",
                "pemenang", "selamat terpilih", "jangan sampai terlewat", "deposit",
                "pinjaman", "cicilan", "komisi", "cashback", "wa", "whatsapp",
                "telegram", "japri",
            ]),
            professional: to_strings(&[
                "experience", "qualification", "responsibility", "requirement",
                "benefit", "salary", "position", "candidate", "application",
                "interview", "pengalaman", "kualifikasi", "tanggung jawab", "syarat",
                "tunjangan", "gaji", "posisi", "kandidat", "lamaran", "wawancara",
            ]),
            company_terms: to_strings(&[
                "company", "corporation", "ltd", "inc", "pt", "cv", "perusahaan",
                "firma",
            ]),
            job_terms: to_strings(&[
                "position", "role", "job", "vacancy", "posisi", "jabatan", "lowongan",
                "kerja",
            ]),
            requirement_terms: to_strings(&[
                "requirement", "qualification", "experience", "skill", "syarat",
                "kualifikasi", "pengalaman", "keahlian",
            ]),
            contact_terms: to_strings(&[
                "email", "phone", "contact", "apply", "telepon", "kontak", "lamar",
                "hubungi",
            ]),
            contact_indicators: to_strings(&[
                "email", "@", "phone", "contact", "telepon", "kontak", "hubungi",
                "kirim", "lamar", "cv",
            ]),
        }
    }
}

impl Lexicons {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading lexicon file {}", path.display()))?;
        let lexicons: Lexicons =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        Ok(lexicons)
    }

    /// Count how many entries of `list` occur in the lowercased text.
    pub fn count_hits(list: &[String], text_lower: &str) -> usize {
        list.iter().filter(|kw| text_lower.contains(kw.as_str())).count()
    }

    /// Collect the entries of `list` found in the lowercased text.
    pub fn find_hits<'a>(list: &'a [String], text_lower: &str) -> Vec<&'a str> {
        list.iter()
            .filter(|kw| text_lower.contains(kw.as_str()))
            .map(|kw| kw.as_str())
            .collect()
    }
}

/// Keyword samples reported back to the caller, capped at ten per class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoundKeywords {
    pub legitimate: Vec<String>,
    pub suspicious: Vec<String>,
    pub neutral: Vec<String>,
}

/// Summary of the Indonesian keyword analysis over one text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// Hits per 100 words, per class.
    pub legitimate_score: f64,
    pub suspicious_score: f64,
    pub neutral_score: f64,
    pub total_keywords: usize,
    pub found_keywords: FoundKeywords,
    pub analysis: String,
    pub recommendation: String,
}

impl Default for KeywordAnalysis {
    fn default() -> Self {
        Self {
            legitimate_score: 0.0,
            suspicious_score: 0.0,
            neutral_score: 0.0,
            total_keywords: 0,
            found_keywords: FoundKeywords::default(),
            analysis: "No text to analyze".to_string(),
            recommendation: keyword_recommendation(0.0, 0.0),
        }
    }
}

const MAX_REPORTED_KEYWORDS: usize = 10;

/// Score the text against the legitimate / suspicious / neutral lists.
pub fn analyze_keywords(lexicons: &Lexicons, text: &str) -> KeywordAnalysis {
    if text.is_empty() {
        return KeywordAnalysis::default();
    }

    let text_lower = text.to_lowercase();
    let total_words = text_lower.split_whitespace().count().max(1);

    let legitimate = Lexicons::find_hits(&lexicons.legitimate, &text_lower);
    let suspicious = Lexicons::find_hits(&lexicons.suspicious, &text_lower);
    let neutral = Lexicons::find_hits(&lexicons.neutral, &text_lower);

    let legitimate_score = legitimate.len() as f64 / total_words as f64 * 100.0;
    let suspicious_score = suspicious.len() as f64 / total_words as f64 * 100.0;
    let neutral_score = neutral.len() as f64 / total_words as f64 * 100.0;

    let analysis = if legitimate_score > suspicious_score * 1.5 {
        "Menunjukkan indikator lowongan kerja yang legitimate"
    } else if suspicious_score > legitimate_score * 1.5 {
        "Menunjukkan indikator lowongan kerja yang mencurigakan"
    } else if suspicious_score > 5.0 {
        "Mengandung banyak kata-kata mencurigakan"
    } else if legitimate_score > 3.0 {
        "Mengandung beberapa indikator legitimate"
    } else {
        "Analisis tidak konklusif, perlu verifikasi manual"
    };

    KeywordAnalysis {
        legitimate_score,
        suspicious_score,
        neutral_score,
        total_keywords: legitimate.len() + suspicious.len() + neutral.len(),
        found_keywords: FoundKeywords {
            legitimate: cap_sample(&legitimate),
            suspicious: cap_sample(&suspicious),
            neutral: cap_sample(&neutral),
        },
        analysis: analysis.to_string(),
        recommendation: keyword_recommendation(legitimate_score, suspicious_score),
    }
}

fn cap_sample(hits: &[&str]) -> Vec<String> {
    hits.iter()
        .take(MAX_REPORTED_KEYWORDS)
        .map(|s| s.to_string())
        .collect()
}

fn keyword_recommendation(legitimate_score: f64, suspicious_score: f64) -> String {
    if suspicious_score > 10.0 {
        "HATI-HATI: Banyak kata-kata mencurigakan ditemukan. Kemungkinan besar lowongan palsu."
    } else if suspicious_score > 5.0 {
        "WASPADA: Beberapa kata mencurigakan ditemukan. Perlu verifikasi lebih lanjut."
    } else if legitimate_score > 5.0 {
        "BAIK: Mengandung indikator lowongan kerja yang legitimate."
    } else if legitimate_score > 2.0 {
        "CUKUP: Beberapa indikator legitimate ditemukan."
    } else {
        "NETRAL: Tidak ada indikator kuat untuk legitimate atau mencurigakan."
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_neutral_analysis() {
        let lex = Lexicons::default();
        let analysis = analyze_keywords(&lex, "");
        assert_eq!(analysis.total_keywords, 0);
        assert_eq!(analysis.legitimate_score, 0.0);
    }

    #[test]
    fn legitimate_posting_scores_legitimate() {
        let lex = Lexicons::default();
        let text = "PT Maju Jaya membuka lowongan posisi staff admin. Kualifikasi: \
                    pendidikan sarjana, pengalaman minimal 2 tahun. Kirim lamaran dan \
                    ijazah ke kantor kami untuk jadwal wawancara.";
        let analysis = analyze_keywords(&lex, text);
        assert!(analysis.legitimate_score > analysis.suspicious_score);
        assert!(!analysis.found_keywords.legitimate.is_empty());
    }

    #[test]
    fn scam_posting_scores_suspicious() {
        let lex = Lexicons::default();
        let text = "buruan join sekarang juga, penghasilan jutaan dijamin, tanpa modal, \
                    gratis, kerja mudah dari rumah, transfer biaya registrasi dulu";
        let analysis = analyze_keywords(&lex, text);
        assert!(analysis.suspicious_score > analysis.legitimate_score);
    }

    #[test]
    fn found_keyword_samples_are_capped() {
        let lex = Lexicons::default();
        let text = lex.legitimate.join(" ");
        let analysis = analyze_keywords(&lex, &text);
        assert!(analysis.found_keywords.legitimate.len() <= MAX_REPORTED_KEYWORDS);
    }
}
