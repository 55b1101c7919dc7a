// End-to-end pipeline behavior over the library API, exercised without any
// external OCR binary or model artifacts so the degraded paths are covered
// the way a fresh deployment would hit them.

use std::path::PathBuf;

use lokerscan::config::PipelineConfig;
use lokerscan::features::label_hint::DetectedLabel;
use lokerscan::features::salary::SalaryRiskTier;
use lokerscan::ocr::normalize::normalize;
use lokerscan::pipeline::PipelineContext;
use lokerscan::types::Verdict;

fn offline_context() -> PipelineContext {
    let config = PipelineConfig {
        tesseract_paths: vec![PathBuf::from("/nonexistent/tesseract")],
        model_dir: PathBuf::from("/nonexistent/models"),
        ..PipelineConfig::default()
    };
    PipelineContext::new(config)
}

const GENUINE_POSTING: &str =
    "PT Sentosa Abadi membuka lowongan untuk posisi staff administrasi kantor pusat \
     Jakarta. PT kami bergerak di bidang distribusi dan logistik. Kualifikasi utama: \
     pendidikan sarjana, pengalaman minimal dua tahun, menguasai komputer. Kualifikasi \
     lainnya: mampu berkomunikasi dengan baik dan teliti. Kualifikasi lengkap dapat \
     dibaca pada lampiran pengumuman resmi. Gaji pokok kompetitif, gaji ke tiga belas, \
     serta tunjangan kesehatan diberikan sesuai ketentuan. Gaji akan dibahas saat \
     wawancara akhir. Proses seleksi meliputi tes tertulis, wawancara pertama dengan \
     hrd, dan wawancara kedua dengan manajer departemen. Kirim lamaran beserta cv dan \
     kontak anda ke email rekrutmen@sentosaabadi.co.id sebelum akhir bulan. PT Sentosa \
     Abadi tidak memungut biaya apapun dalam proses rekrutmen.";

const SCAM_POSTING: &str =
    "GAJI BESAR JUTAAN, WA 08123456789, KERJA DARI RUMAH TANPA PENGALAMAN";

const NEUTRAL_TEXT: &str =
    "Informasi jadwal kegiatan kantor minggu depan tersedia di papan pengumuman lantai dua.";

#[test]
fn rich_genuine_posting_classifies_genuine_with_high_confidence() {
    let ctx = offline_context();
    let report = ctx.classify(GENUINE_POSTING, None);

    assert!(report.text_analysis.word_count >= 80);
    assert!(report.text_analysis.has_email);
    assert_eq!(report.final_prediction, Verdict::Genuine);
    assert!(
        report.final_confidence >= 60.0,
        "confidence {} below genuine band",
        report.final_confidence
    );
}

#[test]
fn scam_posting_never_reads_genuine() {
    let ctx = offline_context();
    let report = ctx.classify(SCAM_POSTING, None);

    assert!(report.text_analysis.salary.tier >= SalaryRiskTier::High);
    assert_ne!(report.final_prediction, Verdict::Genuine);
    assert!(report.final_confidence < 60.0);
}

#[test]
fn empty_text_classifies_without_error() {
    let ctx = offline_context();
    let report = ctx.classify("", None);

    assert_eq!(report.text_analysis.length, 0);
    assert_eq!(report.analyzers.len(), 4);
    for analyzer in &report.analyzers {
        assert_ne!(analyzer.prediction, Verdict::Error, "{analyzer:?}");
        assert!((0.0..=100.0).contains(&analyzer.confidence));
    }
    assert_ne!(report.final_prediction, Verdict::Error);
}

#[test]
fn fake_dataset_filename_forces_fake_verdict() {
    let ctx = offline_context();
    let filename = "dataset/fake/sample003.jpg";

    let features = ctx.analyze_text(NEUTRAL_TEXT);
    assert_eq!(features.length, NEUTRAL_TEXT.chars().count());

    let report = ctx.classify(NEUTRAL_TEXT, Some(filename));
    assert_eq!(report.final_prediction, Verdict::Fake);

    let lexicon = report
        .analyzers
        .iter()
        .find(|a| a.analyzer == "lexicon")
        .expect("lexicon analyzer present");
    assert!(lexicon.reasoning.iter().any(|r| r.contains("fake indicators")));
}

#[test]
fn label_hint_is_bounded() {
    use lokerscan::config::Policy;
    use lokerscan::features::label_hint::analyze_file_label;

    let policy = Policy::default().label_hint;
    let fake = analyze_file_label(&policy, Some("dataset/fake/sample003.jpg"));
    assert_eq!(fake.label_detected, DetectedLabel::Fake);
    assert!(fake.confidence_boost <= -35.0 && fake.confidence_boost >= -60.0);

    let genuine = analyze_file_label(&policy, Some("genuine_posting.png"));
    assert!(genuine.confidence_boost > 0.0 && genuine.confidence_boost <= 35.0);

    assert_eq!(analyze_file_label(&policy, Some("scan.png")).confidence_boost, 0.0);
}

#[test]
fn unreadable_image_degrades_to_empty_text_pipeline() {
    let ctx = offline_context();
    let mut png = Vec::new();
    let img = image::DynamicImage::new_luma8(48, 48);
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let report = ctx.classify_image(&png, Some("blank.png")).unwrap();
    let extraction = report.extraction.as_ref().expect("extraction attached");
    assert!(!extraction.extracted.is_recovered());
    assert_eq!(extraction.confidence, 5.0);
    assert_eq!(report.text_analysis.length, 0);
    assert_ne!(report.final_prediction, Verdict::Error);
}

#[test]
fn classification_is_deterministic() {
    let ctx = offline_context();
    for text in [GENUINE_POSTING, SCAM_POSTING, NEUTRAL_TEXT, ""] {
        let first = ctx.classify(text, Some("upload.png"));
        let second = ctx.classify(text, Some("upload.png"));
        assert_eq!(first.final_prediction, second.final_prediction);
        assert_eq!(first.final_confidence, second.final_confidence);
        for (a, b) in first.analyzers.iter().zip(&second.analyzers) {
            assert_eq!(a.prediction, b.prediction);
            assert_eq!(a.confidence, b.confidence);
        }
    }
}

#[test]
fn all_confidences_stay_bounded_across_corpus() {
    let ctx = offline_context();
    let corpus = [
        GENUINE_POSTING,
        SCAM_POSTING,
        NEUTRAL_TEXT,
        "",
        "x",
        "gaji 99 juta rp 99 juta dijamin!! transfer deposit sekarang juga",
        "lowongan kerja",
    ];
    for text in corpus {
        for filename in [None, Some("dataset/fake/a.png"), Some("dataset/genuine/b.png")] {
            let report = ctx.classify(text, filename);
            assert!(
                (0.0..=100.0).contains(&report.final_confidence),
                "{text:?} {filename:?} -> {}",
                report.final_confidence
            );
            for analyzer in &report.analyzers {
                assert!((0.0..=100.0).contains(&analyzer.confidence));
            }
        }
    }
}

#[test]
fn normalization_is_idempotent_over_classified_text() {
    let samples = [GENUINE_POSTING, SCAM_POSTING, NEUTRAL_TEXT, "L0W0NGAN KERJ4 !!"];
    for sample in samples {
        let once = normalize(sample);
        assert_eq!(once, normalize(&once));
    }
}

#[test]
fn report_serializes_with_full_breakdown() {
    let ctx = offline_context();
    let report = ctx.classify(GENUINE_POSTING, Some("upload.png"));
    let json = serde_json::to_value(&report).unwrap();

    assert!(json.get("final_prediction").is_some());
    assert!(json.get("final_confidence").is_some());
    assert_eq!(json["analyzers"].as_array().unwrap().len(), 4);
    assert!(json.get("recommendations").is_some());
    assert!(json.get("extracted_text").is_some());
    assert!(json["ensemble"].get("votes").is_some());
}

#[test]
fn recommendations_follow_the_verdict() {
    let ctx = offline_context();

    let genuine = ctx.classify(GENUINE_POSTING, None);
    assert_eq!(genuine.recommendations[0].category, "OCR Quality");
    assert!(genuine.recommendations.iter().any(|r| r.category == "Verification"));

    let fake = ctx.classify(SCAM_POSTING, None);
    assert!(fake.recommendations.iter().any(|r| r.category == "Security Alert"));
    assert!(fake.recommendations.iter().any(|r| r.category == "Red Flags Detected"));
}

#[test]
fn status_report_is_serializable() {
    let ctx = offline_context();
    let status = ctx.status();
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["ocr_available"], false);
    assert_eq!(json["status"], "Compatibility Mode");
}
