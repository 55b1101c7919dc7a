//! Job-posting screenshot authenticity scoring.
//!
//! The pipeline recovers text from an uploaded image with a multi-strategy
//! OCR grid search, derives a feature record from the text, scores it with
//! four independent analyzers and fuses their verdicts into one bounded,
//! explainable result with actionable recommendations.
//!
//! ```no_run
//! use lokerscan::config::PipelineConfig;
//! use lokerscan::pipeline::PipelineContext;
//!
//! let ctx = PipelineContext::new(PipelineConfig::default());
//! let bytes = std::fs::read("posting.png").unwrap();
//! let report = ctx.classify_image(&bytes, Some("posting.png")).unwrap();
//! println!("{} ({:.0}%)", report.final_prediction.as_str(), report.final_confidence);
//! ```

pub mod analyzers;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod recommend;
pub mod types;

pub use config::{PipelineConfig, Policy};
pub use error::PipelineError;
pub use pipeline::{ClassificationReport, PipelineContext, PipelineStatus};
pub use types::{AnalyzerResult, EnsembleResult, ExtractedText, Recommendation, Verdict};
