// Error taxonomy for the document-to-verdict pipeline.
//
// Most of these are recoverable in place: OCR and model problems degrade the
// request instead of failing it, and a single analyzer failure only removes
// that analyzer's vote. Only `EnsembleFailure` is terminal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Tesseract binary or language data missing at every configured path.
    /// The request still completes with empty text and degraded confidence.
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    /// The variant x config grid was exhausted with zero usable candidates.
    #[error("no text extracted from image")]
    NoTextExtracted,

    /// The uploaded bytes could not be decoded as an image.
    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    /// A backing classifier failed to load. Analyzers fall back to
    /// rule-only scoring; logged but non-fatal.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Unexpected failure inside one analyzer. That analyzer reports an
    /// `error` verdict and is excluded from the ensemble vote.
    #[error("analyzer '{analyzer}' failed: {message}")]
    AnalyzerFailure { analyzer: String, message: String },

    /// Every analyzer failed; surfaced to the caller as an error verdict
    /// with confidence 0.
    #[error("all analyzers failed")]
    EnsembleFailure,
}
