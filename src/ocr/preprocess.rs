// Image preparation for the OCR grid.
//
// Screenshots arrive at arbitrary sizes and contrast. Everything is taken
// down to single-channel grayscale, upscaled when narrow, then pushed
// through a short ladder of binarization strategies; the first one that
// succeeds wins and the plain grayscale always can.

use std::panic::{catch_unwind, AssertUnwindSafe};

use image::imageops::FilterType;
use image::{imageops, DynamicImage, GrayImage};
use imageproc::contrast::{adaptive_threshold, equalize_histogram, otsu_level, threshold, ThresholdType};
use imageproc::filter::median_filter;
use tracing::{debug, warn};

use crate::config::OcrPolicy;

const MEDIAN_RADIUS: u32 = 1;
const ADAPTIVE_BLOCK_RADIUS: u32 = 5;

/// Grayscale the image and upscale narrow ones with cubic interpolation.
pub fn to_ocr_grayscale(image: &DynamicImage, policy: &OcrPolicy) -> GrayImage {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width >= policy.min_width || width == 0 || height == 0 {
        return gray;
    }
    let scale = policy.min_width as f64 / width as f64;
    let new_height = ((height as f64 * scale).round() as u32).max(1);
    debug!(width, height, new_height, "upscaling narrow image for OCR");
    imageops::resize(&gray, policy.min_width, new_height, FilterType::CatmullRom)
}

/// Produce the contrast-preprocessed variant: binarization strategies are
/// attempted in order and a failing transform is skipped, never fatal. The
/// final strategy is the untouched grayscale, so this cannot fail.
pub fn preprocess_for_ocr(image: &DynamicImage, policy: &OcrPolicy) -> GrayImage {
    let gray = to_ocr_grayscale(image, policy);

    type Strategy = (&'static str, fn(&GrayImage) -> GrayImage);
    let strategies: [Strategy; 3] = [
        ("adaptive", |g| {
            let denoised = median_filter(g, MEDIAN_RADIUS, MEDIAN_RADIUS);
            adaptive_threshold(&denoised, ADAPTIVE_BLOCK_RADIUS)
        }),
        ("otsu", |g| {
            let denoised = median_filter(g, MEDIAN_RADIUS, MEDIAN_RADIUS);
            let level = otsu_level(&denoised);
            threshold(&denoised, level, ThresholdType::Binary)
        }),
        ("equalized", |g| {
            let enhanced = equalize_histogram(g);
            let level = otsu_level(&enhanced);
            threshold(&enhanced, level, ThresholdType::Binary)
        }),
    ];

    for (name, strategy) in strategies {
        match catch_unwind(AssertUnwindSafe(|| strategy(&gray))) {
            Ok(processed) => {
                debug!(strategy = name, "contrast preprocessing applied");
                return processed;
            }
            Err(_) => {
                warn!(strategy = name, "preprocessing strategy failed, trying next");
            }
        }
    }

    // Plain upscaled grayscale: the fallback that always succeeds.
    debug!("all thresholding strategies failed, using plain grayscale");
    gray
}
